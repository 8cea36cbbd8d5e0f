//! API access for the site

pub mod client;

pub use client::*;
