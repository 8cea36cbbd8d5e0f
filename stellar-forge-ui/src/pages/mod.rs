//! Pages
//!
//! Top-level page components for each route.

pub mod admin;
pub mod landing;

pub use admin::{AdminDashboard, AdminLogin};
pub use landing::Landing;
