//! Stellar Forge Site
//!
//! Marketing page for Stellar Forge with the waitlist signup, live status of
//! the visitor's own entry, and the `#admin` dashboard. Built with Leptos
//! (WASM).
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the Stellar Forge API over HTTP for mutations and
//! over WebSocket for live queries.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
