//! UI Components
//!
//! Reusable Leptos components for the site and the dashboard.

pub mod entry_details;
pub mod entry_table;
pub mod nav;
pub mod signup_form;
pub mod status_panel;
pub mod toast;

pub use entry_details::{EntryDetails, RemovalDialog};
pub use entry_table::EntryTable;
pub use nav::Nav;
pub use signup_form::SignupForm;
pub use status_panel::StatusPanel;
pub use toast::Toast;
