//! App Root Component
//!
//! Main application component with hash routing and global providers.

use leptos::*;

use crate::components::Toast;
use crate::pages::{AdminDashboard, AdminLogin, Landing};
use crate::state::{
    provide_global_state, AdminGate, IdentityStore, LocalIdentity, Route, View,
};

/// Coarse page selection; visitor transitions stay inside `Landing`
#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Site,
    AdminLogin,
    AdminDashboard,
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    let route = create_rw_signal(current_route());
    let _ = window_event_listener(ev::hashchange, move |_| route.set(current_route()));

    // Both survive route changes for the rest of the page load
    let gate = create_rw_signal(AdminGate::default());
    let visitor = create_rw_signal(View::initial(LocalIdentity.load().is_some()));

    let screen = create_memo(move |_| {
        gate.with(|gate| match View::resolve(route.get(), gate, visitor.get()) {
            View::AdminLogin => Screen::AdminLogin,
            View::AdminDashboard => Screen::AdminDashboard,
            _ => Screen::Site,
        })
    });

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            {move || match screen.get() {
                Screen::Site => view! { <Landing visitor=visitor /> }.into_view(),
                Screen::AdminLogin => view! { <AdminLogin gate=gate /> }.into_view(),
                Screen::AdminDashboard => view! { <AdminDashboard gate=gate /> }.into_view(),
            }}

            // Toast notifications
            <Toast />
        </div>
    }
}

fn current_route() -> Route {
    let hash = web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .unwrap_or_default();
    Route::from_fragment(&hash)
}
