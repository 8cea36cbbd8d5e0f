//! Navigation Component
//!
//! Header bar with the studio brand and in-page links.

use leptos::*;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <a href="#" class="flex items-center space-x-3">
                        <img src="assets/company_logo.png" alt="Dev City Studio" class="h-8 w-8" />
                        <span class="text-xl font-bold text-white">"Dev City Studio"</span>
                    </a>

                    // Section links
                    <div class="flex items-center space-x-1">
                        <NavLink href="#features" label="Features" />
                        <NavLink href="#about" label="About" />
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <a
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
        >
            {label}
        </a>
    }
}
