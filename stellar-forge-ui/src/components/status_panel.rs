//! Status Panel Component
//!
//! The visitor's own waitlist status, with the download link once ready.

use leptos::*;

use crate::state::EntryStatus;

/// Store listing opened once access is granted
pub const DOWNLOAD_URL: &str =
    "https://play.google.com/store/apps/details?id=com.devcitystudio.stellarforge";

#[component]
pub fn StatusPanel(
    #[prop(into)]
    status: Signal<EntryStatus>,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-xl p-6 max-w-md mx-auto space-y-3">
            {move || match status.get() {
                EntryStatus::Pending => view! {
                    <h2 class="text-2xl font-semibold">"Thanks for signing up!"</h2>
                    <p class="text-gray-300">
                        "Your request is pending. This page updates as soon as you're let in."
                    </p>
                    <span class="inline-block px-3 py-1 rounded-full bg-yellow-600 text-sm">
                        {EntryStatus::Pending.label()}
                    </span>
                }.into_view(),
                EntryStatus::Ready => view! {
                    <h2 class="text-2xl font-semibold">"You're in!"</h2>
                    <p class="text-gray-300">"Your access is ready. Download Stellar Forge now."</p>
                    <a
                        href=DOWNLOAD_URL
                        target="_blank"
                        rel="noopener noreferrer"
                        class="inline-block px-6 py-3 bg-primary-600 hover:bg-primary-700
                               rounded-lg font-medium transition-colors"
                    >
                        "Download the Game"
                    </a>
                }.into_view(),
            }}
        </div>
    }
}
