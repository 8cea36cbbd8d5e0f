//! Toast Component
//!
//! Corner notice for dashboard actions and signup confirmation. Click to
//! dismiss.

use leptos::*;

use crate::state::GlobalState;

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let notices = state.notices;

    move || {
        notices.with(|board| board.current().cloned()).map(|notice| view! {
            <button
                type="button"
                on:click=move |_| notices.update(|board| board.dismiss())
                class=format!(
                    "fixed bottom-6 right-4 z-50 flex items-center space-x-3 {} text-white \
                     px-4 py-3 rounded-lg shadow-lg animate-slide-in",
                    notice.kind.class()
                )
            >
                <span class="text-lg">{notice.kind.icon()}</span>
                <span class="text-sm font-medium">{notice.text}</span>
            </button>
        })
    }
}
