//! Signup Form Component
//!
//! Collects name, email and reason and creates one waitlist entry.

use leptos::*;

use crate::api;
use crate::state::{alert, GlobalState, LocalIdentity, View, VisitorEvent};

/// Waitlist signup form
#[component]
pub fn SignupForm(visitor: RwSignal<View>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (reason, set_reason) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let (n, e, r) = (name.get(), email.get(), reason.get());
        set_submitting.set(true);

        let state_clone = state.clone();
        spawn_local(async move {
            match api::join_waitlist(&n, &e, &r).await {
                Ok(entry) => {
                    visitor.update(|view| *view = view.on_submitted(&LocalIdentity, &entry.email));
                    state_clone.show_success("You're on the waitlist!");
                }
                Err(err) => {
                    alert(&format!("Error submitting form: {}", err));
                }
            }
            set_submitting.set(false);
        });
    };

    let close = move |_| visitor.update(|view| *view = view.step(VisitorEvent::CloseForm).0);

    view! {
        <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4 max-w-md mx-auto text-left">
            <h2 class="text-2xl font-semibold">"Join the Waitlist"</h2>

            <div>
                <label class="block text-sm text-gray-400 mb-2" for="signup-name">"Name"</label>
                <input
                    id="signup-name"
                    type="text"
                    required
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            <div>
                <label class="block text-sm text-gray-400 mb-2" for="signup-email">"Email"</label>
                <input
                    id="signup-email"
                    type="email"
                    required
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            <div>
                <label class="block text-sm text-gray-400 mb-2" for="signup-reason">
                    "Why do you want to play?"
                </label>
                <textarea
                    id="signup-reason"
                    required
                    rows="3"
                    prop:value=move || reason.get()
                    on:input=move |ev| set_reason.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
            </div>

            <div class="flex space-x-3">
                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="flex-1 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                           disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                           transition-colors flex items-center justify-center space-x-2"
                >
                    {move || if submitting.get() {
                        view! {
                            <div class="loading-spinner w-5 h-5" />
                            <span>"Submitting..."</span>
                        }.into_view()
                    } else {
                        view! { <span>"Submit"</span> }.into_view()
                    }}
                </button>
                <button
                    type="button"
                    on:click=close
                    class="px-4 py-3 bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
                >
                    "Cancel"
                </button>
            </div>
        </form>
    }
}
