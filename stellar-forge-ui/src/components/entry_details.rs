//! Entry Details Component
//!
//! Read-only panel for the selected entry, and the removal confirmation.

use leptos::*;

use crate::state::AdminBoard;

/// Detail panel for the board's current selection
#[component]
pub fn EntryDetails(board: RwSignal<AdminBoard>) -> impl IntoView {
    move || {
        board.with(|b| b.selected_entry().cloned()).map(|entry| view! {
            <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-40">
                <div class="bg-gray-800 rounded-xl p-6 w-full max-w-lg space-y-3">
                    <h2 class="text-xl font-semibold">{entry.name.clone()}</h2>
                    <dl class="grid grid-cols-3 gap-2 text-sm">
                        <dt class="text-gray-400">"Email"</dt>
                        <dd class="col-span-2">{entry.email.clone()}</dd>
                        <dt class="text-gray-400">"Status"</dt>
                        <dd class="col-span-2">{entry.status.label()}</dd>
                        <dt class="text-gray-400">"Joined"</dt>
                        <dd class="col-span-2">{entry.created_at.to_rfc3339()}</dd>
                        <dt class="text-gray-400">"ID"</dt>
                        <dd class="col-span-2 font-mono text-xs">{entry.id.clone()}</dd>
                    </dl>
                    <div>
                        <p class="text-gray-400 text-sm mb-1">"Reason"</p>
                        <p class="whitespace-pre-wrap bg-gray-700 rounded p-3">{entry.reason.clone()}</p>
                    </div>
                    <button
                        on:click=move |_| board.update(|b| b.close_details())
                        class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
                    >
                        "Close"
                    </button>
                </div>
            </div>
        })
    }
}

/// Confirmation dialog for a requested removal
#[component]
pub fn RemovalDialog(
    board: RwSignal<AdminBoard>,
    #[prop(into)]
    on_confirm: Callback<String>,
) -> impl IntoView {
    move || {
        board.with(|b| b.pending_removal().cloned()).map(|entry| view! {
            <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-40">
                <div class="bg-gray-800 rounded-xl p-6 w-full max-w-md space-y-4">
                    <h2 class="text-xl font-semibold">"Remove entry?"</h2>
                    <p class="text-gray-300">
                        {format!("{} <{}> will be removed from the waitlist. This cannot be undone.",
                            entry.name, entry.email)}
                    </p>
                    <div class="flex justify-end space-x-3">
                        <button
                            on:click=move |_| board.update(|b| b.cancel_removal())
                            class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg transition-colors"
                        >
                            "Cancel"
                        </button>
                        <button
                            on:click=move |_| {
                                let mut confirmed = None;
                                board.update(|b| confirmed = b.confirm_removal());
                                if let Some(id) = confirmed {
                                    on_confirm.call(id);
                                }
                            }
                            class="px-4 py-2 bg-red-700 hover:bg-red-600 rounded-lg transition-colors"
                        >
                            "Remove"
                        </button>
                    </div>
                </div>
            </div>
        })
    }
}
