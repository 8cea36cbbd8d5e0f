//! Entry Table Component
//!
//! Admin table of all waitlist entries with row actions.

use leptos::*;

use crate::state::{AdminBoard, EntryStatus, WaitlistEntry};

/// Waitlist table; actions are reported through the callbacks
#[component]
pub fn EntryTable(
    board: RwSignal<AdminBoard>,
    #[prop(into)]
    on_mark_ready: Callback<String>,
) -> impl IntoView {
    let rows = move || board.with(|b| b.entries.clone());

    view! {
        <div class="bg-gray-800 rounded-xl overflow-x-auto">
            <table class="w-full text-left text-sm">
                <thead class="bg-gray-700 text-gray-300">
                    <tr>
                        <th class="px-4 py-3">"Name"</th>
                        <th class="px-4 py-3">"Email"</th>
                        <th class="px-4 py-3">"Joined"</th>
                        <th class="px-4 py-3">"Status"</th>
                        <th class="px-4 py-3">"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let entries = rows();
                        if entries.is_empty() {
                            view! {
                                <tr>
                                    <td colspan="5" class="px-4 py-8 text-center text-gray-400">
                                        "No one has signed up yet."
                                    </td>
                                </tr>
                            }.into_view()
                        } else {
                            entries
                                .into_iter()
                                .map(|entry| view! {
                                    <EntryRow entry=entry board=board on_mark_ready=on_mark_ready />
                                })
                                .collect_view()
                        }
                    }}
                </tbody>
            </table>
        </div>
    }
}

#[component]
fn EntryRow(
    entry: WaitlistEntry,
    board: RwSignal<AdminBoard>,
    on_mark_ready: Callback<String>,
) -> impl IntoView {
    let is_ready = entry.status == EntryStatus::Ready;
    let (id_details, id_ready, id_remove) = (entry.id.clone(), entry.id.clone(), entry.id.clone());

    view! {
        <tr class="border-t border-gray-700">
            <td class="px-4 py-3">{entry.name}</td>
            <td class="px-4 py-3">{entry.email}</td>
            <td class="px-4 py-3 text-gray-400">
                {entry.created_at.format("%Y-%m-%d %H:%M").to_string()}
            </td>
            <td class="px-4 py-3">
                <span class={if is_ready { "text-green-400" } else { "text-yellow-400" }}>
                    {entry.status.label()}
                </span>
            </td>
            <td class="px-4 py-3 space-x-2 whitespace-nowrap">
                <button
                    on:click=move |_| board.update(|b| b.select(&id_details))
                    class="px-3 py-1 bg-gray-700 hover:bg-gray-600 rounded transition-colors"
                >
                    "Details"
                </button>
                <button
                    disabled=is_ready
                    on:click=move |_| on_mark_ready.call(id_ready.clone())
                    class="px-3 py-1 bg-green-700 hover:bg-green-600 disabled:bg-gray-600
                           disabled:cursor-not-allowed rounded transition-colors"
                >
                    "Mark Ready"
                </button>
                <button
                    on:click=move |_| board.update(|b| b.request_removal(&id_remove))
                    class="px-3 py-1 bg-red-700 hover:bg-red-600 rounded transition-colors"
                >
                    "Remove"
                </button>
            </td>
        </tr>
    }
}
