//! Admin Pages
//!
//! `#admin`: code prompt, then a live table of the whole waitlist.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::api;
use crate::components::{EntryDetails, EntryTable, RemovalDialog};
use crate::state::{
    alert, live::WAITLIST_TOPIC, AdminBoard, AdminGate, GlobalState, LiveQuery, WsMessage,
};

/// Admin code prompt
#[component]
pub fn AdminLogin(gate: RwSignal<AdminGate>) -> impl IntoView {
    let (code, set_code) = create_signal(String::new());
    let (checking, set_checking) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let entered = code.get();
        set_checking.set(true);

        spawn_local(async move {
            match api::open_admin_session(&entered).await {
                Ok(()) => gate.update(|g| g.unlock(entered)),
                Err(e) => alert(&e),
            }
            set_checking.set(false);
        });
    };

    view! {
        <main class="flex-1 flex items-center justify-center px-4">
            <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 w-full max-w-sm space-y-4">
                <h1 class="text-2xl font-bold">"Admin Login"</h1>
                <input
                    type="password"
                    required
                    placeholder="Admin code"
                    prop:value=move || code.get()
                    on:input=move |ev| set_code.set(event_target_value(&ev))
                    class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
                <button
                    type="submit"
                    disabled=move || checking.get()
                    class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                           rounded-lg py-3 font-semibold transition-colors"
                >
                    "Login"
                </button>
                <a href="#" class="block text-center text-sm text-gray-400 hover:text-white">
                    "Back to site"
                </a>
            </form>
        </main>
    }
}

/// Live waitlist dashboard
#[component]
pub fn AdminDashboard(gate: RwSignal<AdminGate>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let board = create_rw_signal(AdminBoard::default());

    let Some(code) = gate.with_untracked(|g| g.code().map(str::to_string)) else {
        return view! { <AdminLogin gate=gate /> }.into_view();
    };

    // Whole-collection live query for as long as the dashboard is mounted
    let handle: Rc<RefCell<Option<LiveQuery>>> = Rc::new(RefCell::new(None));
    match LiveQuery::open(
        &api::get_api_base(),
        WAITLIST_TOPIC.to_string(),
        Some(code.clone()),
        state.clone(),
        move |msg| {
            if let WsMessage::Entries { entries } = msg {
                board.update(|b| b.apply_snapshot(entries));
            }
        },
    ) {
        Ok(query) => *handle.borrow_mut() = Some(query),
        Err(e) => {
            web_sys::console::error_1(&e.into());
            state.show_error("Could not load the waitlist");
        }
    }
    on_cleanup(move || {
        if let Some(query) = handle.borrow_mut().take() {
            query.release();
        }
    });

    let ready_code = code.clone();
    let ready_state = state.clone();
    let on_mark_ready = Callback::new(move |id: String| {
        let code = ready_code.clone();
        let state = ready_state.clone();
        spawn_local(async move {
            match api::mark_ready(&code, &id).await {
                Ok(entry) => state.show_success(&format!("{} is ready", entry.email)),
                Err(e) => {
                    web_sys::console::error_1(&format!("Mark ready failed: {}", e).into());
                    state.show_error("Failed to update the entry");
                }
            }
        });
    });

    let remove_state = state.clone();
    let on_remove = Callback::new(move |id: String| {
        let code = code.clone();
        let state = remove_state.clone();
        spawn_local(async move {
            match api::remove_entry(&code, &id).await {
                Ok(()) => state.show_success("Entry removed"),
                Err(e) => {
                    web_sys::console::error_1(&format!("Remove failed: {}", e).into());
                    state.show_error("Failed to remove the entry");
                }
            }
        });
    });

    view! {
        <main class="flex-1 container mx-auto px-4 py-8 space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Waitlist"</h1>
                    <p class="text-gray-400 mt-1">
                        {move || {
                            let (pending, ready) = board.with(|b| b.counts());
                            format!("{} pending, {} ready", pending, ready)
                        }}
                    </p>
                </div>
                <LiveIndicator />
            </div>

            <EntryTable board=board on_mark_ready=on_mark_ready />
            <EntryDetails board=board />
            <RemovalDialog board=board on_confirm=on_remove />
        </main>
    }
    .into_view()
}

/// Live query connection status
#[component]
fn LiveIndicator() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="flex items-center space-x-2 text-sm">
            {move || {
                if state.ws_connected.get() {
                    view! {
                        <span class="flex items-center space-x-1 text-green-400">
                            <span class="w-2 h-2 bg-green-400 rounded-full pulse" />
                            <span>"Live"</span>
                        </span>
                    }.into_view()
                } else {
                    view! {
                        <span class="flex items-center space-x-1 text-red-400">
                            <span class="w-2 h-2 bg-red-400 rounded-full" />
                            <span>"Disconnected"</span>
                        </span>
                    }.into_view()
                }
            }}
        </div>
    }
}
