//! Landing Page
//!
//! Marketing content for Stellar Forge plus the visitor's waitlist flow:
//! join button, signup form, and live status of the cached email.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::api;
use crate::components::{Nav, SignupForm, StatusPanel};
use crate::state::{
    live::entry_topic, EntryStatus, GlobalState, IdentityStore, LiveQuery, LocalIdentity, View,
    VisitorEvent, WsMessage,
};

const FEATURES: [(&str, &str); 6] = [
    (
        "Resource Management",
        "Gather and manage resources like Energy, Matter, and Data to build your empire.",
    ),
    (
        "Upgrades",
        "Upgrade your systems with a variety of technologies like Kinetic Capacitors and Solar Arrays.",
    ),
    (
        "Tech Tree",
        "Unlock new technologies and abilities through an extensive research system.",
    ),
    (
        "Explore the Galaxy",
        "Travel to different locations like the Stellar Forge, Quantum Realm, and Chronos Expanse.",
    ),
    (
        "Customization",
        "Customize your experience with different system parameters and visual themes.",
    ),
    (
        "Leaderboards",
        "Compete with other players and climb the ranks on the global leaderboard.",
    ),
];

/// Landing page component
#[component]
pub fn Landing(visitor: RwSignal<View>) -> impl IntoView {
    track_status(visitor);

    view! {
        <Nav />

        <main class="flex-1">
            // Hero
            <header class="py-20 text-center bg-gradient-to-b from-gray-800 to-gray-900">
                <div class="container mx-auto px-4 space-y-4">
                    <img src="assets/app_logo.png" alt="Stellar Forge" class="mx-auto h-32 w-32" />
                    <h1 class="text-5xl font-bold">"Stellar Forge"</h1>
                    <p class="text-xl text-gray-300">"The ultimate space adventure game."</p>
                    <p class="text-primary-400 font-semibold">"Coming Soon!"</p>

                    <div class="pt-6">
                        <WaitlistArea visitor=visitor />
                    </div>
                </div>
            </header>

            // Features
            <section id="features" class="py-16">
                <div class="container mx-auto px-4">
                    <h2 class="text-3xl font-bold mb-8 text-center">"Features"</h2>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                        {FEATURES.iter().map(|(title, text)| view! {
                            <div class="bg-gray-800 rounded-xl p-6">
                                <h3 class="text-lg font-semibold mb-2">{*title}</h3>
                                <p class="text-gray-400">{*text}</p>
                            </div>
                        }).collect_view()}
                    </div>
                    <div class="grid grid-cols-2 md:grid-cols-4 gap-4 mt-10">
                        {(1..=4).map(|n| view! {
                            <img
                                src=format!("assets/screen{}.png", n)
                                alt=format!("Screenshot {}", n)
                                class="rounded-lg"
                            />
                        }).collect_view()}
                    </div>
                </div>
            </section>

            // About
            <section id="about" class="py-16 bg-gray-800">
                <div class="container mx-auto px-4 max-w-3xl">
                    <h2 class="text-3xl font-bold mb-4">"About"</h2>
                    <p class="text-gray-300">
                        "Stellar Forge is an immersive space exploration and adventure game \
                         developed by Dev City Studio. Embark on a journey through the galaxy, \
                         build your empire, and conquer the stars."
                    </p>
                </div>
            </section>
        </main>

        <footer class="py-6 text-center text-gray-500 text-sm border-t border-gray-800">
            "© 2026 Dev City Studio. All rights reserved."
        </footer>
    }
}

/// Join button, form, or status, depending on where the visitor is
#[component]
fn WaitlistArea(visitor: RwSignal<View>) -> impl IntoView {
    let status = Signal::derive(move || match visitor.get() {
        View::Ready => EntryStatus::Ready,
        _ => EntryStatus::Pending,
    });

    move || match visitor.get() {
        View::Form => view! { <SignupForm visitor=visitor /> }.into_view(),
        View::Pending | View::Ready => view! { <StatusPanel status=status /> }.into_view(),
        _ => view! {
            <button
                on:click=move |_| visitor.update(|view| *view = view.step(VisitorEvent::OpenForm).0)
                class="px-8 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-semibold
                       transition-colors"
            >
                "Join the Waitlist"
            </button>
        }
        .into_view(),
    }
}

/// Keep a status live query open while a submission is being tracked.
///
/// The query follows the cached email; a `null` status forgets the email and
/// returns the visitor to the landing view, which closes the query.
fn track_status(visitor: RwSignal<View>) {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let handle: Rc<RefCell<Option<LiveQuery>>> = Rc::new(RefCell::new(None));
    let tracking = create_memo(move |_| visitor.get().tracks_status());

    let effect_handle = Rc::clone(&handle);
    create_effect(move |_| {
        if !tracking.get() {
            if let Some(query) = effect_handle.borrow_mut().take() {
                query.release();
            }
            return;
        }
        if effect_handle.borrow().is_some() {
            return;
        }

        let Some(email) = LocalIdentity.load() else {
            visitor.set(View::Landing);
            return;
        };

        let tracked = email.clone();
        let on_message = move |msg: WsMessage| {
            let WsMessage::EntryStatus { email, status } = msg else {
                return;
            };
            if email != tracked {
                return;
            }

            visitor.set(visitor.get_untracked().on_status(&LocalIdentity, status));
        };

        match LiveQuery::open(
            &api::get_api_base(),
            entry_topic(&email),
            None,
            state.clone(),
            on_message,
        ) {
            Ok(query) => *effect_handle.borrow_mut() = Some(query),
            Err(e) => {
                web_sys::console::error_1(&e.clone().into());
                state.show_error("Live status is unavailable right now");
            }
        }
    });

    on_cleanup(move || {
        if let Some(query) = handle.borrow_mut().take() {
            query.release();
        }
    });
}
