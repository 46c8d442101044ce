//! Login page driving the Google OAuth sign-in flow.

use leptos::prelude::*;

use crate::app::{AppController, SignalAuthEvents};

#[component]
pub fn LoginPage() -> impl IntoView {
    let controller = expect_context::<AppController>();
    let events = expect_context::<SignalAuthEvents>();
    let busy = RwSignal::new(false);

    let on_sign_in = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        busy.set(true);
        let controller = controller.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            controller.begin_login().await;
            // Only reached when initiation failed; success leaves the page.
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = controller;
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Stockboard"</h1>
                <p class="login-card__subtitle">"Research, chat, and backtest in one place"</p>
                <button class="login-button" on:click=on_sign_in disabled=move || busy.get()>
                    "Sign in with Google"
                </button>
                <Show when=move || !events.message.get().is_empty()>
                    <p class="login-message">{move || events.message.get()}</p>
                </Show>
            </div>
        </div>
    }
}
