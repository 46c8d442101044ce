//! Dashboard page: watchlist sidebar, symbol workspace, session controls.
//!
//! The market data, chart, and chat panels are their own feature areas; this
//! page wires the session-relevant chrome (sidebar layout, last symbol,
//! theme, sign-out) to the preference store and controller.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::{AppController, AppPreferences, SignalAuthEvents};
use crate::util::auth::install_unauth_redirect;
use crate::util::dark_mode;
use crate::util::storage::LocalStore;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let controller = expect_context::<AppController>();
    let events = expect_context::<SignalAuthEvents>();
    let prefs = expect_context::<AppPreferences>();
    let navigate = use_navigate();

    // In-page guard for transitions after startup (e.g. post-logout SPA nav).
    install_unauth_redirect(events.auth, events.phase, navigate);

    let initial = prefs.get();
    let sidebar_collapsed = RwSignal::new(initial.sidebar_collapsed);
    let symbol = RwSignal::new(initial.last_symbol.unwrap_or_default());
    let dark = RwSignal::new(dark_mode::read_preference(&LocalStore));

    let prefs_sidebar = prefs.clone();
    let on_toggle_sidebar = move |_| {
        let next = !sidebar_collapsed.get();
        sidebar_collapsed.set(next);
        prefs_sidebar.set_sidebar_collapsed(next);
    };

    let prefs_symbol = prefs.clone();
    let on_symbol_change = move |ev| {
        let value = event_target_value(&ev).trim().to_ascii_uppercase();
        symbol.set(value.clone());
        prefs_symbol.set_last_symbol(if value.is_empty() { None } else { Some(value.as_str()) });
    };

    let on_toggle_dark = move |_| {
        dark.set(dark_mode::toggle(&LocalStore, dark.get()));
    };

    let on_logout = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        let controller = controller.clone();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            controller.logout().await;
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = controller;
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <button class="btn btn--icon" on:click=on_toggle_sidebar title="Toggle sidebar">
                    "☰"
                </button>
                <h1>"Stockboard"</h1>
                <input
                    class="symbol-input"
                    type="text"
                    placeholder="Symbol, e.g. AAPL"
                    prop:value=move || symbol.get()
                    on:change=on_symbol_change
                />
                <div class="dashboard-page__session">
                    {move || {
                        events
                            .auth
                            .get()
                            .profile()
                            .and_then(|p| p.picture.clone())
                            .map(|src| view! { <img class="user-chip__avatar" src=src alt=""/> })
                    }}
                    <span class="user-chip">
                        {move || events.auth.get().profile().map(|p| p.name.clone()).unwrap_or_default()}
                    </span>
                    <button class="btn" on:click=on_toggle_dark>
                        {move || if dark.get() { "Light" } else { "Dark" }}
                    </button>
                    <button class="btn" on:click=on_logout>
                        "Sign out"
                    </button>
                </div>
            </header>

            <Show when=move || !events.message.get().is_empty()>
                <p class="dashboard-page__notice">{move || events.message.get()}</p>
            </Show>

            <div class="dashboard-page__body">
                <Show when=move || !sidebar_collapsed.get()>
                    <aside class="watchlist">
                        <h2>"Watchlist"</h2>
                        <p class="watchlist__hint">"Search a symbol to add it here."</p>
                    </aside>
                </Show>
                <main class="workspace">
                    <Show
                        when=move || !symbol.get().is_empty()
                        fallback=|| view! { <p class="workspace__empty">"Pick a symbol to get started."</p> }
                    >
                        <p class="workspace__placeholder">
                            {move || format!("Charts and research for {} load here.", symbol.get())}
                        </p>
                    </Show>
                </main>
            </div>
        </div>
    }
}
