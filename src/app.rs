//! Root application component with routing, context providers, and the
//! once-per-load session startup.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::auth::controller::AuthSessionController;
use crate::net::api::{CredentialTransport, HttpAuthApi};
use crate::pages::{dashboard::DashboardPage, login::LoginPage};
use crate::state::auth::{AuthEvents, AuthState, SessionPhase};
use crate::state::prefs::PreferenceStore;
use crate::util::dark_mode;
use crate::util::navigation::BrowserNavigator;
use crate::util::storage::LocalStore;

/// The controller as instantiated with the browser-backed capabilities.
pub type AppController = AuthSessionController<HttpAuthApi, BrowserNavigator, LocalStore, SignalAuthEvents>;
/// The preference store as instantiated against `localStorage`.
pub type AppPreferences = PreferenceStore<LocalStore>;

/// [`AuthEvents`] over reactive signals, provided via context so pages can
/// subscribe without knowing the controller.
#[derive(Clone, Copy)]
pub struct SignalAuthEvents {
    pub auth: RwSignal<AuthState>,
    pub phase: RwSignal<SessionPhase>,
    /// Latest user-visible notice; empty when there is nothing to show.
    pub message: RwSignal<String>,
}

impl SignalAuthEvents {
    pub fn new() -> Self {
        Self {
            auth: RwSignal::new(AuthState::default()),
            phase: RwSignal::new(SessionPhase::default()),
            message: RwSignal::new(String::new()),
        }
    }
}

impl Default for SignalAuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEvents for SignalAuthEvents {
    fn auth_changed(&self, state: &AuthState) {
        self.auth.set(state.clone());
    }

    fn phase_changed(&self, phase: SessionPhase) {
        self.phase.set(phase);
    }

    fn notice(&self, message: &str) {
        self.message.set(message.to_owned());
    }
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session controller, event signals, and preference store via
/// context, then runs the startup sequence exactly once: callback handling,
/// status refresh, navigation guard, in that order.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let events = SignalAuthEvents::new();
    let controller = AuthSessionController::new(
        HttpAuthApi::new(CredentialTransport::default()),
        BrowserNavigator,
        LocalStore,
        events,
    );
    let prefs = PreferenceStore::load(LocalStore);

    provide_context(events);
    provide_context(controller.clone());
    provide_context(prefs);

    dark_mode::apply(dark_mode::read_preference(&LocalStore));

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        controller.start_session().await;
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/stockboard.css"/>
        <Title text="Stockboard"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("") view=DashboardPage/>
            </Routes>
        </Router>
    }
}
