//! The authentication session state machine.
//!
//! ARCHITECTURE
//! ============
//! One controller instance drives a whole page-load cycle:
//! `start_session()` runs callback handling, then status refresh, then the
//! navigation guard, in that strict order; each step depends on state the
//! previous one wrote. Redirects are terminal transitions: the method
//! returns right after asking the navigator to leave the page.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here throws past the public entry points. Transport failures and
//! CSRF mismatches become a state transition plus a user-visible notice;
//! the worst outcome of any failure is staying unauthenticated with a
//! message on screen.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::auth::credential::CredentialStore;
use crate::auth::csrf::CsrfStateGuard;
use crate::net::api::AuthApi;
use crate::state::auth::{AuthEvents, AuthState, SessionPhase};
use crate::util::navigation::{Navigator, PUBLIC_VIEW, classify_view, guard_target};
use crate::util::storage::DurableStore;

const SIGN_IN_UNAVAILABLE: &str = "Sign-in is unavailable right now. Please try again.";
const SIGN_IN_REJECTED: &str = "Sign-in attempt could not be verified. Please try again.";
const STATUS_UNAVAILABLE: &str = "Could not reach the server to check your session.";

fn sign_in_failed_message(reason: &str) -> String {
    format!("Sign-in failed: {reason}")
}

/// Client half of the OAuth2 handshake and owner of the session lifecycle.
///
/// Generic over its capabilities so the whole machine runs against in-memory
/// fakes; the app shell instantiates it with the browser-backed
/// implementations.
#[derive(Clone)]
pub struct AuthSessionController<A, N, S, E>
where
    A: AuthApi,
    N: Navigator,
    S: DurableStore,
    E: AuthEvents,
{
    api: A,
    nav: N,
    csrf: CsrfStateGuard<S>,
    credentials: CredentialStore<S>,
    state: Rc<RefCell<AuthState>>,
    phase: Rc<RefCell<SessionPhase>>,
    events: E,
}

impl<A, N, S, E> AuthSessionController<A, N, S, E>
where
    A: AuthApi,
    N: Navigator,
    S: DurableStore,
    E: AuthEvents,
{
    pub fn new(api: A, nav: N, store: S, events: E) -> Self {
        Self {
            api,
            nav,
            csrf: CsrfStateGuard::new(store.clone()),
            credentials: CredentialStore::new(store),
            state: Rc::new(RefCell::new(AuthState::Unauthenticated)),
            phase: Rc::new(RefCell::new(SessionPhase::Initializing)),
            events,
        }
    }

    /// Current authentication state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Where the startup sequence stands.
    pub fn phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    /// Run the whole startup sequence for this page load.
    ///
    /// Callback handling completes (including its storage writes) before the
    /// status refresh starts, and the guard runs exactly once, after the
    /// refresh settles.
    pub async fn start_session(&self) {
        self.handle_callback().await;
        self.refresh().await;
        self.guard_navigation();
    }

    /// Begin the login handshake.
    ///
    /// Asks the backend for an authorization URL and its CSRF state,
    /// persists the state, and leaves the page. On any failure the state
    /// machine stays put and the user sees a notice, never a redirect.
    pub async fn begin_login(&self) {
        match self.api.login_start().await {
            Ok(response) => match response.into_redirect() {
                Some((auth_url, state)) => {
                    self.csrf.adopt(&state);
                    self.nav.redirect(&auth_url);
                }
                None => self.events.notice(SIGN_IN_UNAVAILABLE),
            },
            Err(err) => {
                log::warn!("login initiation failed: {err}");
                self.events.notice(&sign_in_failed_message(&err));
            }
        }
    }

    /// Handle an OAuth callback navigation, if this is one.
    ///
    /// No-op when the navigation carries no authorization code. Otherwise
    /// the code and state are scrubbed from the URL before anything else,
    /// the stored CSRF state is consumed, and only a verified callback is
    /// exchanged for a credential.
    pub async fn handle_callback(&self) {
        let code = self.nav.query_param("code").filter(|code| !code.is_empty());
        let Some(code) = code else {
            self.set_phase(SessionPhase::DirectLoad);
            return;
        };

        self.set_phase(SessionPhase::CallbackPending);
        let received_state = self.nav.query_param("state").unwrap_or_default();
        self.nav.strip_query_params(&["code", "state"]);

        if !self.csrf.consume_and_verify(&received_state) {
            log::warn!("oauth callback rejected: state mismatch or no pending login");
            self.events.notice(SIGN_IN_REJECTED);
            self.set_state(AuthState::Unauthenticated);
            return;
        }

        // Verified, so the received state is byte-equal to the stored one.
        match self.api.exchange_code(&code, &received_state, &received_state).await {
            Ok(exchange) if exchange.success => {
                if let Some(token) = exchange.access_token {
                    self.credentials.set(Some(&token));
                }
                // Cookie deployments confirm success with no token; the
                // session rides on the ambient cookie from here.
            }
            Ok(exchange) => {
                let reason = exchange.error.unwrap_or_else(|| "rejected by server".to_owned());
                log::warn!("code exchange rejected: {reason}");
                self.events.notice(&sign_in_failed_message(&reason));
            }
            Err(err) => {
                log::warn!("code exchange failed: {err}");
                self.events.notice(&sign_in_failed_message(&err));
            }
        }
    }

    /// Re-derive the authentication state from the backend.
    ///
    /// Resolves the active credential (a token in the query wins over the
    /// persisted one), attaches it to the status request, and applies the
    /// verdict. A credential the backend no longer accepts is cleared on
    /// the spot so it never outlives one failed check.
    pub async fn refresh(&self) {
        let nav_token = self.nav.query_param("access_token").filter(|token| !token.is_empty());
        if nav_token.is_some() {
            self.nav.strip_query_params(&["access_token"]);
        }
        let credential = self.credentials.resolve(nav_token.as_deref());

        match self.api.auth_status(credential.as_deref()).await {
            Ok(status) => {
                if status.authenticated {
                    self.set_state(AuthState::Authenticated(status.user.unwrap_or_default()));
                } else {
                    if credential.is_some() {
                        self.credentials.set(None);
                    }
                    self.set_state(AuthState::Unauthenticated);
                }
            }
            Err(err) => {
                // Last-known state stands; the user just sees a notice.
                log::warn!("status refresh failed: {err}");
                self.events.notice(STATUS_UNAVAILABLE);
            }
        }
        self.set_phase(SessionPhase::Settled);
    }

    /// Apply the public/authenticated navigation guard.
    ///
    /// Runs once per page load, after `refresh()`. A redirect here is
    /// terminal; the next load re-runs the machine from scratch.
    pub fn guard_navigation(&self) {
        let view = classify_view(&self.nav.path());
        let authenticated = self.state.borrow().is_authenticated();
        if let Some(target) = guard_target(authenticated, view) {
            self.nav.redirect(target);
        }
    }

    /// Tear the session down and leave for the public view.
    ///
    /// The server call is best-effort: a failure is logged, never blocking.
    /// The local credential, CSRF state, and auth state are cleared and the
    /// redirect happens regardless.
    pub async fn logout(&self) {
        let credential = self.credentials.get();
        if let Err(err) = self.api.logout(credential.as_deref()).await {
            log::warn!("logout request failed, clearing session locally: {err}");
        }
        self.credentials.set(None);
        self.csrf.clear();
        self.set_state(AuthState::Unauthenticated);
        self.nav.redirect(PUBLIC_VIEW);
    }

    fn set_state(&self, next: AuthState) {
        let changed = {
            let mut current = self.state.borrow_mut();
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        };
        if changed {
            self.events.auth_changed(&self.state.borrow());
        }
    }

    fn set_phase(&self, next: SessionPhase) {
        *self.phase.borrow_mut() = next;
        self.events.phase_changed(next);
    }
}
