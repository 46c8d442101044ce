use super::*;

use std::cell::Cell;
use std::collections::HashMap;

use futures::executor::block_on;

use crate::net::types::{AuthStatus, CallbackExchange, LoginStart, UserProfile};
use crate::util::storage::{MemoryStore, keys};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockApiInner {
    login_response: RefCell<Option<Result<LoginStart, String>>>,
    exchange_response: RefCell<Option<Result<CallbackExchange, String>>>,
    status_response: RefCell<Option<Result<AuthStatus, String>>>,
    logout_fails: Cell<bool>,
    exchange_calls: Cell<usize>,
    status_calls: Cell<usize>,
    logout_calls: Cell<usize>,
    last_status_credential: RefCell<Option<Option<String>>>,
}

#[derive(Clone, Default)]
struct MockApi(Rc<MockApiInner>);

impl MockApi {
    fn with_login(self, response: Result<LoginStart, String>) -> Self {
        *self.0.login_response.borrow_mut() = Some(response);
        self
    }

    fn with_exchange(self, response: Result<CallbackExchange, String>) -> Self {
        *self.0.exchange_response.borrow_mut() = Some(response);
        self
    }

    fn with_status(self, response: Result<AuthStatus, String>) -> Self {
        *self.0.status_response.borrow_mut() = Some(response);
        self
    }

    fn failing_logout(self) -> Self {
        self.0.logout_fails.set(true);
        self
    }
}

impl AuthApi for MockApi {
    async fn login_start(&self) -> Result<LoginStart, String> {
        self.0
            .login_response
            .borrow()
            .clone()
            .unwrap_or_else(|| Err("no login response configured".to_owned()))
    }

    async fn exchange_code(&self, _code: &str, _state: &str, _stored_state: &str) -> Result<CallbackExchange, String> {
        self.0.exchange_calls.set(self.0.exchange_calls.get() + 1);
        self.0
            .exchange_response
            .borrow()
            .clone()
            .unwrap_or_else(|| Err("no exchange response configured".to_owned()))
    }

    async fn auth_status(&self, credential: Option<&str>) -> Result<AuthStatus, String> {
        self.0.status_calls.set(self.0.status_calls.get() + 1);
        *self.0.last_status_credential.borrow_mut() = Some(credential.map(str::to_owned));
        self.0
            .status_response
            .borrow()
            .clone()
            .unwrap_or_else(|| Err("no status response configured".to_owned()))
    }

    async fn logout(&self, _credential: Option<&str>) -> Result<(), String> {
        self.0.logout_calls.set(self.0.logout_calls.get() + 1);
        if self.0.logout_fails.get() {
            Err("offline".to_owned())
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct NavigatorInner {
    path: RefCell<String>,
    params: RefCell<HashMap<String, String>>,
    stripped: RefCell<Vec<String>>,
    redirects: RefCell<Vec<String>>,
}

#[derive(Clone, Default)]
struct RecordingNavigator(Rc<NavigatorInner>);

impl RecordingNavigator {
    fn at(path: &str) -> Self {
        let nav = Self::default();
        *nav.0.path.borrow_mut() = path.to_owned();
        nav
    }

    fn with_param(self, key: &str, value: &str) -> Self {
        self.0.params.borrow_mut().insert(key.to_owned(), value.to_owned());
        self
    }

    fn redirects(&self) -> Vec<String> {
        self.0.redirects.borrow().clone()
    }

    fn stripped(&self) -> Vec<String> {
        self.0.stripped.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn path(&self) -> String {
        self.0.path.borrow().clone()
    }

    fn query_param(&self, key: &str) -> Option<String> {
        self.0.params.borrow().get(key).cloned()
    }

    fn strip_query_params(&self, keys: &[&str]) {
        let mut params = self.0.params.borrow_mut();
        for key in keys {
            params.remove(*key);
            self.0.stripped.borrow_mut().push((*key).to_owned());
        }
    }

    fn redirect(&self, target: &str) {
        self.0.redirects.borrow_mut().push(target.to_owned());
    }
}

#[derive(Default)]
struct EventsInner {
    states: RefCell<Vec<AuthState>>,
    phases: RefCell<Vec<SessionPhase>>,
    notices: RefCell<Vec<String>>,
}

#[derive(Clone, Default)]
struct RecordingEvents(Rc<EventsInner>);

impl RecordingEvents {
    fn notices(&self) -> Vec<String> {
        self.0.notices.borrow().clone()
    }

    fn phases(&self) -> Vec<SessionPhase> {
        self.0.phases.borrow().clone()
    }

    fn state_changes(&self) -> usize {
        self.0.states.borrow().len()
    }
}

impl AuthEvents for RecordingEvents {
    fn auth_changed(&self, state: &AuthState) {
        self.0.states.borrow_mut().push(state.clone());
    }

    fn phase_changed(&self, phase: SessionPhase) {
        self.0.phases.borrow_mut().push(phase);
    }

    fn notice(&self, message: &str) {
        self.0.notices.borrow_mut().push(message.to_owned());
    }
}

/// Store wrapper counting write operations, for idempotence checks.
#[derive(Clone, Default)]
struct CountingStore {
    inner: MemoryStore,
    writes: Rc<Cell<usize>>,
}

impl DurableStore for CountingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }
    fn set(&self, key: &str, value: &str) {
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value);
    }
    fn remove(&self, key: &str) {
        self.inner.remove(key);
    }
}

type TestController<S> = AuthSessionController<MockApi, RecordingNavigator, S, RecordingEvents>;

struct Harness {
    api: MockApi,
    nav: RecordingNavigator,
    store: MemoryStore,
    events: RecordingEvents,
    controller: TestController<MemoryStore>,
}

fn harness(api: MockApi, nav: RecordingNavigator) -> Harness {
    let store = MemoryStore::default();
    let events = RecordingEvents::default();
    let controller = AuthSessionController::new(api.clone(), nav.clone(), store.clone(), events.clone());
    Harness { api, nav, store, events, controller }
}

fn alice() -> UserProfile {
    UserProfile { name: "Alice".to_owned(), picture: None }
}

fn authenticated_status() -> AuthStatus {
    AuthStatus { authenticated: true, user: Some(alice()) }
}

fn unauthenticated_status() -> AuthStatus {
    AuthStatus::default()
}

// ---------------------------------------------------------------------------
// Login initiation
// ---------------------------------------------------------------------------

#[test]
fn begin_login_persists_state_and_redirects() {
    let api = MockApi::default().with_login(Ok(LoginStart {
        auth_url: Some("https://idp/authorize".to_owned()),
        state: Some("abc123".to_owned()),
    }));
    let h = harness(api, RecordingNavigator::at("/login"));

    block_on(h.controller.begin_login());

    assert_eq!(h.store.get(keys::CSRF_STATE), Some("abc123".to_owned()));
    assert_eq!(h.nav.redirects(), vec!["https://idp/authorize".to_owned()]);
    assert_eq!(h.events.notices(), Vec::<String>::new());
}

#[test]
fn begin_login_network_failure_never_redirects() {
    let api = MockApi::default().with_login(Err("connection refused".to_owned()));
    let h = harness(api, RecordingNavigator::at("/login"));

    block_on(h.controller.begin_login());

    assert!(h.nav.redirects().is_empty());
    assert_eq!(h.store.get(keys::CSRF_STATE), None);
    assert_eq!(h.events.notices(), vec!["Sign-in failed: connection refused".to_owned()]);
    assert_eq!(h.controller.state(), AuthState::Unauthenticated);
}

#[test]
fn begin_login_malformed_response_never_redirects() {
    let api = MockApi::default().with_login(Ok(LoginStart::default()));
    let h = harness(api, RecordingNavigator::at("/login"));

    block_on(h.controller.begin_login());

    assert!(h.nav.redirects().is_empty());
    assert_eq!(h.events.notices(), vec![SIGN_IN_UNAVAILABLE.to_owned()]);
}

// ---------------------------------------------------------------------------
// Callback handling
// ---------------------------------------------------------------------------

#[test]
fn verified_callback_authenticates() {
    let api = MockApi::default()
        .with_exchange(Ok(CallbackExchange {
            success: true,
            access_token: Some("tok-1".to_owned()),
            error: None,
        }))
        .with_status(Ok(authenticated_status()));
    let nav = RecordingNavigator::at("/")
        .with_param("code", "xyz")
        .with_param("state", "abc123");
    let h = harness(api, nav);
    h.store.set(keys::CSRF_STATE, "abc123");

    block_on(h.controller.start_session());

    assert_eq!(h.api.0.exchange_calls.get(), 1);
    assert_eq!(h.store.get(keys::CREDENTIAL), Some("tok-1".to_owned()));
    assert_eq!(h.store.get(keys::CSRF_STATE), None);
    assert_eq!(h.controller.state(), AuthState::Authenticated(alice()));
    assert_eq!(
        h.api.0.last_status_credential.borrow().clone(),
        Some(Some("tok-1".to_owned()))
    );
    // Code and state never stay visible in the address bar.
    assert_eq!(h.nav.stripped(), vec!["code".to_owned(), "state".to_owned()]);
    // Authenticated on an app view: the guard has nothing to do.
    assert!(h.nav.redirects().is_empty());
    assert_eq!(
        h.events.phases(),
        vec![SessionPhase::CallbackPending, SessionPhase::Settled]
    );
}

#[test]
fn mismatched_state_skips_the_exchange() {
    let api = MockApi::default().with_status(Ok(unauthenticated_status()));
    let nav = RecordingNavigator::at("/")
        .with_param("code", "xyz")
        .with_param("state", "wrong");
    let h = harness(api, nav);
    h.store.set(keys::CSRF_STATE, "abc123");

    block_on(h.controller.start_session());

    assert_eq!(h.api.0.exchange_calls.get(), 0);
    assert_eq!(h.controller.state(), AuthState::Unauthenticated);
    assert!(h.events.notices().contains(&SIGN_IN_REJECTED.to_owned()));
    // Single use: the stored state is consumed by the failed verification.
    assert_eq!(h.store.get(keys::CSRF_STATE), None);
    // URL is scrubbed whether or not verification succeeds.
    assert_eq!(h.nav.stripped(), vec!["code".to_owned(), "state".to_owned()]);
    // Unauthenticated on an app view: the guard sends the user to login.
    assert_eq!(h.nav.redirects(), vec![PUBLIC_VIEW.to_owned()]);
}

#[test]
fn callback_without_pending_state_is_rejected() {
    let api = MockApi::default().with_status(Ok(unauthenticated_status()));
    let nav = RecordingNavigator::at("/")
        .with_param("code", "xyz")
        .with_param("state", "abc123");
    let h = harness(api, nav);

    block_on(h.controller.start_session());

    assert_eq!(h.api.0.exchange_calls.get(), 0);
    assert!(h.events.notices().contains(&SIGN_IN_REJECTED.to_owned()));
}

#[test]
fn rejected_exchange_surfaces_the_backend_reason() {
    let api = MockApi::default()
        .with_exchange(Ok(CallbackExchange {
            success: false,
            access_token: None,
            error: Some("bad code".to_owned()),
        }))
        .with_status(Ok(unauthenticated_status()));
    let nav = RecordingNavigator::at("/")
        .with_param("code", "xyz")
        .with_param("state", "abc123");
    let h = harness(api, nav);
    h.store.set(keys::CSRF_STATE, "abc123");

    block_on(h.controller.start_session());

    assert!(h.events.notices().contains(&"Sign-in failed: bad code".to_owned()));
    assert_eq!(h.store.get(keys::CREDENTIAL), None);
}

#[test]
fn cookie_variant_callback_succeeds_without_a_token() {
    let api = MockApi::default()
        .with_exchange(Ok(CallbackExchange { success: true, access_token: None, error: None }))
        .with_status(Ok(authenticated_status()));
    let nav = RecordingNavigator::at("/")
        .with_param("code", "xyz")
        .with_param("state", "abc123");
    let h = harness(api, nav);
    h.store.set(keys::CSRF_STATE, "abc123");

    block_on(h.controller.start_session());

    assert_eq!(h.store.get(keys::CREDENTIAL), None);
    assert_eq!(h.controller.state(), AuthState::Authenticated(alice()));
    assert_eq!(h.events.notices(), Vec::<String>::new());
}

#[test]
fn plain_load_goes_straight_to_refresh() {
    let api = MockApi::default().with_status(Ok(authenticated_status()));
    let h = harness(api, RecordingNavigator::at("/"));

    block_on(h.controller.start_session());

    assert_eq!(h.api.0.exchange_calls.get(), 0);
    assert_eq!(h.events.phases(), vec![SessionPhase::DirectLoad, SessionPhase::Settled]);
}

// ---------------------------------------------------------------------------
// Status refresh
// ---------------------------------------------------------------------------

#[test]
fn rejected_credential_is_cleared_on_refresh() {
    let api = MockApi::default().with_status(Ok(unauthenticated_status()));
    let h = harness(api, RecordingNavigator::at("/"));
    h.store.set(keys::CREDENTIAL, "stale-token");

    block_on(h.controller.refresh());

    assert_eq!(h.store.get(keys::CREDENTIAL), None);
    assert_eq!(h.controller.credentials.get(), None);
    assert_eq!(h.controller.state(), AuthState::Unauthenticated);
    assert_eq!(h.controller.phase(), SessionPhase::Settled);
}

#[test]
fn refresh_twice_is_idempotent() {
    let api = MockApi::default().with_status(Ok(authenticated_status()));
    let nav = RecordingNavigator::at("/");
    let store = CountingStore::default();
    store.set(keys::CREDENTIAL, "tok-1");
    let events = RecordingEvents::default();
    let controller = AuthSessionController::new(api, nav, store.clone(), events.clone());

    block_on(controller.refresh());
    let state_after_first = controller.state();
    let writes_after_first = store.writes.get();

    block_on(controller.refresh());

    assert_eq!(controller.state(), state_after_first);
    assert_eq!(store.writes.get(), writes_after_first);
    assert_eq!(events.state_changes(), 1);
}

#[test]
fn url_delivered_token_is_stripped_and_stored() {
    let api = MockApi::default().with_status(Ok(authenticated_status()));
    let nav = RecordingNavigator::at("/").with_param("access_token", "tok-9");
    let h = harness(api, nav);

    block_on(h.controller.refresh());

    assert_eq!(h.nav.stripped(), vec!["access_token".to_owned()]);
    assert_eq!(h.store.get(keys::CREDENTIAL), Some("tok-9".to_owned()));
    assert_eq!(
        h.api.0.last_status_credential.borrow().clone(),
        Some(Some("tok-9".to_owned()))
    );
}

#[test]
fn refresh_transport_failure_keeps_last_known_state() {
    let api = MockApi::default().with_status(Err("timeout".to_owned()));
    let h = harness(api, RecordingNavigator::at("/"));

    block_on(h.controller.refresh());

    assert_eq!(h.controller.state(), AuthState::Unauthenticated);
    assert_eq!(h.events.notices(), vec![STATUS_UNAVAILABLE.to_owned()]);
    assert_eq!(h.controller.phase(), SessionPhase::Settled);
}

// ---------------------------------------------------------------------------
// Navigation guard
// ---------------------------------------------------------------------------

#[test]
fn authenticated_user_on_login_is_sent_to_the_app() {
    let api = MockApi::default().with_status(Ok(authenticated_status()));
    let h = harness(api, RecordingNavigator::at("/login"));

    block_on(h.controller.start_session());

    assert_eq!(h.nav.redirects(), vec![crate::util::navigation::APP_VIEW.to_owned()]);
}

#[test]
fn unauthenticated_user_on_the_app_is_sent_to_login() {
    let api = MockApi::default().with_status(Ok(unauthenticated_status()));
    let h = harness(api, RecordingNavigator::at("/"));

    block_on(h.controller.start_session());

    assert_eq!(h.nav.redirects(), vec![PUBLIC_VIEW.to_owned()]);
}

#[test]
fn unauthenticated_user_on_login_stays_put() {
    let api = MockApi::default().with_status(Ok(unauthenticated_status()));
    let h = harness(api, RecordingNavigator::at("/login"));

    block_on(h.controller.start_session());

    assert!(h.nav.redirects().is_empty());
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[test]
fn logout_clears_session_and_redirects() {
    let api = MockApi::default().with_status(Ok(authenticated_status()));
    let h = harness(api, RecordingNavigator::at("/"));
    h.store.set(keys::CREDENTIAL, "tok-1");
    h.store.set(keys::CSRF_STATE, "leftover");
    block_on(h.controller.refresh());

    block_on(h.controller.logout());

    assert_eq!(h.api.0.logout_calls.get(), 1);
    assert_eq!(h.store.get(keys::CREDENTIAL), None);
    assert_eq!(h.store.get(keys::CSRF_STATE), None);
    assert_eq!(h.controller.state(), AuthState::Unauthenticated);
    assert_eq!(h.nav.redirects(), vec![PUBLIC_VIEW.to_owned()]);
}

#[test]
fn logout_proceeds_when_the_network_is_down() {
    let api = MockApi::default()
        .with_status(Ok(authenticated_status()))
        .failing_logout();
    let h = harness(api, RecordingNavigator::at("/"));
    h.store.set(keys::CREDENTIAL, "tok-1");
    block_on(h.controller.refresh());
    assert!(h.controller.state().is_authenticated());

    block_on(h.controller.logout());

    assert_eq!(h.store.get(keys::CREDENTIAL), None);
    assert_eq!(h.controller.credentials.get(), None);
    assert_eq!(h.controller.state(), AuthState::Unauthenticated);
    assert_eq!(h.nav.redirects(), vec![PUBLIC_VIEW.to_owned()]);
}
