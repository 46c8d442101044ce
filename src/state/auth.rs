//! Authentication state as observed by the UI.
//!
//! DESIGN
//! ======
//! The session controller owns the canonical value and pushes changes out
//! through [`AuthEvents`]; pages only ever read the mirrored signal. Nothing
//! here is persisted; the state is re-derived from `/auth/status` on every
//! page load.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::UserProfile;

/// Whether the current page load has an authenticated session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No confirmed session.
    #[default]
    Unauthenticated,
    /// Backend-confirmed session with the reported profile.
    Authenticated(UserProfile),
}

impl AuthState {
    /// Whether a backend-confirmed session exists.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The authenticated profile, if any.
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            Self::Unauthenticated => None,
        }
    }
}

/// Where the startup sequence currently stands.
///
/// The machine runs `Initializing → (CallbackPending | DirectLoad) →
/// Settled` exactly once per page load; a full-page redirect restarts it
/// from `Initializing`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup has not inspected the navigation yet.
    #[default]
    Initializing,
    /// The navigation carried an authorization code; exchange in progress.
    CallbackPending,
    /// Plain load without a callback; straight to status refresh.
    DirectLoad,
    /// Status refresh finished; `AuthState` is authoritative.
    Settled,
}

/// UI callbacks the session controller notifies.
///
/// Implemented over reactive signals in the app shell and by a recorder in
/// tests, so the controller never touches a rendering layer directly.
pub trait AuthEvents {
    /// The authentication state changed.
    fn auth_changed(&self, state: &AuthState);
    /// The startup sequence moved to a new phase.
    fn phase_changed(&self, phase: SessionPhase);
    /// A user-visible, non-fatal notice (failed sign-in, backend outage).
    fn notice(&self, message: &str);
}
