//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior
//! for in-page transitions after the startup guard has run.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::{AuthState, SessionPhase};
use crate::util::navigation::PUBLIC_VIEW;

/// Whether an app view should bounce to the login page.
///
/// Never redirects before the startup sequence settles, so a page mounted
/// mid-refresh does not flicker through the login screen.
pub fn should_redirect_unauth(phase: SessionPhase, state: &AuthState) -> bool {
    phase == SessionPhase::Settled && !state.is_authenticated()
}

/// Redirect to the login page whenever the session settles unauthenticated.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, phase: RwSignal<SessionPhase>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(phase.get(), &auth.get()) {
            navigate(PUBLIC_VIEW, NavigateOptions::default());
        }
    });
}
