//! One-time CSRF state for the OAuth redirect round trip.
//!
//! DESIGN
//! ======
//! The stored value is single-use: verification deletes it no matter the
//! outcome, so a forged or replayed callback can never be checked against a
//! token that already served one round trip. A callback with no stored value
//! is always rejected.

#[cfg(test)]
#[path = "csrf_test.rs"]
mod csrf_test;

use uuid::Uuid;

use crate::util::storage::{DurableStore, keys};

/// Guard owning the persisted CSRF state.
#[derive(Clone, Debug)]
pub struct CsrfStateGuard<S: DurableStore> {
    store: S,
}

impl<S: DurableStore> CsrfStateGuard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Generate, persist, and return a fresh state token.
    ///
    /// Client-generated variant; a UUIDv4 carries 122 random bits, enough to
    /// resist guessing across a short-lived redirect.
    pub fn issue(&self) -> String {
        let state = Uuid::new_v4().simple().to_string();
        self.store.set(keys::CSRF_STATE, &state);
        state
    }

    /// Persist a backend-generated state token for the pending redirect.
    ///
    /// Deployed variant: the identity endpoint issues the state and the
    /// client's only job is to keep it across the round trip.
    pub fn adopt(&self, state: &str) {
        self.store.set(keys::CSRF_STATE, state);
    }

    /// Consume the stored token and compare it with the callback's.
    ///
    /// The stored value is deleted unconditionally before the comparison
    /// result is returned. Returns `false` when nothing was stored.
    pub fn consume_and_verify(&self, received: &str) -> bool {
        let stored = self.store.get(keys::CSRF_STATE);
        self.store.remove(keys::CSRF_STATE);
        stored.is_some_and(|token| token == received)
    }

    /// Drop any stored token without verification (logout path).
    pub fn clear(&self) {
        self.store.remove(keys::CSRF_STATE);
    }
}
