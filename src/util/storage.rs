//! Durable key/value persistence over browser `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every durable value the client keeps (credential, OAuth state, session
//! preferences, theme) goes through this module so storage access stays in
//! one place and the rest of the crate can run against an in-memory store
//! in tests and on the server.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Stable storage keys shared with past and future page loads.
pub mod keys {
    /// One-time OAuth CSRF state, pending a callback redirect.
    pub const CSRF_STATE: &str = "stockboard_oauth_state";
    /// Bearer credential for the active session.
    pub const CREDENTIAL: &str = "stockboard_access_token";
    /// Session preferences record (session id, last symbol, sidebar flag).
    pub const SESSION_PREFS: &str = "stockboard_session";
    /// Dark mode preference ("true"/"false").
    pub const DARK_MODE: &str = "stockboard_dark";
}

/// Durable string key/value store surviving page reloads.
///
/// Implementations are cheap cloneable handles; cloning shares the same
/// underlying storage.
pub trait DurableStore: Clone {
    /// Read the raw value under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Write the raw value under `key`.
    fn set(&self, key: &str, value: &str);
    /// Delete the value under `key`.
    fn remove(&self, key: &str);

    /// Load and deserialize a JSON value under `key`.
    ///
    /// An unreadable value is discarded with a warning rather than surfaced;
    /// callers fall back to their defaults.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("discarding unreadable stored value under {key}: {err}");
                None
            }
        }
    }

    /// Serialize and store a JSON value under `key`.
    ///
    /// Serialization failures are logged and swallowed.
    fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, &raw),
            Err(err) => log::warn!("failed to serialize value for {key}: {err}"),
        }
    }
}

/// `localStorage`-backed store.
///
/// Outside the browser (SSR) every operation is a no-op, matching the rest
/// of the hydrate-gated modules.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl DurableStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
            storage.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
                let _ = storage.set_item(key, value);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }
}

/// In-memory store with `localStorage` semantics, for tests and headless use.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
