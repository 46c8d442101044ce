//! Bearer credential ownership: in-memory copy plus durable backing.
//!
//! DESIGN
//! ======
//! This store holds the only canonical copy of the credential. Resolution
//! order on a cold start is fixed: a token delivered via the navigation's
//! query parameters wins over a previously persisted one, and whichever
//! source wins is written through to durable storage before `resolve`
//! returns, so a hard refresh does not lose it. Callers strip the token
//! from the visible URL before handing it in.

#[cfg(test)]
#[path = "credential_test.rs"]
mod credential_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::util::storage::{DurableStore, keys};

/// Owner of the active bearer credential.
#[derive(Clone, Debug)]
pub struct CredentialStore<S: DurableStore> {
    store: S,
    current: Rc<RefCell<Option<String>>>,
}

impl<S: DurableStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store, current: Rc::new(RefCell::new(None)) }
    }

    /// Resolve the active credential for this page load.
    ///
    /// Precedence: the navigation parameter, then durable storage, then
    /// none. Writes are idempotent: resolving the same parameter twice
    /// stores it once.
    pub fn resolve(&self, navigation_param: Option<&str>) -> Option<String> {
        if let Some(token) = navigation_param.filter(|token| !token.is_empty()) {
            if self.store.get(keys::CREDENTIAL).as_deref() != Some(token) {
                self.store.set(keys::CREDENTIAL, token);
            }
            *self.current.borrow_mut() = Some(token.to_owned());
            return Some(token.to_owned());
        }

        let stored = self.store.get(keys::CREDENTIAL).filter(|token| !token.is_empty());
        self.current.borrow_mut().clone_from(&stored);
        stored
    }

    /// Replace the credential; `None` clears both copies (logout, or a
    /// backend-rejected token).
    pub fn set(&self, credential: Option<&str>) {
        match credential {
            Some(token) => {
                self.store.set(keys::CREDENTIAL, token);
                *self.current.borrow_mut() = Some(token.to_owned());
            }
            None => {
                self.store.remove(keys::CREDENTIAL);
                *self.current.borrow_mut() = None;
            }
        }
    }

    /// The in-memory copy; no storage I/O.
    pub fn get(&self) -> Option<String> {
        self.current.borrow().clone()
    }
}
