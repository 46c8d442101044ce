//! Durable session preferences (non-authentication session data).
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend's chat and backtesting endpoints accept a correlation id so
//! conversational context survives reloads; the dashboard restores the last
//! viewed symbol and sidebar layout from the same record. None of this is
//! security data and the credential must never be stored here.

#[cfg(test)]
#[path = "prefs_test.rs"]
mod prefs_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::storage::{DurableStore, keys};

/// The persisted preferences record.
///
/// `session_id` is generated once per durable-storage lifetime and reused
/// until the record itself is cleared; it is a correlation id, not a
/// credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPreferences {
    /// Stable correlation id for backend chat/backtesting context.
    pub session_id: String,
    /// Ticker symbol the user last viewed.
    #[serde(default)]
    pub last_symbol: Option<String>,
    /// Whether the watchlist sidebar is collapsed.
    #[serde(default)]
    pub sidebar_collapsed: bool,
}

impl SessionPreferences {
    fn fresh() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            last_symbol: None,
            sidebar_collapsed: false,
        }
    }
}

/// Handle owning the in-memory preferences and their durable backing.
///
/// Every mutation persists immediately; rapid successive mutations are
/// last-write-wins, which is all the record needs.
#[derive(Clone, Debug)]
pub struct PreferenceStore<S: DurableStore> {
    store: S,
    current: Rc<RefCell<SessionPreferences>>,
}

impl<S: DurableStore> PreferenceStore<S> {
    /// Restore preferences from durable storage, generating a new
    /// `session_id` only when none is stored (or the record is unreadable).
    pub fn load(store: S) -> Self {
        let current = match store.load_json::<SessionPreferences>(keys::SESSION_PREFS) {
            Some(prefs) => prefs,
            None => {
                let prefs = SessionPreferences::fresh();
                store.save_json(keys::SESSION_PREFS, &prefs);
                prefs
            }
        };
        Self { store, current: Rc::new(RefCell::new(current)) }
    }

    /// Snapshot of the current record.
    pub fn get(&self) -> SessionPreferences {
        self.current.borrow().clone()
    }

    /// The stable correlation id.
    pub fn session_id(&self) -> String {
        self.current.borrow().session_id.clone()
    }

    /// Record the symbol the user is viewing.
    pub fn set_last_symbol(&self, symbol: Option<&str>) {
        self.current.borrow_mut().last_symbol = symbol.map(str::to_owned);
        self.save();
    }

    /// Record the sidebar collapsed/expanded choice.
    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.current.borrow_mut().sidebar_collapsed = collapsed;
        self.save();
    }

    fn save(&self) {
        self.store.save_json(keys::SESSION_PREFS, &*self.current.borrow());
    }
}
