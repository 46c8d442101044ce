//! Dark mode initialization and toggle.
//!
//! Reads the user's preference from durable storage and applies a
//! `data-theme` attribute to the `<html>` element. Toggle writes back and
//! updates that attribute. Requires a browser environment for the attribute
//! and system-preference parts; SSR paths safely no-op.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use crate::util::storage::{DurableStore, keys};

/// Read the dark mode preference.
///
/// Returns `true` if the user previously enabled dark mode, or if the system
/// prefers dark mode and no preference is stored.
pub fn read_preference(store: &impl DurableStore) -> bool {
    if let Some(value) = store.get(keys::DARK_MODE) {
        return value == "true";
    }

    system_prefers_dark()
}

fn system_prefers_dark() -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map_or(false, |mq| mq.matches())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Apply the `data-theme` attribute on the `<html>` element.
pub fn apply(enabled: bool) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = doc.document_element() {
                let _ = el.set_attribute("data-theme", if enabled { "dark" } else { "light" });
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = enabled;
    }
}

/// Toggle dark mode and persist the new preference.
pub fn toggle(store: &impl DurableStore, current: bool) -> bool {
    let next = !current;
    apply(next);
    store.set(keys::DARK_MODE, if next { "true" } else { "false" });
    next
}
