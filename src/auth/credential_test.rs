use super::*;
use crate::util::storage::MemoryStore;

use std::cell::Cell;

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

#[test]
fn resolve_prefers_navigation_param_and_overwrites_storage() {
    let store = MemoryStore::default();
    store.set(keys::CREDENTIAL, "stale-token");
    let credentials = CredentialStore::new(store.clone());

    assert_eq!(credentials.resolve(Some("fresh-token")), Some("fresh-token".to_owned()));
    assert_eq!(store.get(keys::CREDENTIAL), Some("fresh-token".to_owned()));
    assert_eq!(credentials.get(), Some("fresh-token".to_owned()));
}

#[test]
fn resolve_falls_back_to_durable_storage() {
    let store = MemoryStore::default();
    store.set(keys::CREDENTIAL, "persisted-token");
    let credentials = CredentialStore::new(store);

    assert_eq!(credentials.resolve(None), Some("persisted-token".to_owned()));
    assert_eq!(credentials.get(), Some("persisted-token".to_owned()));
}

#[test]
fn resolve_with_nothing_available_is_none() {
    let credentials = CredentialStore::new(MemoryStore::default());
    assert_eq!(credentials.resolve(None), None);
    assert_eq!(credentials.get(), None);
}

#[test]
fn resolve_ignores_empty_navigation_param() {
    let store = MemoryStore::default();
    store.set(keys::CREDENTIAL, "persisted-token");
    let credentials = CredentialStore::new(store);
    assert_eq!(credentials.resolve(Some("")), Some("persisted-token".to_owned()));
}

#[test]
fn resolving_the_same_param_twice_writes_once() {
    let store = CountingStore::default();
    let credentials = CredentialStore::new(store.clone());

    assert_eq!(credentials.resolve(Some("tok-1")), Some("tok-1".to_owned()));
    assert_eq!(credentials.resolve(Some("tok-1")), Some("tok-1".to_owned()));
    assert_eq!(store.writes.get(), 1);
}

#[test]
fn set_none_clears_memory_and_storage() {
    let store = MemoryStore::default();
    let credentials = CredentialStore::new(store.clone());
    credentials.set(Some("tok-1"));
    assert_eq!(store.get(keys::CREDENTIAL), Some("tok-1".to_owned()));

    credentials.set(None);
    assert_eq!(credentials.get(), None);
    assert_eq!(store.get(keys::CREDENTIAL), None);
}

#[test]
fn get_does_not_fall_back_to_storage() {
    let store = MemoryStore::default();
    store.set(keys::CREDENTIAL, "persisted-token");
    let credentials = CredentialStore::new(store);
    // Nothing resolved yet; the in-memory copy is empty by definition.
    assert_eq!(credentials.get(), None);
}
