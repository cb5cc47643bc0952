//! Key-value storage for small persisted values
//!
//! A failing backend must never interrupt play: reads degrade to "absent"
//! and writes are dropped with a warning.

use std::collections::HashMap;

/// String key-value store (LocalStorage semantics)
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);

    /// Read an integer score. Missing or unparsable values are absent.
    fn get_score(&self, key: &str) -> Option<u64> {
        let raw = self.get_item(key)?;
        match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring unreadable value {:?} for {}", raw, key);
                None
            }
        }
    }

    fn set_score(&mut self, key: &str, value: u64) {
        self.set_item(key, &value.to_string());
    }
}

/// In-process storage for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable, scores will not persist");
        }
        Self { inner }
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.inner {
            backend_ok(storage.set_item(key, value), "write", key);
        }
    }

    fn remove_item(&mut self, key: &str) {
        if let Some(storage) = &self.inner {
            backend_ok(storage.remove_item(key), "remove", key);
        }
    }
}

/// Log a failed backend call. Returns whether it succeeded.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn backend_ok<E: std::fmt::Debug>(result: Result<(), E>, action: &str, key: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to {} {} in LocalStorage: {:?}", action, key, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_round_trip_and_absent() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_score("best"), None);
        storage.set_score("best", 120);
        assert_eq!(storage.get_item("best").as_deref(), Some("120"));
        assert_eq!(storage.get_score("best"), Some(120));
        storage.remove_item("best");
        assert_eq!(storage.get_score("best"), None);
    }

    #[test]
    fn test_garbage_score_reads_as_absent() {
        let mut storage = MemoryStorage::new();
        storage.set_item("best", "lots");
        assert_eq!(storage.get_score("best"), None);
        storage.set_item("best", " 42 ");
        assert_eq!(storage.get_score("best"), Some(42));
    }

    #[test]
    fn test_backend_failures_are_reported() {
        assert!(backend_ok::<()>(Ok(()), "remove", "best"));
        assert!(!backend_ok(Err("QuotaExceededError"), "write", "best"));
        assert!(!backend_ok(Err("SecurityError"), "remove", "best"));
    }
}
