//! In-process store with no durability.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::DurableStore;
use crate::Error;

/// Store that keeps blobs in memory.
///
/// Used in tests and wherever persistence across restarts is not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw blob, bypassing serialization (useful for corrupt-data tests).
    pub fn with_blob(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.blobs.lock().insert(key.into(), value.into());
        self
    }

    /// Raw blob currently stored under `key`.
    pub fn blob(&self, key: &str) -> Option<String> {
        self.blobs.lock().get(key).cloned()
    }

    /// Number of `save` calls served so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.blob(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), Error> {
        self.blobs.lock().insert(key.to_string(), value.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryStore::new();
        assert!(store.load("favicon-cache").await.unwrap().is_none());

        store.save("favicon-cache", "{}").await.unwrap();
        store.save("favicon-cache", r#"{"a":1}"#).await.unwrap();

        assert_eq!(store.load("favicon-cache").await.unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(store.save_count(), 2);
    }
}
