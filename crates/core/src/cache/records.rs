//! Write-through record cache for one namespace.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use super::record::{CacheRecord, ResolutionKey};
use crate::store::DurableStore;

#[derive(Debug, Default)]
struct State {
    entries: HashMap<ResolutionKey, CacheRecord>,
    /// Bumped on every mutation; orders concurrent persists.
    generation: u64,
}

/// In-memory cache namespace mirrored to a [`DurableStore`].
///
/// Lookups are synchronous. Mutations apply atomically under a lock, then the
/// whole namespace is serialized and saved under `namespace`. Persistence is
/// best-effort: a failed save is logged and the in-memory state stays
/// authoritative for the life of the process.
pub struct RecordCache {
    namespace: String,
    store: Arc<dyn DurableStore>,
    state: RwLock<State>,
    /// Generation of the newest blob handed to the store, whether or not the
    /// save succeeded. Older blobs are never written after it.
    persisted: Mutex<u64>,
}

impl std::fmt::Debug for RecordCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCache")
            .field("namespace", &self.namespace)
            .field("len", &self.len())
            .finish()
    }
}

impl RecordCache {
    /// Load a namespace from the store.
    ///
    /// Missing or unreadable data yields an empty cache rather than an error.
    pub async fn load(store: Arc<dyn DurableStore>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();

        let entries = match store.load(&namespace).await {
            Ok(Some(blob)) => match serde_json::from_str::<HashMap<ResolutionKey, CacheRecord>>(&blob) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(namespace = %namespace, error = %e, "discarding corrupt cache blob");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                tracing::warn!(namespace = %namespace, error = %e, "failed to load cache, starting empty");
                HashMap::new()
            }
        };

        tracing::debug!(namespace = %namespace, entries = entries.len(), "cache loaded");

        Self { namespace, store, state: RwLock::new(State { entries, generation: 0 }), persisted: Mutex::new(0) }
    }

    pub fn get(&self, key: &ResolutionKey) -> Option<CacheRecord> {
        self.state.read().entries.get(key).cloned()
    }

    pub fn contains(&self, key: &ResolutionKey) -> bool {
        self.state.read().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys currently cached, sorted.
    pub fn keys(&self) -> Vec<ResolutionKey> {
        let mut keys: Vec<_> = self.state.read().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Insert or overwrite a record and persist. Returns the stored record.
    pub async fn put(&self, record: CacheRecord) -> CacheRecord {
        let (generation, blob) = self.mutate(|entries| {
            entries.insert(record.key.clone(), record.clone());
        });
        self.persist(generation, blob).await;
        record
    }

    /// Empty the namespace and persist the empty state.
    pub async fn clear(&self) {
        self.take_all().await;
    }

    /// Atomically snapshot and clear every record, then persist the empty state.
    ///
    /// Records come back sorted by key.
    pub async fn take_all(&self) -> Vec<CacheRecord> {
        let mut taken = Vec::new();
        let (generation, blob) = self.mutate(|entries| {
            taken = entries.drain().map(|(_, record)| record).collect();
        });
        self.persist(generation, blob).await;
        taken.sort_by(|a, b| a.key.cmp(&b.key));
        taken
    }

    fn mutate(&self, f: impl FnOnce(&mut HashMap<ResolutionKey, CacheRecord>)) -> (u64, Option<String>) {
        let mut state = self.state.write();
        f(&mut state.entries);
        state.generation += 1;

        let blob = match serde_json::to_string(&state.entries) {
            Ok(blob) => Some(blob),
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, error = %e, "failed to serialize cache");
                None
            }
        };
        (state.generation, blob)
    }

    async fn persist(&self, generation: u64, blob: Option<String>) {
        let Some(blob) = blob else {
            return;
        };

        let mut persisted = self.persisted.lock().await;
        if generation <= *persisted {
            return;
        }

        *persisted = generation;
        if let Err(e) = self.store.save(&self.namespace, &blob).await {
            tracing::warn!(namespace = %self.namespace, generation, error = %e, "failed to persist cache");
        }
    }
}
