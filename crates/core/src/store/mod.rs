//! Durable whole-blob persistence.
//!
//! Cache namespaces serialize their entire contents into one string and hand
//! it to a [`DurableStore`] under a fixed key. There are no partial writes:
//! every `save` replaces the previous blob for that key.

pub mod memory;
pub mod migrations;
pub mod sqlite;

use async_trait::async_trait;

pub use crate::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Whole-blob key/value persistence.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Load the blob stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<String>, Error>;

    /// Replace the blob stored under `key`.
    async fn save(&self, key: &str, value: &str) -> Result<(), Error>;
}
