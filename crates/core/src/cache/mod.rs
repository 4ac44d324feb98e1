//! Namespaced record caches mirrored to a durable store.
//!
//! Each namespace is an in-memory map from [`ResolutionKey`] to
//! [`CacheRecord`], loaded once at construction and written through to the
//! [`DurableStore`](crate::store::DurableStore) as one JSON blob on every
//! mutation. Entries never expire on their own.

pub mod record;
pub mod records;

pub use record::{CacheRecord, Payload, ResolutionKey};
pub use records::RecordCache;
