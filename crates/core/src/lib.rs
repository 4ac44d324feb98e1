//! Core types and shared state for beacon.
//!
//! This crate provides:
//! - Namespaced record caches with write-through persistence
//! - Durable whole-blob stores (SQLite, in-memory)
//! - Rotating credential pools
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod store;

pub use cache::{CacheRecord, Payload, RecordCache, ResolutionKey};
pub use config::{AppConfig, ConfigError};
pub use credentials::{CredentialPool, Provider};
pub use error::Error;
pub use store::{DurableStore, MemoryStore, SqliteStore};
