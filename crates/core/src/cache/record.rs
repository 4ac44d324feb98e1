//! Cache record types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized identity of a resolvable resource.
///
/// For favicons this is the lowercased host (plus port when present); for
/// movie lookups it is the typed external id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct ResolutionKey(String);

impl ResolutionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResolutionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ResolutionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Cached result, tagged by the namespace it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    /// Icon encoded as a `data:` URI.
    InlineImage(String),
    /// Provider metadata document.
    Metadata(serde_json::Value),
    /// Provider ratings document.
    Ratings(serde_json::Value),
    /// IMDb id mapped from another id space.
    ImdbId(String),
}

impl Payload {
    pub fn as_inline_image(&self) -> Option<&str> {
        match self {
            Payload::InlineImage(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Metadata(v) | Payload::Ratings(v) => Some(v),
            _ => None,
        }
    }
}

/// One cache entry. At most one exists per key; writes replace it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheRecord {
    pub key: ResolutionKey,
    /// Identifier the record was resolved from (an origin URL or the raw id).
    pub origin: String,
    pub payload: Payload,
}

impl CacheRecord {
    pub fn new(key: impl Into<ResolutionKey>, origin: impl Into<String>, payload: Payload) -> Self {
        Self { key: key.into(), origin: origin.into(), payload }
    }
}
