//! Client code for beacon.
//!
//! This crate provides the HTTP transport, content classification and
//! transcoding, the favicon fallback chain, and the movie-info service with
//! credential rotation.

pub mod classify;
pub mod favicon;
pub mod fetch;
pub mod movie;
pub mod transcode;

#[cfg(test)]
mod testing;

pub use classify::{ContentKind, classify};
pub use favicon::{FAVICON_NAMESPACE, FaviconResolver, NO_IMAGE};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, Origin, Transport};
pub use movie::{MovieApiConfig, MovieCaches, MovieId, MovieInfoService};
pub use transcode::{to_inline_image, to_text};
