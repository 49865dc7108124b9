//! Audio Retrieval Abstraction
//!
//! Provides the async collaborator that turns a remote pronunciation URL into
//! raw audio bytes. HTTP semantics (status codes, redirects, content types,
//! retries) live entirely on this side of the seam; the cache stores whatever
//! bytes a fetcher produces.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Fetches raw pronunciation audio from a remote source.
///
/// Implemented per platform: desktop ships a reqwest-backed client in
/// `bridge-desktop`, mobile hosts inject an adapter over their native
/// networking stack.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::fetch::AudioFetcher;
/// use bridge_traits::error::Result;
/// use async_trait::async_trait;
/// use bytes::Bytes;
///
/// pub struct MyFetcher;
///
/// #[async_trait]
/// impl AudioFetcher for MyFetcher {
///     async fn fetch(&self, url: &str) -> Result<Bytes> {
///         // Implementation
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Download the audio bytes for `url`.
    ///
    /// Timeout and retry behavior belong to the implementation; callers treat
    /// any error as a failed retrieval and store nothing.
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}
