//! # Cache Error Types
//!
//! Error taxonomy for the pronunciation audio cache.
//!
//! A miss is not an error: lookups return `Option`. The facade's contract is
//! best-effort caching, always safe to bypass; callers treat any cache
//! failure as a miss followed by a direct fetch.

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Disk read/write/permission failure. Cache state is left unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external fetcher failed; no entry was created, no blob written.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] bridge_traits::error::BridgeError),

    /// The persisted index could not be parsed. Recovered by cold-starting;
    /// callers of the facade never see this variant.
    #[error("Corrupt cache index: {0}")]
    CorruptIndex(String),

    /// Invalid cache configuration.
    #[error("Invalid cache configuration: {0}")]
    Config(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
