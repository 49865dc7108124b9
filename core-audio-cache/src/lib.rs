//! # Pronunciation Audio Cache
//!
//! Disk-backed, content-addressable cache for downloaded pronunciation clips.
//!
//! ## Overview
//!
//! The cache avoids re-downloading identical remote audio. Key features:
//! - Stable SHA-256 fingerprints over (URL, language tag)
//! - Atomic blob writes (temp file + rename) and crash-safe index persistence
//! - Byte, entry-count, and age budgets with two-phase eviction
//! - Best-effort contract: any internal failure degrades to a miss, so
//!   playback falls back to a direct fetch and continues
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │     AudioCacheManager                  │
//! │  - lookup()                            │
//! │  - fetch_or_populate()                 │
//! │  - evict() / clear() / stats()         │
//! └────────┬───────────────────────────────┘
//!          │
//!          ├──> MetadataIndex (index.json)
//!          ├──> BlobStore (<fingerprint>.clip)
//!          ├──> eviction planning (age cutoff + LRU trim)
//!          └──> AudioFetcher (bridge trait)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_audio_cache::{AudioCacheManager, CacheConfig, ClipSource};
//!
//! # async fn example(fetcher: &dyn bridge_traits::fetch::AudioFetcher)
//! # -> core_audio_cache::Result<()> {
//! let cache = AudioCacheManager::open(
//!     CacheConfig::new().with_cache_dir("/tmp/pronunciations"),
//! )
//! .await?;
//!
//! let source = ClipSource::new("https://cdn.example.com/ayumi.mp3").with_lang("ja-JP");
//! let path = cache.fetch_or_populate(&source, fetcher).await?;
//! println!("Clip available at {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod eviction;
pub mod fingerprint;
pub mod index;
pub mod manager;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use config::{CacheConfig, CacheLimits};
pub use error::{CacheError, Result};
pub use fingerprint::{ClipSource, Fingerprint};
pub use index::CacheEntry;
pub use manager::AudioCacheManager;
pub use stats::CacheStats;
pub use store::BlobStore;
