//! # Pronunciation Cache Manager
//!
//! Main orchestrator for looking up, populating, and bounding the on-device
//! pronunciation audio cache.
//!
//! This module provides:
//! - Content-addressed lookup by (URL, language) fingerprint
//! - Fetch-or-populate with a caller-supplied fetcher
//! - Two-phase eviction (hard age expiry, then batched LRU trim) at the end
//!   of each populating write
//! - Crash-safe persistence via atomic index rewrites
//! - Startup reconciliation of index and blob directory

use crate::config::{CacheConfig, CacheLimits};
use crate::error::{CacheError, Result};
use crate::eviction::plan_evictions;
use crate::fingerprint::{ClipSource, Fingerprint};
use crate::index::{CacheEntry, MetadataIndex};
use crate::stats::CacheStats;
use crate::store::BlobStore;
use bridge_traits::fetch::AudioFetcher;
use bridge_traits::time::{Clock, SystemClock};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Facade over the fingerprinter, blob store, metadata index, and eviction
/// policy; the only type collaborators talk to.
///
/// One instance per process, constructed explicitly and passed to whichever
/// collaborator needs it. All index mutation is serialized behind one lock;
/// the fetcher and blob reads run with the lock released, so a slow download
/// for one clip never blocks lookups for others.
pub struct AudioCacheManager {
    limits: CacheLimits,
    store: BlobStore,
    index: Mutex<MetadataIndex>,
    clock: Arc<dyn Clock>,
}

impl AudioCacheManager {
    /// Open (or create) the cache under `config.cache_dir`.
    ///
    /// Loads the persisted index eagerly and reconciles it with the blob
    /// directory: entries without a blob are dropped, blobs and temp files
    /// without an entry are swept. A corrupt index degrades to a cold start.
    pub async fn open(config: CacheConfig) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Open with an explicit time source, letting tests drive aging
    /// deterministically.
    #[instrument(skip(config, clock), fields(dir = %config.cache_dir.display()))]
    pub async fn open_with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate().map_err(CacheError::Config)?;

        let store = BlobStore::open(&config.cache_dir).await?;
        let mut index = MetadataIndex::load(&config.cache_dir).await?;

        // Reconcile both directions: an interrupted write may have left an
        // entry without a blob or a blob without an entry.
        let mut missing = Vec::new();
        for entry in index.entries() {
            if !store.exists(&entry.fingerprint).await {
                missing.push(entry.fingerprint.clone());
            }
        }
        for fingerprint in &missing {
            warn!(%fingerprint, "Dropping index entry with no blob on disk");
            index.remove(fingerprint);
        }

        let known: HashSet<String> = index
            .entries()
            .map(|e| e.fingerprint.as_str().to_string())
            .collect();
        let swept = store.sweep_orphans(&known).await?;

        if !missing.is_empty() {
            index.save().await?;
        }

        info!(
            entries = index.len(),
            total_bytes = index.total_bytes(),
            dropped = missing.len(),
            swept,
            "Pronunciation cache opened"
        );

        Ok(Self {
            limits: config.limits(),
            store,
            index: Mutex::new(index),
            clock,
        })
    }

    /// Check for a cached clip.
    ///
    /// On a hit the entry's last-access time is refreshed and persisted and
    /// the blob path returned; on a miss nothing changes.
    #[instrument(skip(self), fields(url = %source.url))]
    pub async fn lookup(&self, source: &ClipSource) -> Result<Option<PathBuf>> {
        let fingerprint = source.fingerprint();

        let mut index = self.index.lock().await;
        if !index.touch(&fingerprint, self.clock.now()) {
            debug!(%fingerprint, "Cache miss");
            return Ok(None);
        }
        index.save().await?;

        debug!(%fingerprint, "Cache hit");
        Ok(Some(self.store.path_for(&fingerprint)))
    }

    /// Return the local path for `source`, downloading through `fetcher` on
    /// a miss.
    ///
    /// A hit behaves exactly like [`lookup`](Self::lookup). On a miss the
    /// fetcher runs with the index lock released; its failure propagates and
    /// leaves no partial state (no blob, no entry).
    #[instrument(skip(self, fetcher), fields(url = %source.url))]
    pub async fn fetch_or_populate(
        &self,
        source: &ClipSource,
        fetcher: &dyn AudioFetcher,
    ) -> Result<PathBuf> {
        if let Some(path) = self.lookup(source).await? {
            return Ok(path);
        }

        let bytes = fetcher.fetch(&source.url).await?;
        debug!(bytes = bytes.len(), "Fetched clip");

        self.store_bytes(source, bytes).await
    }

    /// Store already-fetched bytes for `source`.
    ///
    /// Write-through used by [`fetch_or_populate`](Self::fetch_or_populate);
    /// also public so hosts with their own download pipeline can populate
    /// the cache directly.
    #[instrument(skip(self, bytes), fields(url = %source.url, bytes = bytes.len()))]
    pub async fn store(&self, source: &ClipSource, bytes: Bytes) -> Result<PathBuf> {
        self.store_bytes(source, bytes).await
    }

    async fn store_bytes(&self, source: &ClipSource, bytes: Bytes) -> Result<PathBuf> {
        let fingerprint = source.fingerprint();

        // Blob first: an I/O failure here must not leave an index entry.
        let path = self.store.write(&fingerprint, &bytes).await?;

        let mut index = self.index.lock().await;
        let now = self.clock.now();

        let mut entry = CacheEntry::new(source, bytes.len() as u64, now);
        if let Some(previous) = index.get(&fingerprint) {
            entry.created_at = previous.created_at;
        }
        index.put(entry);

        self.evict_locked(&mut index, now).await;
        index.save().await?;

        info!(%fingerprint, bytes = bytes.len(), "Clip cached");
        Ok(path)
    }

    /// Read the raw bytes of a cached clip, refreshing its last-access time.
    ///
    /// `None` when not cached, or when the blob vanished mid-eviction;
    /// both are plain misses.
    #[instrument(skip(self), fields(url = %source.url))]
    pub async fn read(&self, source: &ClipSource) -> Result<Option<Bytes>> {
        let fingerprint = source.fingerprint();

        {
            let mut index = self.index.lock().await;
            if !index.touch(&fingerprint, self.clock.now()) {
                return Ok(None);
            }
            index.save().await?;
        }

        // File I/O outside the lock; the path is already resolved.
        self.store.read(&fingerprint).await
    }

    /// Whether a clip for `source` is currently cached. Does not refresh the
    /// entry's last-access time.
    pub async fn contains(&self, source: &ClipSource) -> bool {
        self.index.lock().await.contains(&source.fingerprint())
    }

    /// Remove a single clip. Returns whether an entry existed.
    #[instrument(skip(self), fields(url = %source.url))]
    pub async fn remove(&self, source: &ClipSource) -> Result<bool> {
        let fingerprint = source.fingerprint();

        let mut index = self.index.lock().await;
        if let Err(e) = self.store.delete(&fingerprint).await {
            warn!(%fingerprint, error = %e, "Failed to delete clip file");
        }
        match index.remove(&fingerprint) {
            Some(_) => {
                index.save().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Run the eviction policy immediately, returning how many entries were
    /// removed. Populating writes already do this; hosts call it on demand
    /// (e.g. when the platform signals storage pressure).
    #[instrument(skip(self))]
    pub async fn evict(&self) -> Result<usize> {
        let mut index = self.index.lock().await;
        let removed = self.evict_locked(&mut index, self.clock.now()).await;
        if removed > 0 {
            index.save().await?;
        }
        Ok(removed)
    }

    /// Delete every clip and reset the index. Individual file deletions are
    /// best-effort: failures are logged and the clear continues.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<usize> {
        let mut index = self.index.lock().await;

        let victims: Vec<Fingerprint> = index.entries().map(|e| e.fingerprint.clone()).collect();
        for fingerprint in &victims {
            if let Err(e) = self.store.delete(fingerprint).await {
                warn!(%fingerprint, error = %e, "Failed to delete clip during clear");
            }
        }

        let cleared = index.clear();
        index.save().await?;

        info!(cleared, "Cache cleared");
        Ok(cleared)
    }

    /// Snapshot of entry count and total bytes from the in-memory index.
    pub async fn stats(&self) -> CacheStats {
        let index = self.index.lock().await;
        CacheStats {
            entry_count: index.len(),
            total_bytes: index.total_bytes(),
        }
    }

    // Caller holds the index lock and saves afterwards. Blob goes first,
    // index entry second: a reader holding the old path sees a clean miss
    // instead of an entry pointing at nothing.
    async fn evict_locked(&self, index: &mut MetadataIndex, now: DateTime<Utc>) -> usize {
        let victims = plan_evictions(index.entries(), &self.limits, now);
        for fingerprint in &victims {
            if let Err(e) = self.store.delete(fingerprint).await {
                warn!(%fingerprint, error = %e, "Failed to delete clip during eviction");
            }
            index.remove(fingerprint);
        }

        if !victims.is_empty() {
            info!(
                evicted = victims.len(),
                remaining = index.len(),
                "Eviction complete"
            );
        }
        victims.len()
    }
}
