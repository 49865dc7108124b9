//! Persisted metadata index for cached clips.
//!
//! The index is the single source of truth for eviction ranking. It is
//! loaded eagerly when the cache opens and rewritten in full
//! (write-temp-then-rename) after every mutation, so a crash loses at most
//! the in-flight operation, never prior state.

use crate::error::{CacheError, Result};
use crate::fingerprint::{ClipSource, Fingerprint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Name of the index file inside the cache directory.
pub const INDEX_FILE: &str = "index.json";

/// Metadata for one cached clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Primary identity; immutable. Matches the blob file name stem.
    pub fingerprint: Fingerprint,

    /// Exact blob size on disk at indexing time.
    pub size_bytes: u64,

    /// Set once, at first write.
    pub created_at: DateTime<Utc>,

    /// Updated on every hit and on write; drives LRU ranking and max-age.
    pub last_accessed_at: DateTime<Utc>,

    /// Original URL, retained for diagnostics.
    pub source_url: String,

    /// Language tag the clip was requested with, if any.
    pub lang: Option<String>,
}

impl CacheEntry {
    /// Entry for a freshly written blob.
    pub fn new(source: &ClipSource, size_bytes: u64, now: DateTime<Utc>) -> Self {
        Self {
            fingerprint: source.fingerprint(),
            size_bytes,
            created_at: now,
            last_accessed_at: now,
            source_url: source.url.clone(),
            lang: source.lang.clone(),
        }
    }

    /// Record a hit.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_accessed_at = now;
    }
}

/// In-memory mapping plus its persistence location. Mutation and the
/// surrounding save are serialized by the facade; two concurrent whole-map
/// saves from stale copies would silently lose one side's update.
#[derive(Debug)]
pub struct MetadataIndex {
    path: PathBuf,
    entries: HashMap<Fingerprint, CacheEntry>,
}

impl MetadataIndex {
    /// Load the index from `dir`, tolerating absence and corruption.
    ///
    /// A file that fails to parse degrades to a cold start: the damage is
    /// logged, an empty mapping returned, and the now-unreferenced blobs are
    /// swept by the manager afterwards. Only real I/O failures propagate.
    pub async fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        let entries = match Self::read_file(&path).await {
            Ok(entries) => entries,
            Err(CacheError::CorruptIndex(reason)) => {
                warn!(index = %path.display(), %reason, "Cache index unreadable, starting cold");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };

        debug!(index = %path.display(), entries = entries.len(), "Cache index loaded");
        Ok(Self { path, entries })
    }

    async fn read_file(path: &Path) -> Result<HashMap<Fingerprint, CacheEntry>> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&raw).map_err(|e| CacheError::CorruptIndex(e.to_string()))
    }

    /// Persist the full mapping atomically (write-temp-then-rename), so a
    /// crash mid-save can never destroy the previous valid index.
    pub async fn save(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;

        if let Err(e) = fs::write(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Look up an entry.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&CacheEntry> {
        self.entries.get(fingerprint)
    }

    /// Whether an entry exists.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    /// Insert or replace an entry, returning the previous one.
    pub fn put(&mut self, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(entry.fingerprint.clone(), entry)
    }

    /// Remove an entry, returning it when present.
    pub fn remove(&mut self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        self.entries.remove(fingerprint)
    }

    /// Refresh an entry's last-access time. Returns false on a miss.
    pub fn touch(&mut self, fingerprint: &Fingerprint, now: DateTime<Utc>) -> bool {
        match self.entries.get_mut(fingerprint) {
            Some(entry) => {
                entry.touch(now);
                true
            }
            None => false,
        }
    }

    /// Iterate over all entries (no defined order).
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entries' blob sizes.
    pub fn total_bytes(&self) -> u64 {
        self.entries.values().map(|e| e.size_bytes).sum()
    }

    /// Drop every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(url: &str, size: u64, now: DateTime<Utc>) -> CacheEntry {
        CacheEntry::new(&ClipSource::new(url).with_lang("en-US"), size, now)
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let now = Utc::now();

        let mut index = MetadataIndex::load(dir.path()).await.unwrap();
        assert!(index.is_empty());

        index.put(entry("https://x/a.mp3", 11, now));
        index.put(entry("https://x/b.mp3", 22, now));
        index.save().await.unwrap();

        let reloaded = MetadataIndex::load(dir.path()).await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.total_bytes(), 33);

        let fingerprint = ClipSource::new("https://x/a.mp3")
            .with_lang("en-US")
            .fingerprint();
        let loaded = reloaded.get(&fingerprint).unwrap();
        assert_eq!(loaded.size_bytes, 11);
        assert_eq!(loaded.source_url, "https://x/a.mp3");
        assert_eq!(loaded.lang.as_deref(), Some("en-US"));
        assert_eq!(loaded.created_at, now);
        assert_eq!(loaded.last_accessed_at, now);
    }

    #[tokio::test]
    async fn test_corrupt_index_degrades_to_empty() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join(INDEX_FILE), b"{\"truncated\":")
            .await
            .unwrap();

        let index = MetadataIndex::load(dir.path()).await.unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_touch_updates_only_last_access() {
        let dir = tempdir().unwrap();
        let created = Utc::now();
        let later = created + chrono::Duration::seconds(90);

        let mut index = MetadataIndex::load(dir.path()).await.unwrap();
        let e = entry("https://x/a.mp3", 5, created);
        let fingerprint = e.fingerprint.clone();
        index.put(e);

        assert!(index.touch(&fingerprint, later));
        let touched = index.get(&fingerprint).unwrap();
        assert_eq!(touched.created_at, created);
        assert_eq!(touched.last_accessed_at, later);

        let unknown = ClipSource::new("https://x/unknown.mp3").fingerprint();
        assert!(!index.touch(&unknown, later));
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let mut index = MetadataIndex::load(dir.path()).await.unwrap();
        index.put(entry("https://x/a.mp3", 1, Utc::now()));
        index.save().await.unwrap();

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(item) = entries.next_entry().await.unwrap() {
            names.push(item.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec![INDEX_FILE.to_string()]);
    }
}
