//! Blob storage for cached pronunciation audio.
//!
//! Pure file I/O keyed by fingerprint, scoped to one reserved cache
//! directory. Writes land under a unique temporary name and are renamed into
//! place, so a reader never observes a half-written clip.

use crate::error::Result;
use crate::fingerprint::Fingerprint;
use bytes::Bytes;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Suffix of stored clip files.
const CLIP_SUFFIX: &str = ".clip";

/// Suffix of in-flight temporary files.
const TMP_SUFFIX: &str = ".tmp";

/// Stores raw audio blobs on disk, one file per fingerprint. The store holds
/// no ordering metadata; ranking lives entirely in the index.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Open a store rooted at `root`, creating the directory if missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Directory all blobs live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final path of the blob for `fingerprint`.
    pub fn path_for(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(format!("{}{}", fingerprint, CLIP_SUFFIX))
    }

    /// Write `bytes` for `fingerprint`, replacing any previous blob.
    ///
    /// Data goes to `<stem>.<uuid>.tmp` first and is renamed into place;
    /// concurrent writers get distinct temporaries and the last rename wins.
    /// On failure the temporary is removed and no entry must be indexed.
    pub async fn write(&self, fingerprint: &Fingerprint, bytes: &Bytes) -> Result<PathBuf> {
        let path = self.path_for(fingerprint);
        let tmp = self.root.join(format!(
            "{}.{}{}",
            fingerprint,
            uuid::Uuid::new_v4().simple(),
            TMP_SUFFIX
        ));

        if let Err(e) = fs::write(&tmp, bytes).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(fingerprint = %fingerprint, bytes = bytes.len(), "Stored clip");
        Ok(path)
    }

    /// Read the blob for `fingerprint`.
    ///
    /// `None` when absent. Eviction deletes blobs before index entries, so a
    /// vanished file is an ordinary miss, never an error.
    pub async fn read(&self, fingerprint: &Fingerprint) -> Result<Option<Bytes>> {
        match fs::read(self.path_for(fingerprint)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the blob for `fingerprint`. Absence is not an error.
    pub async fn delete(&self, fingerprint: &Fingerprint) -> Result<()> {
        match fs::remove_file(self.path_for(fingerprint)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a blob exists for `fingerprint`.
    pub async fn exists(&self, fingerprint: &Fingerprint) -> bool {
        fs::try_exists(self.path_for(fingerprint))
            .await
            .unwrap_or(false)
    }

    /// Remove stale temporaries and clip files whose stem is not in `known`.
    ///
    /// Called once at startup to reconcile after an interrupted write; other
    /// files (the index) are left alone. Returns how many files were removed.
    pub async fn sweep_orphans(&self, known: &HashSet<String>) -> Result<usize> {
        let mut removed = 0;
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let stale_tmp = name.ends_with(TMP_SUFFIX);
            let orphan_clip = name
                .strip_suffix(CLIP_SUFFIX)
                .map(|stem| !known.contains(stem))
                .unwrap_or(false);

            if stale_tmp || orphan_clip {
                warn!(file = %name, "Removing unindexed cache file");
                let _ = fs::remove_file(&path).await;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(url: &str) -> Fingerprint {
        Fingerprint::compute(url, None)
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        let fingerprint = key("https://x/a.mp3");
        let payload = Bytes::from_static(b"RIFF....WAVE");

        let path = store.write(&fingerprint, &payload).await.unwrap();
        assert!(path.ends_with(format!("{}.clip", fingerprint)));

        let read_back = store.read(&fingerprint).await.unwrap().unwrap();
        assert_eq!(read_back, payload);
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let dir = tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        let result = store.read(&key("https://x/missing.mp3")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_contents() {
        let dir = tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        let fingerprint = key("https://x/a.mp3");
        store
            .write(&fingerprint, &Bytes::from_static(b"first"))
            .await
            .unwrap();
        store
            .write(&fingerprint, &Bytes::from_static(b"second"))
            .await
            .unwrap();

        let read_back = store.read(&fingerprint).await.unwrap().unwrap();
        assert_eq!(read_back, Bytes::from_static(b"second"));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        let fingerprint = key("https://x/a.mp3");
        store
            .write(&fingerprint, &Bytes::from_static(b"data"))
            .await
            .unwrap();

        store.delete(&fingerprint).await.unwrap();
        assert!(!store.exists(&fingerprint).await);

        // Second delete of an absent blob succeeds too.
        store.delete(&fingerprint).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        store
            .write(&key("https://x/a.mp3"), &Bytes::from_static(b"data"))
            .await
            .unwrap();

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".clip"));
    }

    #[tokio::test]
    async fn test_sweep_removes_orphans_and_temps() {
        let dir = tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        let keep = key("https://x/keep.mp3");
        store
            .write(&keep, &Bytes::from_static(b"keep"))
            .await
            .unwrap();

        tokio::fs::write(dir.path().join("deadbeef.clip"), b"orphan")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("stale.12345.tmp"), b"tmp")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("index.json"), b"{}")
            .await
            .unwrap();

        let known: HashSet<String> = [keep.as_str().to_string()].into_iter().collect();
        let removed = store.sweep_orphans(&known).await.unwrap();
        assert_eq!(removed, 2);

        assert!(store.exists(&keep).await);
        assert!(tokio::fs::try_exists(dir.path().join("index.json"))
            .await
            .unwrap());
        assert!(!tokio::fs::try_exists(dir.path().join("deadbeef.clip"))
            .await
            .unwrap());
    }
}
