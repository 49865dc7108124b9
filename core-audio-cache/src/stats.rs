//! Cache statistics and monitoring

use serde::{Deserialize, Serialize};

/// Read-only snapshot of the cache, computed from the in-memory index.
/// Producing one never touches disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cached clips.
    pub entry_count: usize,

    /// Total bytes used by all blobs.
    pub total_bytes: u64,
}

impl CacheStats {
    /// Calculate cache usage as a percentage of `max_size`.
    pub fn usage_percentage(&self, max_size: u64) -> f64 {
        if max_size == 0 {
            return 0.0;
        }

        (self.total_bytes as f64 / max_size as f64) * 100.0
    }

    /// Returns true if the cache is at or over `max_size`.
    pub fn is_full(&self, max_size: u64) -> bool {
        self.total_bytes >= max_size
    }

    /// Bytes over `max_size`, zero when under.
    pub fn space_needed(&self, max_size: u64) -> u64 {
        self.total_bytes.saturating_sub(max_size)
    }

    /// Average bytes per cached clip.
    pub fn average_entry_size(&self) -> u64 {
        if self.entry_count == 0 {
            0
        } else {
            self.total_bytes / self.entry_count as u64
        }
    }
}
