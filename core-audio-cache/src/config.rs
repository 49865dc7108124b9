//! Cache configuration and capacity budgets

use std::path::PathBuf;
use std::time::Duration;

/// Default byte budget for all blobs together (50 MiB).
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 50 * 1024 * 1024;

/// Default maximum number of cached clips.
pub const DEFAULT_MAX_ENTRY_COUNT: usize = 100;

/// Default idle age after which a clip is hard-expired (30 days).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Default cache directory name, resolved relative to the working directory
/// when no absolute path is configured.
pub const DEFAULT_CACHE_DIRECTORY: &str = "pronunciation_cache";

/// Capacity and age budgets enforced after each populating write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLimits {
    /// Byte budget for all blobs together.
    pub max_total_bytes: u64,

    /// Maximum number of cached clips.
    pub max_entry_count: usize,

    /// Entries idle longer than this are hard-expired regardless of the
    /// other budgets. Measured from last access, not creation, so clips in
    /// active use never age out.
    pub max_age: Duration,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_entry_count: DEFAULT_MAX_ENTRY_COUNT,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

/// Configuration for the pronunciation audio cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding the blobs and the index file. Hosts normally pass
    /// an absolute path inside the platform app-cache location.
    pub cache_dir: PathBuf,

    /// Byte budget (default: 50 MiB).
    pub max_total_bytes: u64,

    /// Entry-count budget (default: 100).
    pub max_entry_count: usize,

    /// Idle age cutoff (default: 30 days).
    pub max_age: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIRECTORY),
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_entry_count: DEFAULT_MAX_ENTRY_COUNT,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the byte budget.
    pub fn with_max_total_bytes(mut self, bytes: u64) -> Self {
        self.max_total_bytes = bytes;
        self
    }

    /// Set the entry-count budget.
    pub fn with_max_entry_count(mut self, count: usize) -> Self {
        self.max_entry_count = count;
        self
    }

    /// Set the idle age cutoff.
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = age;
        self
    }

    /// The budget portion of the configuration.
    pub fn limits(&self) -> CacheLimits {
        CacheLimits {
            max_total_bytes: self.max_total_bytes,
            max_entry_count: self.max_entry_count,
            max_age: self.max_age,
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err("cache_dir cannot be empty".to_string());
        }

        if self.max_total_bytes == 0 {
            return Err("max_total_bytes must be greater than 0".to_string());
        }

        if self.max_entry_count == 0 {
            return Err("max_entry_count must be at least 1".to_string());
        }

        if self.max_age.is_zero() {
            return Err("max_age must be greater than zero".to_string());
        }

        Ok(())
    }
}
