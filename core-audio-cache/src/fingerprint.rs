//! Content fingerprinting for pronunciation sources.
//!
//! A clip is identified by its remote URL plus an optional language tag. The
//! fingerprint is the SHA-256 of that identity, hex encoded, and doubles as
//! the index key and the on-disk file name stem. Keys must be stable across
//! process runs and library versions, which rules out the language-runtime
//! hasher.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

// Unit separator between URL and language tag inside the hash input; keeps
// ("ab", None) distinct from ("a", Some("b")).
const IDENTITY_SEPARATOR: u8 = 0x1f;

/// Logical identity of a pronunciation clip: where it comes from and which
/// language variant it speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipSource {
    /// Remote URL of the audio.
    pub url: String,
    /// Optional BCP-47 language tag (e.g. "en-US", "zh-CN").
    pub lang: Option<String>,
}

impl ClipSource {
    /// Identity for a URL with no language variant.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            lang: None,
        }
    }

    /// Attach a language tag.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Compute the fingerprint for this source.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(&self.url, self.lang.as_deref())
    }
}

/// Stable content-addressable key for a cached clip (64 lowercase hex chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Derive the fingerprint from a source identity.
    ///
    /// Pure and deterministic: identical `(url, lang)` pairs always produce
    /// the same key; distinct pairs collide only with cryptographic
    /// improbability.
    pub fn compute(url: &str, lang: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        if let Some(lang) = lang {
            hasher.update([IDENTITY_SEPARATOR]);
            hasher.update(lang.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// The hex digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
