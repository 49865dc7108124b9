//! # Host Bridge Traits
//!
//! Collaborator abstraction traits that must be implemented by each host
//! platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the pronunciation core and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that is wired differently per host (desktop, iOS,
//! Android).
//!
//! ## Traits
//!
//! - [`AudioFetcher`](fetch::AudioFetcher) - Retrieval of remote pronunciation
//!   audio (HTTP download, redirects, timeouts)
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should convert their native errors to
//! `BridgeError` and include actionable context (URL, status code).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks.

pub mod error;
pub mod fetch;
pub mod time;

pub use error::BridgeError;
pub use fetch::AudioFetcher;
pub use time::{Clock, SystemClock};
