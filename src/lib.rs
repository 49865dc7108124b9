//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-audio-cache`, `bridge-desktop`). Host
//! applications can depend on `npc-workspace` and enable the documented
//! features without needing to wire each crate individually.

#[cfg(feature = "desktop-fetcher")]
pub use bridge_desktop;
#[cfg(feature = "desktop-fetcher")]
pub use core_audio_cache;
