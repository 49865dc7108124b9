//! # Desktop Bridge Implementations
//!
//! Desktop adapters for the `bridge-traits` collaborator seams. Currently
//! ships the reqwest-backed [`ReqwestAudioFetcher`] used to download
//! pronunciation audio on desktop targets; mobile hosts provide their own
//! adapters over native networking.

pub mod http;

pub use http::ReqwestAudioFetcher;
