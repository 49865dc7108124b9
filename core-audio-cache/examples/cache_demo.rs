//! Pronunciation cache demonstration
//!
//! Downloads a clip once, then serves the repeat request from disk.
//!
//! Run with:
//! ```bash
//! cargo run --example cache_demo -- <audio-url> [lang]
//! ```

use bridge_desktop::ReqwestAudioFetcher;
use core_audio_cache::{AudioCacheManager, CacheConfig, ClipSource};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,core_audio_cache=debug")),
        )
        .init();

    let mut args = env::args().skip(1);
    let url = args.next().unwrap_or_else(|| {
        "https://upload.wikimedia.org/wikipedia/commons/1/1f/En-us-hello.ogg".to_string()
    });
    let lang = args.next();

    let cache = AudioCacheManager::open(
        CacheConfig::new().with_cache_dir(env::temp_dir().join("pronunciation_cache_demo")),
    )
    .await?;

    let mut source = ClipSource::new(url);
    if let Some(lang) = lang {
        source = source.with_lang(lang);
    }

    let fetcher = ReqwestAudioFetcher::new();

    let path = cache.fetch_or_populate(&source, &fetcher).await?;
    info!(path = %path.display(), "First request resolved");

    let path = cache.fetch_or_populate(&source, &fetcher).await?;
    info!(path = %path.display(), "Second request served from cache");

    let stats = cache.stats().await;
    info!(
        entries = stats.entry_count,
        total_bytes = stats.total_bytes,
        "Cache stats"
    );

    Ok(())
}
