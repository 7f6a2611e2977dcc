//! In-memory cache of resolved image URLs.
//!
//! Maps a source (Instagram CDN) URL to the URL of the copy cached by the
//! backend. Entries are never revalidated; the only removal is [`ImageCache::clear`].
//! Failed resolutions fall back to the source URL and are not stored, so the
//! next resolve tries the network again.

use async_trait::async_trait;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::api::PressClient;
use crate::error::Result;

/// Backend able to cache one image and return its cached URL
#[async_trait]
pub trait ImageCacheBackend: Send + Sync {
    async fn cache_image(&self, source_url: &str) -> Result<String>;
}

#[async_trait]
impl ImageCacheBackend for PressClient {
    async fn cache_image(&self, source_url: &str) -> Result<String> {
        PressClient::cache_image(self, source_url).await
    }
}

/// How a URL was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Served from memory, no request made
    Hit(String),
    /// Fetched from the backend and stored
    Cached(String),
    /// Backend failed; the source URL is used as-is
    Fallback(String),
}

impl Resolution {
    /// The URL to display
    pub fn url(&self) -> &str {
        match self {
            Self::Hit(url) | Self::Cached(url) | Self::Fallback(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            Self::Hit(url) | Self::Cached(url) | Self::Fallback(url) => url,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Outcome of a pre-fetch run
#[derive(Debug, Clone, Default)]
pub struct PrefetchReport {
    pub batches: usize,
    pub resolved: Vec<(String, Resolution)>,
}

impl PrefetchReport {
    pub fn cached_count(&self) -> usize {
        self.resolved.iter().filter(|(_, r)| !r.is_fallback()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.resolved.len() - self.cached_count()
    }
}

/// Source URL → cached URL map with lazy population
///
/// Cloning shares the same map.
#[derive(Clone)]
pub struct ImageCache<B> {
    backend: Arc<B>,
    entries: Arc<Mutex<HashMap<String, String>>>,
    batch_pause: Duration,
}

impl<B: ImageCacheBackend> ImageCache<B> {
    pub fn new(backend: Arc<B>, batch_pause: Duration) -> Self {
        Self {
            backend,
            entries: Arc::new(Mutex::new(HashMap::new())),
            batch_pause,
        }
    }

    /// Cached URL for `source_url` without touching the network
    pub fn get(&self, source_url: &str) -> Option<String> {
        self.lock().get(source_url).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry
    ///
    /// Call only after the server-side clear succeeded.
    pub fn clear(&self) {
        let mut entries = self.lock();
        log::info!("Clearing {} cached image URLs", entries.len());
        entries.clear();
    }

    /// Resolve a source URL to the URL that should be displayed
    pub async fn resolve(&self, source_url: &str) -> Resolution {
        if let Some(cached) = self.get(source_url) {
            log::debug!("Image cache hit: {}", source_url);
            return Resolution::Hit(cached);
        }

        match self.backend.cache_image(source_url).await {
            Ok(cached_url) => {
                log::debug!("Using cached image: {}", cached_url);
                self.lock()
                    .insert(source_url.to_string(), cached_url.clone());
                Resolution::Cached(cached_url)
            }
            Err(e) => {
                log::warn!("Cache failed, using original: {} ({})", source_url, e);
                Resolution::Fallback(source_url.to_string())
            }
        }
    }

    /// Resolve URLs in sequential batches of `batch_size`
    ///
    /// Members of a batch are resolved concurrently; the next batch starts
    /// once every member settled and the batch pause elapsed.
    pub async fn prefetch(&self, urls: &[String], batch_size: usize) -> PrefetchReport {
        let mut report = PrefetchReport::default();
        if urls.is_empty() {
            return report;
        }

        log::info!("Preloading {} images", urls.len());
        let batches = batches(urls, batch_size);
        let total = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            let results = join_all(batch.iter().map(|url| self.resolve(url))).await;
            report
                .resolved
                .extend(batch.iter().cloned().zip(results));
            report.batches += 1;

            if index + 1 < total && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }
        }

        log::info!(
            "Preloaded {} images ({} fell back to source)",
            urls.len(),
            report.failed_count()
        );
        report
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Split into consecutive groups of at most `size` (a size of 0 is treated as 1)
pub fn batches<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}
