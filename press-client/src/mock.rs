//! Mock image backend for testing
//!
//! Counts calls, records how many requests were in flight at once, and fails
//! for a configurable set of URLs.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{PressError, Result};
use crate::image_cache::ImageCacheBackend;

/// An in-process stand-in for `POST /instagram/cache-image`
#[derive(Default)]
pub struct MockImageBackend {
    failing: HashSet<String>,
    call_count: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockImageBackend {
    /// Create a backend that caches every URL
    pub fn new() -> Self {
        Self::default()
    }

    /// Make requests for `url` fail
    pub fn failing_for(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Number of cache_image() calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent cache_image() calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Cached URL the mock hands out for a source URL
    pub fn cached_url_for(source_url: &str) -> String {
        let name = source_url.rsplit('/').next().unwrap_or(source_url);
        format!("/static/cache/{}", name)
    }
}

#[async_trait]
impl ImageCacheBackend for MockImageBackend {
    async fn cache_image(&self, source_url: &str) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Give sibling requests a chance to start
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(source_url) {
            return Err(PressError::rejected("Failed to cache image"));
        }
        Ok(Self::cached_url_for(source_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_and_fails() {
        let backend = MockImageBackend::new().failing_for("bad");

        assert_eq!(
            backend.cache_image("https://cdn/a.jpg").await.unwrap(),
            "/static/cache/a.jpg"
        );
        assert!(backend.cache_image("bad").await.is_err());
        assert_eq!(backend.call_count(), 2);
        assert_eq!(backend.max_in_flight(), 1);
    }
}
