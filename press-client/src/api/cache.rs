use serde_json::json;

use super::{PressClient, accepted};
use crate::error::{PressError, Result};
use crate::models::{
    ApifyCacheStats, CacheAck, CacheImageResponse, ImageCacheStats, StatsEnvelope,
};

impl PressClient {
    /// Ask the backend to cache one image, returning the cached URL
    pub async fn cache_image(&self, instagram_url: &str) -> Result<String> {
        let response: CacheImageResponse = self
            .http
            .post("/instagram/cache-image", &json!({ "instagram_url": instagram_url }))
            .await?;
        let response = accepted(response, "Image caching failed")?;
        response
            .cached_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PressError::rejected("Image caching returned no URL"))
    }

    pub async fn apify_cache_stats(&self) -> Result<ApifyCacheStats> {
        stats(self.http.get("/instagram/apify/cache/stats").await?)
    }

    pub async fn clear_expired_cache(&self) -> Result<CacheAck> {
        let ack = self
            .http
            .post_empty("/instagram/apify/cache/clear-expired")
            .await?;
        accepted(ack, "Error clearing cache")
    }

    pub async fn clear_user_cache(&self, username: &str) -> Result<CacheAck> {
        let endpoint = format!(
            "/instagram/apify/cache/clear-user/{}",
            username.trim_start_matches('@')
        );
        accepted(self.http.post_empty(&endpoint).await?, "Error clearing user cache")
    }

    pub async fn clear_all_cache(&self) -> Result<CacheAck> {
        let ack = self.http.post_empty("/instagram/apify/cache/clear-all").await?;
        accepted(ack, "Error clearing all cache")
    }

    pub async fn image_cache_stats(&self) -> Result<ImageCacheStats> {
        stats(self.http.get("/instagram/image-cache/stats").await?)
    }

    /// Remove every image from the server-side cache
    pub async fn clear_image_cache(&self) -> Result<CacheAck> {
        let ack = self.http.post_empty("/instagram/image-cache/clear").await?;
        accepted(ack, "Failed to clear cache")
    }
}

fn stats<T>(envelope: StatsEnvelope<T>) -> Result<T> {
    accepted(envelope, "Failed to get cache stats")?
        .cache_stats
        .ok_or_else(|| PressError::rejected("Response carried no cache statistics"))
}
