//! Apify response cache and image cache administration

use chrono::{DateTime, Local};
use press_client::models::ApifyCacheStats;
use press_client::Resolution;

use super::{describe, Outcome};
use crate::app::App;

fn kilobytes(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Render an RFC 3339 timestamp in local time, or leave it as sent
fn local_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn format_apify_stats(stats: &ApifyCacheStats) -> String {
    let mut message = format!(
        "📊 Cache Statistics:\n• Total files: {}\n• Total size: {}",
        stats.total_files,
        kilobytes(stats.total_size_bytes)
    );
    if let Some(oldest) = &stats.oldest_entry {
        message.push_str(&format!("\n• Oldest entry: {}", local_time(oldest)));
    }
    if let Some(newest) = &stats.newest_entry {
        message.push_str(&format!("\n• Newest entry: {}", local_time(newest)));
    }

    if !stats.by_operation.is_empty() {
        message.push_str("\n\n📁 By operation:");
        for (operation, op) in &stats.by_operation {
            message.push_str(&format!(
                "\n• {}: {} files ({})",
                operation,
                op.files,
                kilobytes(op.size_bytes)
            ));
            if op.expired > 0 {
                message.push_str(&format!(" - {} expired", op.expired));
            }
        }
    }
    message
}

pub async fn apify_cache_stats(app: &App) -> Outcome {
    app.transcript.system("📊 Getting cache statistics...");
    match app.client.apify_cache_stats().await {
        Ok(stats) => {
            app.transcript.system(format_apify_stats(&stats));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Error getting cache stats: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub async fn clear_expired_cache(app: &App) -> Outcome {
    app.transcript.system("🧹 Clearing expired cache entries...");
    match app.client.clear_expired_cache().await {
        Ok(ack) => {
            app.transcript
                .success(ack.message.unwrap_or_else(|| "Expired entries cleared".to_string()));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Error clearing cache: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub async fn clear_user_cache(app: &App, username: &str) -> Outcome {
    let username = username.trim_start_matches('@');
    if username.is_empty() {
        app.transcript.error("A username is required");
        return Outcome::Failed;
    }

    app.transcript
        .system(format!("🧹 Clearing cache for @{}...", username));
    match app.client.clear_user_cache(username).await {
        Ok(ack) => {
            app.transcript.success(
                ack.message
                    .unwrap_or_else(|| format!("Cache cleared for @{}", username)),
            );
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Error clearing user cache: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub async fn clear_all_cache(app: &App) -> Outcome {
    if !app.confirm("Clear ALL cached Apify data? This cannot be undone.") {
        return Outcome::Unchanged;
    }

    app.transcript.system("🧹 Clearing all cache entries...");
    match app.client.clear_all_cache().await {
        Ok(ack) => {
            app.transcript
                .success(ack.message.unwrap_or_else(|| "All cache entries cleared".to_string()));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Error clearing all cache: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// Server-side image cache statistics plus the in-memory entry count
pub async fn image_cache_stats(app: &App) -> Outcome {
    match app.client.image_cache_stats().await {
        Ok(stats) => {
            app.transcript.system(format!(
                "📊 Image Cache Stats:\n• Files: {}\n• Size: {} MB\n• Directory: {}\n• Resolved this session: {}",
                stats.total_files,
                stats.total_size_mb,
                stats.cache_dir.as_deref().unwrap_or("unknown"),
                app.images.len()
            ));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Cache stats error: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// Clear the server-side image cache, then the in-memory map
///
/// The in-memory map is left alone when the server clear fails.
pub async fn clear_image_cache(app: &App) -> Outcome {
    if !app.confirm(
        "Clear all cached Instagram images? This frees disk space but images will need to be re-downloaded.",
    ) {
        return Outcome::Unchanged;
    }

    app.transcript.system("🧹 Clearing image cache...");
    match app.client.clear_image_cache().await {
        Ok(ack) => {
            app.images.clear();
            app.transcript.success(format!(
                "Cleared {} cached images",
                ack.removed_count.unwrap_or(0)
            ));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Cache clear error: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// Resolve one image URL through the cache and report how
pub async fn resolve_image(app: &App, source_url: &str) -> Outcome {
    match app.images.resolve(source_url).await {
        Resolution::Hit(url) => app.transcript.info(format!("Cached (memory): {}", url)),
        Resolution::Cached(url) => app.transcript.success(format!("Cached: {}", url)),
        Resolution::Fallback(url) => {
            app.transcript.info(format!("Cache unavailable, using original: {}", url))
        }
    }
    Outcome::Unchanged
}

/// Pre-fetch every image of the posts in the viewer and wait for it
pub async fn prefetch_viewer_images(app: &App) -> Outcome {
    let urls = app.viewer().image_urls();
    if urls.is_empty() {
        app.transcript.info("No post images to pre-fetch");
        return Outcome::Unchanged;
    }

    app.transcript
        .system(format!("📥 Preloading {} Instagram images...", urls.len()));
    let report = app.images.prefetch(&urls, app.config.prefetch_batch_size).await;
    app.transcript.success(format!(
        "Preloaded {} images in {} batches ({} fell back to the original)",
        urls.len(),
        report.batches,
        report.failed_count()
    ));
    Outcome::Unchanged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::app;
    use crate::transcript::Role;
    use press_client::models::InstagramPost;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_cache_image(server: &MockServer, expected: u64) {
        Mock::given(method("POST"))
            .and(path("/instagram/cache-image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cached_url": "/static/cache/a.jpg"
            })))
            .expect(expected)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_apify_stats_rendering() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instagram/apify/cache/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cache_stats": {
                    "total_files": 3,
                    "total_size_bytes": 2048,
                    "by_operation": {
                        "scrape_user": {"files": 2, "size_bytes": 1536, "expired": 1},
                        "profile": {"files": 1, "size_bytes": 512, "expired": 0}
                    }
                }
            })))
            .mount(&server)
            .await;
        let app = app(&server.uri());

        apify_cache_stats(&app).await;
        assert!(app.transcript.has(Role::System, "• Total size: 2.0 KB"));
        assert!(app.transcript.has(Role::System, "• scrape_user: 2 files (1.5 KB) - 1 expired"));
        assert!(app.transcript.has(Role::System, "• profile: 1 files (0.5 KB)"));
        assert!(!app.transcript.has(Role::System, "0 expired"));
    }

    #[test]
    fn test_local_time_keeps_unparsable_input() {
        assert_eq!(local_time("yesterday"), "yesterday");
        assert_eq!(local_time("2024-05-01T10:00:00+00:00").len(), 19);
    }

    #[tokio::test]
    async fn test_image_clear_empties_memory_after_success() {
        let server = MockServer::start().await;
        mount_cache_image(&server, 2).await;
        Mock::given(method("POST"))
            .and(path("/instagram/image-cache/clear"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "removed_count": 4
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = app(&server.uri());

        resolve_image(&app, "img1").await;
        assert_eq!(app.images.len(), 1);

        clear_image_cache(&app).await;
        assert!(app.images.is_empty());
        assert!(app.transcript.has(Role::Success, "Cleared 4 cached images"));

        resolve_image(&app, "img1").await;
        assert!(app.transcript.has(Role::Success, "Cached: /static/cache/a.jpg"));
    }

    #[tokio::test]
    async fn test_failed_image_clear_keeps_memory() {
        let server = MockServer::start().await;
        mount_cache_image(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/instagram/image-cache/clear"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;
        let app = app(&server.uri());

        resolve_image(&app, "img1").await;
        assert!(clear_image_cache(&app).await.is_failed());
        assert_eq!(app.images.len(), 1);
        assert!(app.transcript.has(Role::Error, "Failed to clear cache"));

        resolve_image(&app, "img1").await;
        assert!(app.transcript.has(Role::Info, "Cached (memory)"));
    }

    #[tokio::test]
    async fn test_declined_clear_all_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let app = app(&server.uri()).with_confirm(|_| false);

        assert_eq!(clear_all_cache(&app).await, Outcome::Unchanged);
    }

    #[tokio::test]
    async fn test_image_stats_include_session_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instagram/image-cache/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cache_stats": {"total_files": 12, "total_size_mb": 3.4, "cache_dir": "static/cache"}
            })))
            .mount(&server)
            .await;
        let app = app(&server.uri());

        image_cache_stats(&app).await;
        assert!(app.transcript.has(Role::System, "• Files: 12"));
        assert!(app.transcript.has(Role::System, "• Size: 3.4 MB"));
        assert!(app.transcript.has(Role::System, "• Resolved this session: 0"));
    }

    #[tokio::test]
    async fn test_prefetch_viewer_images() {
        let server = MockServer::start().await;
        mount_cache_image(&server, 4).await;
        let app = app(&server.uri());
        let posts = (0..4)
            .map(|i| InstagramPost {
                image_url: Some(format!("https://cdn/{}.jpg", i)),
                ..Default::default()
            })
            .collect();
        app.viewer().load(posts);

        prefetch_viewer_images(&app).await;
        assert!(app.transcript.has(Role::Success, "Preloaded 4 images in 2 batches (0 fell back"));
        assert_eq!(app.images.len(), 4);
    }
}
