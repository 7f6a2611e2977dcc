//! Instagram scraping, imports and the post viewer
//!
//! Scrapes and bulk imports may run as tracked backend jobs. Their handlers
//! return once the job is started, together with a [`Job`] handle that
//! finishes after the job's terminal event has been rendered.

use press_client::models::InstagramPost;
use press_client::{PrefetchReport, PressError, ProgressCallbacks, ProgressData, ProgressFailure};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::{describe, posts, settled, with_image_prefetch, Job, Outcome};
use crate::app::App;
use crate::transcript::ProgressLine;
use crate::viewer::{self, EMPTY_VIEWER};

enum JobEnd {
    Complete(ProgressData),
    Failed(ProgressFailure),
}

/// Sender shared by the complete and error callbacks; whichever fires first wins
#[derive(Clone)]
struct Completion(Arc<Mutex<Option<oneshot::Sender<JobEnd>>>>);

impl Completion {
    fn new() -> (Self, oneshot::Receiver<JobEnd>) {
        let (tx, rx) = oneshot::channel();
        (Self(Arc::new(Mutex::new(Some(tx)))), rx)
    }

    fn send(&self, end: JobEnd) {
        let sender = self
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(tx) = sender {
            let _ = tx.send(end);
        }
    }
}

/// Start tracking `session_id`, drawing progress on `line`
///
/// `None` when the session is already tracked.
fn track(app: &App, session_id: &str, line: &ProgressLine) -> Option<oneshot::Receiver<JobEnd>> {
    let (completion, rx) = Completion::new();
    let on_error = completion.clone();
    let progress_line = line.clone();

    let callbacks = ProgressCallbacks::new()
        .on_progress(move |data| progress_line.update(data))
        .on_complete(move |data| completion.send(JobEnd::Complete(data)))
        .on_error(move |failure| on_error.send(JobEnd::Failed(failure)));

    app.tracker.start(session_id, callbacks).then_some(rx)
}

fn drafts_link(drafts_url: Option<&str>) -> String {
    match drafts_url {
        Some(url) => format!("\n\n📝 View and publish your drafts in WordPress → {}", url),
        None => String::new(),
    }
}

/// Check whether the Apify integration is configured
pub async fn apify_status(app: &App) -> Outcome {
    app.transcript.system("🔍 Checking Apify integration status...");
    match app.client.apify_status().await {
        Ok(status) if status.available => {
            let mut message = "✅ Apify integration is ready!".to_string();
            if let Some(plan) = status.usage_info.and_then(|u| u.plan) {
                message.push_str(&format!(" Plan: {}", plan));
            }
            app.transcript.system(message);
            Outcome::Unchanged
        }
        Ok(_) => {
            app.transcript
                .error("Apify not configured. Set APIFY_API_TOKEN in environment variables.");
            Outcome::Failed
        }
        Err(e) => {
            app.transcript
                .error(format!("Error checking Apify status: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// Scrape a user's posts and show them in the viewer
///
/// When the backend hands back a progress session the posts are shown after
/// the job completes; otherwise immediately.
pub async fn scrape_user(app: &App, username: &str, limit: u32) -> (Outcome, Option<Job>) {
    let username = username.trim_start_matches('@');
    app.transcript.system(format!(
        "🔄 Scraping @{} via Apify (limit: {})...",
        username, limit
    ));

    let response = match app.client.scrape_user(username, limit).await {
        Ok(response) => response,
        Err(e) => {
            app.transcript.error(format!("Scraping failed: {}", describe(&e)));
            app.transcript.info(EMPTY_VIEWER);
            return (Outcome::Failed, None);
        }
    };

    let Some(session_id) = response.progress_session_id.clone() else {
        let count = response.posts_count.unwrap_or(response.posts.len());
        app.transcript
            .system(format!("✅ Scraped {} posts from @{}", count, username));
        let has_posts = !response.posts.is_empty();
        let job = show_posts_then_prefetch(app, response.posts)
            .await
            .map(settled);
        if has_posts {
            app.transcript.system("Import all to WordPress with: /import-all");
        }
        return (Outcome::Unchanged, job);
    };

    let line = app
        .transcript
        .progress(&format!("🚀 Starting scrape of @{}...", username));
    let Some(done) = track(app, &session_id, &line) else {
        return (Outcome::Unchanged, None);
    };

    let app = app.clone();
    let posts = response.posts;
    let job = tokio::spawn(async move {
        match done.await {
            Ok(JobEnd::Complete(data)) => {
                line.complete(&data.message);
                let has_posts = !posts.is_empty();
                if let Some(prefetch) = show_posts_then_prefetch(&app, posts).await {
                    let _ = prefetch.await;
                }
                if has_posts {
                    app.transcript.system("Import all to WordPress with: /import-all");
                }
            }
            Ok(JobEnd::Failed(failure)) => {
                line.fail(&format!("Scraping failed: {}", failure_text(&failure)));
            }
            Err(_) => log::debug!("Scrape session {} stopped before finishing", session_id),
        }
    });
    (Outcome::Unchanged, Some(job))
}

/// Scrape a user and import the posts as drafts in one backend job
pub async fn bulk_import(app: &App, username: &str, limit: u32) -> (Outcome, Option<Job>) {
    let username = username.trim_start_matches('@');
    let response = match app.client.bulk_import(username, limit).await {
        Ok(response) => response,
        Err(e) => {
            app.transcript.error(format!("Bulk import failed: {}", describe(&e)));
            return (Outcome::Failed, None);
        }
    };

    let Some(session_id) = response.progress_session_id.clone() else {
        app.transcript
            .error("Bulk import failed: No progress tracking available");
        return (Outcome::Failed, None);
    };

    let line = app
        .transcript
        .progress(&format!("🚀 Starting bulk import of @{}...", username));
    let Some(done) = track(app, &session_id, &line) else {
        return (Outcome::Unchanged, None);
    };

    let app = app.clone();
    let drafts_url = response.drafts_url;
    let job = tokio::spawn(async move {
        match done.await {
            Ok(JobEnd::Complete(data)) => {
                let message = format!("{}{}", data.message, drafts_link(drafts_url.as_deref()));
                line.complete(&message);
                posts::load_posts(&app).await;
            }
            Ok(JobEnd::Failed(failure)) => {
                line.fail(&format!("Bulk import failed: {}", failure_text(&failure)));
            }
            Err(_) => log::debug!("Bulk import session {} stopped before finishing", session_id),
        }
    });
    (Outcome::Unchanged, Some(job))
}

fn failure_text(failure: &ProgressFailure) -> &str {
    if failure.error.is_empty() {
        "Unknown error"
    } else {
        &failure.error
    }
}

/// Scrape individual post URLs and show the results
pub async fn scrape_urls(
    app: &App,
    urls: &[String],
) -> (Outcome, Option<JoinHandle<PrefetchReport>>) {
    app.transcript.system(format!(
        "🔄 Scraping {} Instagram URLs via Apify...",
        urls.len()
    ));

    match app.client.scrape_urls(urls).await {
        Ok(response) => {
            app.transcript.system(format!(
                "✅ Scraped {} posts from {} URLs",
                response.posts_count.unwrap_or(response.posts.len()),
                response.urls_count.unwrap_or(urls.len())
            ));
            let has_posts = !response.posts.is_empty();
            let prefetch = show_posts_then_prefetch(app, response.posts).await;
            if has_posts {
                app.transcript.system("Import to WordPress with: /import-all");
            }
            (Outcome::Unchanged, prefetch)
        }
        Err(e) => {
            app.transcript
                .error(format!("URL scraping failed: {}", describe(&e)));
            app.transcript.info(EMPTY_VIEWER);
            (Outcome::Failed, None)
        }
    }
}

/// Import scraped posts as WordPress drafts
pub async fn import_scraped_posts(app: &App, posts: &[InstagramPost]) -> Outcome {
    if posts.is_empty() {
        app.transcript.info("No scraped posts to import");
        return Outcome::Unchanged;
    }

    app.transcript.system(format!(
        "📥 Importing {} Apify posts to WordPress...",
        posts.len()
    ));
    match app.client.import_scraped_posts(posts).await {
        Ok(response) => {
            app.transcript.success(format!(
                "🎉 Successfully imported {} of {} posts to WordPress as drafts!{}",
                response.imported_count,
                response.total_posts.unwrap_or(posts.len()),
                drafts_link(response.drafts_url.as_deref())
            ));
            Outcome::Changed
        }
        Err(e) => {
            app.transcript
                .error(format!("WordPress import failed: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// Import every post in the viewer
pub async fn import_all(app: &App) -> Outcome {
    let posts = app.viewer().posts().to_vec();
    import_scraped_posts(app, &posts).await
}

/// Import the post currently shown in the viewer
pub async fn import_current(app: &App) -> Outcome {
    let current = app.viewer().current().cloned();
    match current {
        Some(post) => import_scraped_posts(app, &[post]).await,
        None => {
            app.transcript.info(EMPTY_VIEWER);
            Outcome::Unchanged
        }
    }
}

/// Extract posts from URLs, then import them as drafts
pub async fn import_urls(app: &App, urls: &[String]) -> Outcome {
    if urls.is_empty() {
        app.transcript.error("No Instagram URLs given");
        return Outcome::Failed;
    }

    app.transcript
        .system(format!("🔄 Importing {} Instagram post(s)...", urls.len()));
    let extracted = match app.client.extract_urls(urls).await {
        Ok(response) if !response.posts.is_empty() => response.posts,
        Ok(_) => {
            app.transcript
                .error("Could not extract posts from URLs: Unknown error");
            return Outcome::Failed;
        }
        Err(e @ PressError::Api { .. }) => {
            app.transcript
                .error(format!("Could not extract posts from URLs: {}", e));
            return Outcome::Failed;
        }
        Err(e) => {
            app.transcript.error(format!("Import failed: {}", describe(&e)));
            return Outcome::Failed;
        }
    };

    app.transcript.system(format!(
        "✅ Extracted {} posts. Importing to WordPress...",
        extracted.len()
    ));
    match app.client.import_extracted_posts(&extracted).await {
        Ok(response) => {
            app.transcript.success(format!(
                "🎉 Successfully imported {} posts to WordPress as drafts!{}",
                response.imported_count,
                drafts_link(response.drafts_url.as_deref())
            ));
            Outcome::Changed
        }
        Err(e @ PressError::Api { .. }) => {
            app.transcript.error(format!("WordPress import failed: {}", e));
            Outcome::Failed
        }
        Err(e) => {
            app.transcript.error(format!("Import failed: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub fn sample_import(app: &App) -> Outcome {
    app.transcript.system(
        "🧪 This would import sample posts from @example_user. Replace with real Instagram URLs to test.",
    );
    Outcome::Unchanged
}

pub async fn profile(app: &App, username: &str) -> Outcome {
    let username = username.trim_start_matches('@');
    app.transcript
        .system(format!("👤 Getting profile info for @{}...", username));

    match app.client.profile(username).await {
        Ok(profile) => {
            let count = |n: Option<u64>| n.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string());
            let yes_no = |b: bool| if b { "Yes" } else { "No" };
            app.transcript.system(format!(
                "✅ Profile found for @{}:\n• Full name: {}\n• Followers: {}\n• Following: {}\n• Posts: {}\n• Verified: {}\n• Private: {}",
                username,
                profile.full_name.as_deref().unwrap_or("N/A"),
                count(profile.followers_count),
                count(profile.following_count),
                count(profile.posts_count),
                yes_no(profile.is_verified),
                yes_no(profile.is_private),
            ));
            Outcome::Unchanged
        }
        Err(PressError::Api { status_code: None, .. }) => {
            app.transcript
                .error(format!("Profile not found for @{}", username));
            Outcome::Failed
        }
        Err(e) => {
            app.transcript
                .error(format!("Error getting profile: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// Load posts into the viewer and show the first one
pub async fn display_instagram_posts(app: &App, posts: Vec<InstagramPost>) -> Outcome {
    let empty = posts.is_empty();
    app.viewer().load(posts);
    if empty {
        app.transcript.info(EMPTY_VIEWER);
        return Outcome::Unchanged;
    }
    show_current(app).await
}

async fn show_posts_then_prefetch(
    app: &App,
    posts: Vec<InstagramPost>,
) -> Option<JoinHandle<PrefetchReport>> {
    let (_, prefetch) = with_image_prefetch(app, display_instagram_posts(app, posts)).await;
    prefetch
}

/// Render the current viewer post, resolving its image through the cache
pub async fn show_current(app: &App) -> Outcome {
    let current = {
        let viewer = app.viewer();
        viewer.current().cloned().zip(viewer.position())
    };
    let Some((post, position)) = current else {
        app.transcript.info(EMPTY_VIEWER);
        return Outcome::Unchanged;
    };

    let image = match post.image_url.as_deref() {
        Some(url) => Some(app.images.resolve(url).await.into_url()),
        None => None,
    };
    app.transcript
        .info(viewer::render(&post, position, image.as_deref()));
    Outcome::Unchanged
}

pub async fn next_post(app: &App) -> Outcome {
    let moved = app.viewer().next();
    if !moved {
        app.transcript.info("Already at the last post");
        return Outcome::Unchanged;
    }
    show_current(app).await
}

pub async fn previous_post(app: &App) -> Outcome {
    let moved = app.viewer().previous();
    if !moved {
        app.transcript.info("Already at the first post");
        return Outcome::Unchanged;
    }
    show_current(app).await
}

/// Print the current post's Instagram link
pub fn open_current(app: &App) -> Outcome {
    let link = app.viewer().current().and_then(|p| p.post_url.clone());
    match link {
        Some(url) => app.transcript.info(format!("🔗 {}", url)),
        None => app.transcript.info("Current post has no Instagram link"),
    }
    Outcome::Unchanged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::app;
    use crate::transcript::Role;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sse(frames: &[&str]) -> ResponseTemplate {
        let body: String = frames.iter().map(|f| format!("data: {}\n\n", f)).collect();
        ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
    }

    async fn mount_image_cache(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/instagram/cache-image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cached_url": "/static/cache/img.jpg"
            })))
            .mount(server)
            .await;
    }

    fn scraped() -> serde_json::Value {
        json!([
            {"username": "example", "caption": "one", "image_url": "https://cdn/1.jpg", "post_url": "https://www.instagram.com/p/A/"},
            {"username": "example", "caption": "two", "image_url": "https://cdn/2.jpg"}
        ])
    }

    #[tokio::test]
    async fn test_tracked_scrape_shows_posts_on_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/apify/scrape-user"))
            .and(body_json(json!({"username": "example", "limit": 20})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "progress_session_id": "s1",
                "posts": scraped()
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/progress/stream/s1"))
            .respond_with(sse(&[
                r#"{"type":"connected","session_id":"s1"}"#,
                r#"{"type":"progress","message":"Fetching","percentage":50}"#,
                r#"{"type":"complete","message":"Scraped 2 posts"}"#,
            ]))
            .expect(1)
            .mount(&server)
            .await;
        mount_image_cache(&server).await;
        let app = app(&server.uri());

        let (outcome, job) = scrape_user(&app, "@example", 20).await;
        assert_eq!(outcome, Outcome::Unchanged);
        job.unwrap().await.unwrap();

        assert!(app.transcript.has(Role::System, "Starting scrape of @example"));
        assert!(app.transcript.has(Role::Success, "Scraped 2 posts"));
        assert!(app.transcript.has(Role::Info, "/static/cache/img.jpg"));
        assert!(app.transcript.has(Role::System, "/import-all"));
        assert_eq!(app.viewer().position(), Some((1, 2)));
        assert!(!app.tracker.is_tracking("s1"));
        assert_eq!(app.images.len(), 2);
    }

    #[tokio::test]
    async fn test_untracked_scrape_shows_posts_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/apify/scrape-user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "posts_count": 2,
                "posts": scraped()
            })))
            .mount(&server)
            .await;
        mount_image_cache(&server).await;
        let app = app(&server.uri());

        let (_, job) = scrape_user(&app, "example", 5).await;
        assert!(app.transcript.has(Role::System, "✅ Scraped 2 posts from @example"));
        assert_eq!(app.viewer().position(), Some((1, 2)));
        job.unwrap().await.unwrap();
        assert_eq!(app.images.len(), 2);
    }

    #[tokio::test]
    async fn test_scrape_rejection_shows_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/apify/scrape-user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "Apify token missing"
            })))
            .mount(&server)
            .await;
        let app = app(&server.uri());

        let (outcome, job) = scrape_user(&app, "example", 5).await;
        assert!(outcome.is_failed());
        assert!(job.is_none());
        assert!(app.transcript.has(Role::Error, "Scraping failed: Apify token missing"));
        assert!(app.transcript.has(Role::Info, "No Instagram Posts Found"));
    }

    #[tokio::test]
    async fn test_bulk_import_error_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/apify/bulk-import"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "progress_session_id": "b1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/progress/stream/b1"))
            .respond_with(sse(&[r#"{"type":"error","error":"Rate limited"}"#]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        let app = app(&server.uri());

        let (_, job) = bulk_import(&app, "shop", 10).await;
        job.unwrap().await.unwrap();
        assert!(app.transcript.has(Role::Error, "Bulk import failed: Rate limited"));
    }

    #[tokio::test]
    async fn test_bulk_import_complete_refreshes_posts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/apify/bulk-import"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "progress_session_id": "b2",
                "drafts_url": "https://site/wp-admin/edit.php?post_status=draft"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/progress/stream/b2"))
            .respond_with(sse(&[r#"{"type":"complete","message":"Imported 3 posts"}"#]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        let app = app(&server.uri());

        let (_, job) = bulk_import(&app, "shop", 10).await;
        job.unwrap().await.unwrap();
        assert!(app.transcript.has(Role::Success, "Imported 3 posts"));
        assert!(app.transcript.has(Role::Success, "post_status=draft"));
    }

    #[tokio::test]
    async fn test_bulk_import_connection_lost() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/apify/bulk-import"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "progress_session_id": "b3"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/progress/stream/b3"))
            .respond_with(sse(&[r#"{"type":"progress","message":"Working"}"#]))
            .mount(&server)
            .await;
        let app = app(&server.uri());

        let (_, job) = bulk_import(&app, "shop", 10).await;
        job.unwrap().await.unwrap();
        assert!(app.transcript.has(Role::Error, "Bulk import failed: Connection lost"));
    }

    #[tokio::test]
    async fn test_import_urls_two_stages() {
        let server = MockServer::start().await;
        let urls = vec!["https://www.instagram.com/p/ABC/".to_string()];
        Mock::given(method("POST"))
            .and(path("/instagram/import-urls"))
            .and(body_json(json!({"urls": urls})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "posts": [{"caption": "hi", "shortcode": "ABC"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/instagram/import-to-wordpress"))
            .and(body_json(json!({"posts": [{"caption": "hi", "shortcode": "ABC"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "imported_count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = app(&server.uri());

        assert_eq!(import_urls(&app, &urls).await, Outcome::Changed);
        assert!(app.transcript.has(Role::System, "Extracted 1 posts"));
        assert!(app.transcript.has(Role::Success, "imported 1 posts"));
    }

    #[tokio::test]
    async fn test_import_urls_nothing_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/import-urls"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "posts": []})))
            .mount(&server)
            .await;
        let app = app(&server.uri());

        let urls = vec!["https://www.instagram.com/p/X/".to_string()];
        assert!(import_urls(&app, &urls).await.is_failed());
        assert!(app.transcript.has(Role::Error, "Could not extract posts from URLs: Unknown error"));
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instagram/apify/profile/ghost"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;
        let app = app(&server.uri());

        assert!(profile(&app, "@ghost").await.is_failed());
        assert!(app.transcript.has(Role::Error, "Profile not found for @ghost"));
    }

    #[tokio::test]
    async fn test_profile_rendering() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instagram/apify/profile/example"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "profile": {"full_name": "Example Co", "followers_count": 1200, "is_verified": true}
            })))
            .mount(&server)
            .await;
        let app = app(&server.uri());

        profile(&app, "example").await;
        assert!(app.transcript.has(Role::System, "• Full name: Example Co"));
        assert!(app.transcript.has(Role::System, "• Followers: 1200"));
        assert!(app.transcript.has(Role::System, "• Following: N/A"));
        assert!(app.transcript.has(Role::System, "• Verified: Yes"));
    }

    #[tokio::test]
    async fn test_viewer_navigation_uses_image_cache() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/cache-image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .expect(2)
            .mount(&server)
            .await;
        let app = app(&server.uri());
        let posts: Vec<InstagramPost> = serde_json::from_value(scraped()).unwrap();

        display_instagram_posts(&app, posts).await;
        assert!(app.transcript.has(Role::Info, "https://cdn/1.jpg"));

        next_post(&app).await;
        assert!(app.transcript.has(Role::Info, "2 of 2"));
        next_post(&app).await;
        assert!(app.transcript.has(Role::Info, "Already at the last post"));

        previous_post(&app).await;
        open_current(&app);
        assert!(app.transcript.has(Role::Info, "🔗 https://www.instagram.com/p/A/"));
    }

    #[tokio::test]
    async fn test_import_current_sends_one_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/apify/import-to-wordpress"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "imported_count": 1,
                "total_posts": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = app(&server.uri());
        app.viewer()
            .load(serde_json::from_value(scraped()).unwrap());

        assert_eq!(import_current(&app).await, Outcome::Changed);
        assert!(app.transcript.has(Role::Success, "imported 1 of 1 posts"));
    }
}
