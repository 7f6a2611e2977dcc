//! One function per user action
//!
//! Handlers never return errors: each renders its own failure into the
//! transcript and reports an [`Outcome`]. Cross-cutting behaviour (post list
//! refresh, image pre-fetch) is added by the wrappers in this module.

pub mod cache;
pub mod chat;
pub mod instagram;
pub mod posts;
pub mod site;

use press_client::{PrefetchReport, PressError};
use std::future::Future;
use tokio::task::JoinHandle;

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing on the backend changed
    Unchanged,
    /// Posts were created, changed or removed
    Changed,
    /// The action failed and was reported
    Failed,
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Follow-up work a handler leaves running, such as a tracked job or a pre-fetch
pub type Job = JoinHandle<()>;

/// Job that finishes when a pre-fetch has settled
pub fn settled(prefetch: JoinHandle<PrefetchReport>) -> Job {
    tokio::spawn(async move {
        if let Err(e) = prefetch.await {
            log::warn!("Image pre-fetch task failed: {}", e);
        }
    })
}

/// User-facing text for an error
///
/// Transport failures get a generic line; backend messages are shown verbatim.
pub fn describe(e: &PressError) -> String {
    if e.is_transport() {
        log::debug!("Transport failure: {}", e);
        "Could not reach the server. Is the backend running?".to_string()
    } else {
        e.to_string()
    }
}

/// Run a handler and reload the post list when it changed something
pub async fn refreshing<F>(app: &App, handler: F) -> Outcome
where
    F: Future<Output = Outcome>,
{
    let outcome = handler.await;
    if outcome == Outcome::Changed {
        posts::load_posts(app).await;
    }
    outcome
}

/// Run a display handler, then pre-fetch the images of the posts it shows
///
/// The pre-fetch runs in the background; the handle resolves to its report.
pub async fn with_image_prefetch<F>(
    app: &App,
    display: F,
) -> (Outcome, Option<JoinHandle<PrefetchReport>>)
where
    F: Future<Output = Outcome>,
{
    let outcome = display.await;
    if outcome.is_failed() {
        return (outcome, None);
    }

    let urls = app.viewer().image_urls();
    if urls.is_empty() {
        return (outcome, None);
    }

    let images = app.images.clone();
    let batch_size = app.config.prefetch_batch_size;
    let handle = tokio::spawn(async move { images.prefetch(&urls, batch_size).await });
    (outcome, Some(handle))
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

    #[test]
    fn test_describe_hides_transport_details() {
        let transport = PressError::Transport("tcp connect error".to_string());
        assert!(!describe(&transport).contains("tcp"));
        assert_eq!(describe(&PressError::rejected("not found")), "not found");
    }

    #[tokio::test]
    async fn test_refreshing_reloads_only_after_change() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        let app = app(&server.uri());

        assert_eq!(refreshing(&app, async { Outcome::Unchanged }).await, Outcome::Unchanged);
        assert_eq!(refreshing(&app, async { Outcome::Failed }).await, Outcome::Failed);
        assert_eq!(refreshing(&app, async { Outcome::Changed }).await, Outcome::Changed);
        assert!(app.transcript.has(Role::Info, "No posts found"));
    }

    #[tokio::test]
    async fn test_prefetch_after_display() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instagram/cache-image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cached_url": "/static/cache/x.jpg"
            })))
            .expect(4)
            .mount(&server)
            .await;
        let app = app(&server.uri());

        let posts: Vec<InstagramPost> = (0..4)
            .map(|i| InstagramPost {
                image_url: Some(format!("https://cdn/{}.jpg", i)),
                ..Default::default()
            })
            .collect();
        let display = async {
            app.viewer().load(posts);
            Outcome::Unchanged
        };

        let (outcome, handle) = with_image_prefetch(&app, display).await;
        assert_eq!(outcome, Outcome::Unchanged);
        let report = handle.unwrap().await.unwrap();
        assert_eq!(report.batches, 2);
        assert_eq!(app.images.len(), 4);
    }

    #[tokio::test]
    async fn test_no_prefetch_when_display_failed() {
        let app = app("http://127.0.0.1:9");
        app.viewer().load(vec![InstagramPost {
            image_url: Some("https://cdn/a.jpg".to_string()),
            ..Default::default()
        }]);

        let (outcome, handle) = with_image_prefetch(&app, async { Outcome::Failed }).await;
        assert!(outcome.is_failed());
        assert!(handle.is_none());
    }
}
