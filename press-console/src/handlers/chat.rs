//! Chat messages, replies and reply actions

use press_client::models::{ChatAction, ChatResponse, StructuredAction};

use super::{cache, describe, instagram, refreshing, settled, Job, Outcome};
use crate::app::App;
use crate::csv_template;
use crate::feedback;
use crate::transcript::Role;

/// Send a chat message and render the reply
pub async fn send_message(app: &App, message: &str) -> Outcome {
    let message = message.trim();
    if message.is_empty() {
        return Outcome::Unchanged;
    }

    app.transcript.user(message);
    app.transcript.system(feedback::immediate_feedback(message));

    let typing = app.transcript.typing(feedback::typing_message(message));
    let reply = app.client.chat(message).await;
    typing.finish_and_clear();

    match reply {
        Ok(response) => {
            render_response(app, response);
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript.push(
                Role::Error,
                format!("Sorry, I encountered an error: {}", describe(&e)),
            );
            Outcome::Failed
        }
    }
}

/// Render a reply and remember its actions for `/do N`
pub fn render_response(app: &App, response: ChatResponse) {
    let role = if response.is_error() {
        Role::Error
    } else {
        Role::Assistant
    };
    app.transcript.push(role, response.message.clone());

    if !response.actions.is_empty() {
        let lines: Vec<String> = response
            .actions
            .iter()
            .enumerate()
            .map(|(i, action)| format!("  [{}] {}", i + 1, action.label()))
            .collect();
        app.transcript
            .info(format!("Actions (run with /do N):\n{}", lines.join("\n")));
    }
    app.set_actions(response.actions);

    if !response.suggestions.is_empty() {
        app.transcript
            .info(format!("💡 Try: {}", response.suggestions.join(" | ")));
    }

    if response.kind.as_deref() == Some("help") && !response.commands.is_empty() {
        let mut text = String::from("📋 Available Commands:");
        for category in &response.commands {
            text.push_str(&format!("\n\n{}:", category.category));
            for command in &category.commands {
                text.push_str(&format!("\n• {}", command));
            }
        }
        app.transcript.info(text);
    }
}

/// Run action number `number` of the latest reply
pub async fn run_action(app: &App, number: usize) -> (Outcome, Option<Job>) {
    match app.action(number) {
        Some(action) => execute_action(app, action).await,
        None => {
            app.transcript.error(format!("No action {}", number));
            (Outcome::Failed, None)
        }
    }
}

/// Execute a reply action
///
/// Text actions are sent back as the next message; structured actions are
/// dispatched on their type.
pub async fn execute_action(app: &App, action: ChatAction) -> (Outcome, Option<Job>) {
    match action {
        ChatAction::Text(text) => (send_message(app, &text).await, None),
        ChatAction::Structured(action) => execute_structured(app, action).await,
    }
}

async fn execute_structured(app: &App, action: StructuredAction) -> (Outcome, Option<Job>) {
    log::debug!("Executing chat action: {}", action.kind);
    let done = |outcome: Outcome| -> (Outcome, Option<Job>) { (outcome, None) };

    match action.kind.as_str() {
        "import_urls" => done(refreshing(app, instagram::import_urls(app, &action.urls)).await),
        "create_csv_template" => done(create_csv_template(app)),
        "sample_import" => done(instagram::sample_import(app)),
        "apify_status" => done(instagram::apify_status(app).await),
        "apify_scrape_user" => match required_username(app, &action) {
            Some(username) => {
                let limit = action.limit.unwrap_or(app.config.scrape_limit);
                instagram::scrape_user(app, username, limit).await
            }
            None => done(Outcome::Failed),
        },
        "apify_bulk_import" => match required_username(app, &action) {
            Some(username) => {
                let limit = action.limit.unwrap_or(app.config.bulk_import_limit);
                instagram::bulk_import(app, username, limit).await
            }
            None => done(Outcome::Failed),
        },
        "apify_scrape_urls" => {
            let (outcome, prefetch) = instagram::scrape_urls(app, &action.urls).await;
            (outcome, prefetch.map(settled))
        }
        "apify_profile" => match required_username(app, &action) {
            Some(username) => done(instagram::profile(app, username).await),
            None => done(Outcome::Failed),
        },
        "cache_stats" => done(cache::image_cache_stats(app).await),
        "clear_expired_cache" => done(cache::clear_expired_cache(app).await),
        "clear_user_cache" => match required_username(app, &action) {
            Some(username) => done(cache::clear_user_cache(app, username).await),
            None => done(Outcome::Failed),
        },
        "clear_all_cache" => done(cache::clear_all_cache(app).await),
        "clear_image_cache" => done(cache::clear_image_cache(app).await),
        _ => {
            let text = action.label.as_deref().unwrap_or(&action.kind);
            done(send_message(app, text).await)
        }
    }
}

fn required_username<'a>(app: &App, action: &'a StructuredAction) -> Option<&'a str> {
    let username = action.username.as_deref().filter(|u| !u.is_empty());
    if username.is_none() {
        app.transcript
            .error(format!("Action {} needs a username", action.kind));
    }
    username
}

/// Write the import template into the working directory
pub fn create_csv_template(app: &App) -> Outcome {
    let dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            app.transcript
                .error(format!("Error executing action: {}", e));
            return Outcome::Failed;
        }
    };
    match csv_template::write_template(&dir) {
        Ok(path) => {
            app.transcript.system(format!(
                "📄 CSV template saved to {}! Fill it with your Instagram data and use the import feature.",
                path.display()
            ));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript.error(format!("Error executing action: {:#}", e));
            Outcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::app;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_renders_reply_and_actions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "scrape instagram @example"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Ready to scrape @example",
                "type": "apify_scrape",
                "actions": [
                    {"type": "apify_scrape_user", "label": "Scrape now", "username": "example"},
                    "help"
                ],
                "suggestions": ["apify status", "cache stats"]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = app(&server.uri());

        assert_eq!(send_message(&app, " scrape instagram @example ").await, Outcome::Unchanged);

        assert!(app.transcript.has(Role::User, "scrape instagram @example"));
        assert!(app.transcript.has(Role::System, "Starting Instagram scrape for @example"));
        assert!(app.transcript.has(Role::Assistant, "Ready to scrape @example"));
        assert!(app.transcript.has(Role::Info, "[1] Scrape now"));
        assert!(app.transcript.has(Role::Info, "[2] help"));
        assert!(app.transcript.has(Role::Info, "💡 Try: apify status | cache stats"));
        assert_eq!(app.action(2), Some(ChatAction::Text("help".to_string())));
    }

    #[tokio::test]
    async fn test_help_reply_lists_commands() {
        let app = app("http://127.0.0.1:9");
        let response: ChatResponse = serde_json::from_value(json!({
            "message": "Here is what I can do",
            "type": "help",
            "commands": [{"category": "Posts", "commands": ["list posts", "list drafts"]}]
        }))
        .unwrap();

        render_response(&app, response);
        assert!(app.transcript.has(Role::Info, "Posts:\n• list posts\n• list drafts"));
    }

    #[tokio::test]
    async fn test_error_reply_and_transport_failure() {
        let app = app("http://127.0.0.1:9");
        render_response(
            &app,
            serde_json::from_value(json!({"message": "Unknown command", "type": "error"})).unwrap(),
        );
        assert!(app.transcript.has(Role::Error, "Unknown command"));

        assert!(send_message(&app, "hello").await.is_failed());
        assert!(app.transcript.has(Role::Error, "Sorry, I encountered an error: Could not reach"));
    }

    #[tokio::test]
    async fn test_cache_stats_action_reads_image_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instagram/image-cache/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cache_stats": {"total_files": 1, "total_size_mb": 0.2, "cache_dir": "c"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/instagram/apify/cache/stats"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let app = app(&server.uri());

        let action = ChatAction::Structured(StructuredAction {
            kind: "cache_stats".to_string(),
            label: None,
            username: None,
            limit: None,
            urls: vec![],
        });
        let (outcome, job) = execute_action(&app, action).await;
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(job.is_none());
        assert!(app.transcript.has(Role::System, "Image Cache Stats"));
    }

    #[tokio::test]
    async fn test_unknown_action_sends_label() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "Show drafts"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;
        let app = app(&server.uri());
        app.set_actions(vec![ChatAction::Structured(StructuredAction {
            kind: "list_drafts".to_string(),
            label: Some("Show drafts".to_string()),
            username: None,
            limit: None,
            urls: vec![],
        })]);

        run_action(&app, 1).await;
        assert!(app.transcript.has(Role::Assistant, "ok"));
    }

    #[tokio::test]
    async fn test_scrape_action_without_username() {
        let app = app("http://127.0.0.1:9");
        let action = ChatAction::Structured(StructuredAction {
            kind: "apify_scrape_user".to_string(),
            label: None,
            username: None,
            limit: None,
            urls: vec![],
        });
        let (outcome, _) = execute_action(&app, action).await;
        assert!(outcome.is_failed());
        assert!(app.transcript.has(Role::Error, "needs a username"));
        assert!(run_action(&app, 5).await.0.is_failed());
    }
}
