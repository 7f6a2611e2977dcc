//! Site status, plugins, users and media

use super::{describe, Outcome};
use crate::app::App;

/// Prompt characters kept in a generated image title
const AI_TITLE_PROMPT_CHARS: usize = 50;

/// One-line connection banner shown at startup
pub async fn check_connection(app: &App) -> Outcome {
    match app.client.health().await {
        Ok(health) if health.wordpress_connected => {
            let site = health.site_name.as_deref().unwrap_or("WordPress");
            app.transcript.success(format!("Connected to {}", site));
            Outcome::Unchanged
        }
        Ok(_) => {
            app.transcript.error("WordPress connection failed");
            Outcome::Failed
        }
        Err(e) => {
            log::info!("Connection check failed: {}", e);
            app.transcript.error("⚠️ Connection check failed");
            Outcome::Failed
        }
    }
}

pub async fn site_health(app: &App) -> Outcome {
    app.transcript.info("Checking site health...");
    match app.client.health().await {
        Ok(health) => {
            app.transcript.success(format!(
                "Site Health Check\n• Site: {}\n• Status: Online and responding\n• Last Check: {}",
                health.site_name.as_deref().unwrap_or("unknown"),
                health.timestamp.as_deref().unwrap_or("unknown"),
            ));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Site health check failed: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub async fn list_plugins(app: &App) -> Outcome {
    app.transcript.info("Loading plugins...");
    match app.client.list_plugins().await {
        Ok(plugins) => {
            let mut text = String::from("🔌 Installed Plugins");
            for plugin in &plugins {
                text.push_str(&format!("\n• {} (v{})", plugin.name, plugin.version));
            }
            app.transcript.info(text);
            app.transcript.success(format!("Found {} plugins", plugins.len()));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Error loading plugins: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub async fn list_users(app: &App) -> Outcome {
    app.transcript.info("Loading users...");
    match app.client.list_users(app.config.post_list_limit).await {
        Ok(users) => {
            let mut text = String::from("👥 WordPress Users");
            for user in &users {
                text.push_str(&format!("\n• {} ({})", user.display_name, user.user_login));
                if !user.roles.is_empty() {
                    text.push_str(&format!(" - {}", user.roles.join(", ")));
                }
            }
            app.transcript.info(text);
            app.transcript.success(format!("Found {} users", users.len()));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript.error(format!("Error loading users: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// Side-load a remote file into the media library
pub async fn upload_media(app: &App, url: &str, title: Option<&str>, alt: Option<&str>) -> Outcome {
    let url = url.trim();
    if url.is_empty() {
        app.transcript.error("Please enter a media URL");
        return Outcome::Failed;
    }

    app.transcript.info("Uploading media...");
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    match app.client.upload_media(url, title, alt).await {
        Ok(media) => {
            app.transcript.success(format!(
                "Media uploaded successfully! ID: {}\n• Title: {}\n• URL: {}",
                media.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string()),
                media.title.as_deref().unwrap_or(""),
                media.url.as_deref().unwrap_or(""),
            ));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Error uploading media: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub async fn generate_ai_image(app: &App, prompt: &str) -> Outcome {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        app.transcript.error("Please enter an image description");
        return Outcome::Failed;
    }

    app.transcript.info("Generating AI image...");
    let short: String = prompt.chars().take(AI_TITLE_PROMPT_CHARS).collect();
    let title = format!("AI Generated: {}", short);
    match app.client.generate_ai_image(prompt, Some(&title)).await {
        Ok(media) => {
            app.transcript.success(format!(
                "Image generated successfully! ID: {}\n• Title: {}\n• URL: {}",
                media.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string()),
                media.title.as_deref().unwrap_or(&title),
                media.url.as_deref().unwrap_or(""),
            ));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Error generating image: {}", describe(&e)));
            Outcome::Failed
        }
    }
}
