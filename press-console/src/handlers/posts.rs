//! Post list, search and mutations

use press_client::models::{NewPost, Post, PostQuery, PostStatus};

use super::{describe, Outcome};
use crate::app::App;
use crate::transcript::Role;

/// Width excerpts are wrapped to when converted from HTML
const EXCERPT_WIDTH: usize = 80;

/// Reload the default post list
pub async fn load_posts(app: &App) -> Outcome {
    let query = PostQuery {
        limit: Some(app.config.post_list_limit),
        ..Default::default()
    };
    match app.client.list_posts(&query).await {
        Ok(posts) => {
            display_posts(app, &posts);
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript.error(format!("Error loading posts: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// List posts with one status
pub async fn load_by_status(app: &App, status: PostStatus) -> Outcome {
    let query = PostQuery {
        limit: Some(app.config.post_list_limit),
        status: Some(status),
        ..Default::default()
    };
    let label = match status {
        PostStatus::Draft => "draft",
        PostStatus::Publish => "published",
        PostStatus::Pending => "pending",
        PostStatus::Private => "private",
    };

    match app.client.list_posts(&query).await {
        Ok(posts) => {
            display_posts(app, &posts);
            app.transcript.info(format!("Found {} {} posts", posts.len(), label));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript
                .error(format!("Error loading {} posts: {}", label, describe(&e)));
            Outcome::Failed
        }
    }
}

/// Search posts; an empty query reloads the default list
pub async fn search_posts(app: &App, query: &str) -> Outcome {
    let query = query.trim();
    if query.is_empty() {
        return load_posts(app).await;
    }

    let search = PostQuery {
        limit: Some(app.config.search_limit),
        search: Some(query.to_string()),
        ..Default::default()
    };
    match app.client.list_posts(&search).await {
        Ok(posts) => {
            display_posts(app, &posts);
            app.transcript
                .info(format!("Found {} posts matching \"{}\"", posts.len(), query));
            Outcome::Unchanged
        }
        Err(e) => {
            app.transcript.error(format!("Search error: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub fn display_posts(app: &App, posts: &[Post]) {
    if posts.is_empty() {
        app.transcript.info("No posts found. Create your first post!");
        return;
    }
    for post in posts {
        app.transcript.push(Role::Info, format_post(post));
    }
}

fn format_post(post: &Post) -> String {
    let excerpt = if post.post_excerpt.trim().is_empty() {
        "(no excerpt)".to_string()
    } else {
        html2text::from_read(post.post_excerpt.as_bytes(), EXCERPT_WIDTH)
            .trim_end()
            .to_string()
    };

    let mut card = format!(
        "[{}] {} ({})\n    {}",
        post.id, post.post_title, post.post_status, excerpt
    );
    if let Some(link) = &post.permalink {
        card.push_str(&format!("\n    🔗 {}", link));
    }
    if post.is_draft() {
        card.push_str(&format!("\n    📤 publish with: /publish {}", post.id));
    }
    card
}

/// Create a post; title and content are required
pub async fn create_post(
    app: &App,
    title: &str,
    content: &str,
    excerpt: Option<&str>,
    status: PostStatus,
) -> Outcome {
    let (title, content) = (title.trim(), content.trim());
    if title.is_empty() || content.is_empty() {
        app.transcript.error("Please fill in title and content");
        return Outcome::Failed;
    }

    app.transcript.info("Creating post...");
    let post = NewPost {
        title: title.to_string(),
        content: content.to_string(),
        excerpt: excerpt.map(str::trim).filter(|e| !e.is_empty()).map(String::from),
        status,
    };
    match app.client.create_post(&post).await {
        Ok(created) => {
            app.transcript
                .success(format!("Post created successfully! ID: {}", created.id));
            Outcome::Changed
        }
        Err(e) => {
            app.transcript.error(format!("Error creating post: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

pub async fn publish_post(app: &App, id: u64) -> Outcome {
    if !app.confirm("Publish this post?") {
        return Outcome::Unchanged;
    }

    app.transcript.info("Publishing post...");
    match app.client.publish_post(id).await {
        Ok(_) => {
            app.transcript.success("Post published successfully!");
            Outcome::Changed
        }
        Err(e) => {
            app.transcript.error(format!("Error publishing post: {}", describe(&e)));
            Outcome::Failed
        }
    }
}

/// Permanently delete a post after confirmation
pub async fn delete_post(app: &App, id: u64) -> Outcome {
    if !app.confirm(&format!("Delete post {}? This cannot be undone.", id)) {
        return Outcome::Unchanged;
    }

    app.transcript.info("Deleting post...");
    match app.client.delete_post(id, true).await {
        Ok(()) => {
            app.transcript.success("Post deleted successfully");
            Outcome::Changed
        }
        Err(e) => {
            app.transcript.error(format!("Error deleting post: {}", describe(&e)));
            Outcome::Failed
        }
    }
}
