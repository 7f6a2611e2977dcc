//! Navigable view over a list of scraped Instagram posts

use press_client::models::InstagramPost;

#[derive(Debug, Default)]
pub struct PostViewer {
    posts: Vec<InstagramPost>,
    index: usize,
}

impl PostViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the posts and rewind to the first one
    pub fn load(&mut self, posts: Vec<InstagramPost>) {
        self.posts = posts;
        self.index = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn posts(&self) -> &[InstagramPost] {
        &self.posts
    }

    pub fn current(&self) -> Option<&InstagramPost> {
        self.posts.get(self.index)
    }

    /// 1-based position and total
    pub fn position(&self) -> Option<(usize, usize)> {
        (!self.posts.is_empty()).then(|| (self.index + 1, self.posts.len()))
    }

    /// Move forward; `false` at the last post
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.posts.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move back; `false` at the first post
    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Source image URLs of every post that has one
    pub fn image_urls(&self) -> Vec<String> {
        image_urls(&self.posts)
    }
}

pub fn image_urls(posts: &[InstagramPost]) -> Vec<String> {
    posts.iter().filter_map(|p| p.image_url.clone()).collect()
}

pub const EMPTY_VIEWER: &str =
    "📱 No Instagram Posts Found\nTry scraping a different username or check if the account exists";

/// Text card for one post
pub fn render(post: &InstagramPost, position: (usize, usize), image_url: Option<&str>) -> String {
    let mut lines = Vec::new();

    if let Some(url) = image_url {
        let alt = post.alt_text.as_deref().unwrap_or("Instagram post");
        lines.push(format!("🖼  {} ({})", url, alt));
    }

    let username = post.username.as_deref().unwrap_or("unknown");
    match post.date_posted.as_deref() {
        Some(date) if !date.is_empty() => lines.push(format!("@{}  {}", username, date)),
        _ => lines.push(format!("@{}", username)),
    }

    if let Some(caption) = post.caption.as_deref().filter(|c| !c.is_empty()) {
        lines.push(caption.to_string());
    }

    if !post.hashtags.is_empty() {
        let tags: Vec<String> = post.hashtags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(tags.join(" "));
    }

    lines.push(format!(
        "❤️ {} likes • 💬 {} comments",
        count(post.likes_count),
        count(post.comments_count)
    ));
    lines.push(format!("{} of {}", position.0, position.1));

    lines.join("\n")
}

/// Negative counts mean the owner hid them
fn count(n: Option<i64>) -> String {
    match n {
        Some(n) if n < 0 => "hidden".to_string(),
        Some(n) => n.to_string(),
        None => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(name: &str) -> InstagramPost {
        InstagramPost {
            username: Some(name.to_string()),
            image_url: Some(format!("https://cdn/{}.jpg", name)),
            ..Default::default()
        }
    }

    #[test]
    fn test_navigation_stops_at_edges() {
        let mut viewer = PostViewer::new();
        assert_eq!(viewer.position(), None);
        assert!(!viewer.next());

        viewer.load(vec![post("a"), post("b")]);
        assert_eq!(viewer.position(), Some((1, 2)));
        assert!(!viewer.previous());
        assert!(viewer.next());
        assert!(!viewer.next());
        assert_eq!(viewer.current().unwrap().username.as_deref(), Some("b"));

        viewer.load(vec![post("c")]);
        assert_eq!(viewer.position(), Some((1, 1)));
    }

    #[test]
    fn test_image_urls_skip_posts_without_images() {
        let mut viewer = PostViewer::new();
        viewer.load(vec![post("a"), InstagramPost::default(), post("b")]);
        assert_eq!(viewer.image_urls(), vec!["https://cdn/a.jpg", "https://cdn/b.jpg"]);
    }

    #[test]
    fn test_render_card() {
        let mut p = post("example");
        p.caption = Some("Sunny day".to_string());
        p.hashtags = vec!["sun".to_string(), "beach".to_string()];
        p.likes_count = Some(12);

        let card = render(&p, (2, 5), Some("/static/cache/example.jpg"));
        assert!(card.contains("/static/cache/example.jpg (Instagram post)"));
        assert!(card.contains("@example"));
        assert!(card.contains("#sun #beach"));
        assert!(card.contains("❤️ 12 likes • 💬 0 comments"));
        assert!(card.ends_with("2 of 5"));
    }

    #[test]
    fn test_render_hidden_counts() {
        let mut p = post("example");
        p.likes_count = Some(-1);
        p.comments_count = Some(3);

        let card = render(&p, (1, 1), None);
        assert!(card.contains("❤️ hidden likes • 💬 3 comments"));
    }
}
