//! Wire types for the backend API.
//!
//! Response types default every optional field so that partial payloads from
//! older backend versions still decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `GET /health`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub wordpress_connected: bool,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A WordPress post as returned by the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub post_status: String,
    #[serde(default)]
    pub post_excerpt: String,
    #[serde(default)]
    pub permalink: Option<String>,
}

impl Post {
    pub fn is_draft(&self) -> bool {
        self.post_status == "draft"
    }
}

/// Post status filter for listing and creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Publish,
    Pending,
    Private,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
            Self::Pending => "pending",
            Self::Private => "private",
        }
    }
}

/// Query for `GET /posts`
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub limit: Option<u32>,
    pub status: Option<PostStatus>,
    pub search: Option<String>,
}

/// Body for `POST /posts`
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PostStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plugin {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Version", default)]
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Result of a media upload or AI image generation
#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// `POST /chat` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub actions: Vec<ChatAction>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub commands: Vec<CommandCategory>,
}

impl ChatResponse {
    pub fn is_error(&self) -> bool {
        self.kind.as_deref() == Some("error")
    }
}

/// An action attached to a chat response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChatAction {
    /// Text to send back as the next chat message
    Text(String),
    Structured(StructuredAction),
}

impl ChatAction {
    pub fn label(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Structured(action) => action.label.as_deref().unwrap_or(&action.kind),
        }
    }
}

/// A structured chat action, dispatched on `kind`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructuredAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandCategory {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub commands: Vec<String>,
}

/// A scraped Instagram post
///
/// Unknown fields are kept in `extra` and absent fields stay absent, so that
/// posts can be sent back to the import endpoints unchanged. Counts are signed
/// because hidden counts arrive as `-1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstagramPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /instagram/apify/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApifyStatus {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub usage_info: Option<UsageInfo>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageInfo {
    #[serde(default)]
    pub plan: Option<String>,
}

/// Response of the scrape and bulk-import endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub progress_session_id: Option<String>,
    #[serde(default)]
    pub posts_count: Option<usize>,
    #[serde(default)]
    pub urls_count: Option<usize>,
    #[serde(default)]
    pub posts: Vec<InstagramPost>,
    #[serde(default)]
    pub drafts_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of the WordPress import endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub imported_count: usize,
    #[serde(default)]
    pub total_posts: Option<usize>,
    #[serde(default)]
    pub drafts_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
    #[serde(default)]
    pub posts_count: Option<u64>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_private: bool,
}

/// `POST /instagram/cache-image`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheImageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cached_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Generic `{success, message?, removed_count?}` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub removed_count: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Apify response cache statistics
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApifyCacheStats {
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_size_bytes: u64,
    #[serde(default)]
    pub oldest_entry: Option<String>,
    #[serde(default)]
    pub newest_entry: Option<String>,
    #[serde(default)]
    pub by_operation: BTreeMap<String, OperationStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationStats {
    #[serde(default)]
    pub files: u64,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub expired: u64,
}

/// Server-side image cache statistics
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageCacheStats {
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_size_mb: f64,
    #[serde(default)]
    pub cache_dir: Option<String>,
}

/// `{success, cache_stats}` envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub cache_stats: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}
