use serde_json::{Value, json};

use super::PressClient;
use crate::error::Result;
use crate::http::RequestOptions;
use crate::models::{NewPost, Post, PostQuery, PostStatus};

impl PressClient {
    /// `GET /posts`
    pub async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let mut options = RequestOptions::get();
        if let Some(limit) = query.limit {
            options = options.query("limit", limit);
        }
        if let Some(status) = query.status {
            options = options.query("status", status.as_str());
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            options = options.query("search", search);
        }
        let posts: Option<Vec<Post>> = self.http.call("/posts", options).await?;
        Ok(posts.unwrap_or_default())
    }

    /// `POST /posts`, returning the created post
    pub async fn create_post(&self, post: &NewPost) -> Result<Post> {
        self.http.post("/posts", post).await
    }

    /// `PUT /posts/{id}` with a field map
    pub async fn update_post(&self, id: u64, fields: Value) -> Result<Value> {
        self.http
            .put(&format!("/posts/{}", id), &json!({ "fields": fields }))
            .await
    }

    pub async fn publish_post(&self, id: u64) -> Result<Value> {
        self.update_post(id, json!({ "post_status": PostStatus::Publish.as_str() }))
            .await
    }

    /// `DELETE /posts/{id}?force=`
    pub async fn delete_post(&self, id: u64, force: bool) -> Result<()> {
        let options = RequestOptions::delete().query("force", force);
        let _: Value = self.http.call(&format!("/posts/{}", id), options).await?;
        Ok(())
    }
}
