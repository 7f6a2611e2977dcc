use serde_json::json;

use super::PressClient;
use crate::error::Result;
use crate::http::RequestOptions;
use crate::models::{ChatResponse, Health, Media, Plugin, User};

impl PressClient {
    /// `GET /health`
    pub async fn health(&self) -> Result<Health> {
        self.http.get("/health").await
    }

    pub async fn list_plugins(&self) -> Result<Vec<Plugin>> {
        self.http.get("/plugins").await
    }

    pub async fn list_users(&self, limit: u32) -> Result<Vec<User>> {
        self.http
            .call("/users", RequestOptions::get().query("limit", limit))
            .await
    }

    /// `POST /media/upload` from a remote URL
    pub async fn upload_media(&self, url: &str, title: Option<&str>, alt: Option<&str>) -> Result<Media> {
        self.http
            .post("/media/upload", &json!({ "url": url, "title": title, "alt": alt }))
            .await
    }

    /// `POST /ai/image`
    pub async fn generate_ai_image(&self, prompt: &str, title: Option<&str>) -> Result<Media> {
        self.http
            .post("/ai/image", &json!({ "prompt": prompt, "title": title }))
            .await
    }

    /// `POST /chat`
    pub async fn chat(&self, message: &str) -> Result<ChatResponse> {
        self.http.post("/chat", &json!({ "message": message })).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiClient;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_chat_error_status_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": ""})))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Message is required"})),
            )
            .mount(&server)
            .await;

        let client = PressClient::new(ApiClient::new(&server.uri(), None));
        let err = client.chat("").await.unwrap_err();
        assert_eq!(err.to_string(), "Message is required");
    }

    #[tokio::test]
    async fn test_health_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "wordpress_connected": true,
                "site_name": "Example Signs",
                "timestamp": "2024-05-01 10:00:00"
            })))
            .mount(&server)
            .await;

        let client = PressClient::new(ApiClient::new(&server.uri(), None));
        let health = client.health().await.unwrap();
        assert!(health.wordpress_connected);
        assert_eq!(health.site_name.as_deref(), Some("Example Signs"));
    }
}
