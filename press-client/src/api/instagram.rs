use serde_json::json;

use super::{PressClient, accepted};
use crate::error::{PressError, Result};
use crate::models::{
    ApifyStatus, ImportResponse, InstagramPost, Profile, ProfileResponse, ScrapeResponse,
};

impl PressClient {
    pub async fn apify_status(&self) -> Result<ApifyStatus> {
        self.http.get("/instagram/apify/status").await
    }

    /// Start a user scrape; the response may carry a progress session id
    pub async fn scrape_user(&self, username: &str, limit: u32) -> Result<ScrapeResponse> {
        let response = self
            .http
            .post(
                "/instagram/apify/scrape-user",
                &json!({ "username": username.trim_start_matches('@'), "limit": limit }),
            )
            .await?;
        accepted(response, "Unknown error")
    }

    /// Start a scrape-and-import job for a user
    pub async fn bulk_import(&self, username: &str, limit: u32) -> Result<ScrapeResponse> {
        let response = self
            .http
            .post(
                "/instagram/apify/bulk-import",
                &json!({ "username": username.trim_start_matches('@'), "limit": limit }),
            )
            .await?;
        accepted(response, "No progress tracking available")
    }

    pub async fn scrape_urls(&self, urls: &[String]) -> Result<ScrapeResponse> {
        let response = self
            .http
            .post("/instagram/apify/scrape-urls", &json!({ "urls": urls }))
            .await?;
        accepted(response, "Unknown error")
    }

    /// Import scraped posts as WordPress drafts
    pub async fn import_scraped_posts(&self, posts: &[InstagramPost]) -> Result<ImportResponse> {
        let response = self
            .http
            .post("/instagram/apify/import-to-wordpress", &json!({ "posts": posts }))
            .await?;
        accepted(response, "WordPress import failed")
    }

    /// Extract post data from post URLs without Apify
    pub async fn extract_urls(&self, urls: &[String]) -> Result<ScrapeResponse> {
        let response = self
            .http
            .post("/instagram/import-urls", &json!({ "urls": urls }))
            .await?;
        accepted(response, "Could not extract posts from URLs")
    }

    /// Import posts produced by [`PressClient::extract_urls`]
    pub async fn import_extracted_posts(&self, posts: &[InstagramPost]) -> Result<ImportResponse> {
        let response = self
            .http
            .post("/instagram/import-to-wordpress", &json!({ "posts": posts }))
            .await?;
        accepted(response, "WordPress import failed")
    }

    pub async fn profile(&self, username: &str) -> Result<Profile> {
        let username = username.trim_start_matches('@');
        let response: ProfileResponse = self
            .http
            .get(&format!("/instagram/apify/profile/{}", username))
            .await?;
        accepted(response, "Profile not found")?
            .profile
            .ok_or_else(|| PressError::rejected(format!("Profile not found for @{}", username)))
    }
}
