//! Typed endpoints of the backend API
//!
//! Every method is a thin call through [`ApiClient`]. Endpoints that answer
//! `200` with `{"success": false}` are turned into [`PressError::Api`] here so
//! callers see one failure shape.

mod cache;
mod instagram;
mod posts;
mod site;

use crate::config::Config;
use crate::error::{PressError, Result};
use crate::http::ApiClient;
use crate::models::{
    CacheAck, CacheImageResponse, ImportResponse, ProfileResponse, ScrapeResponse, StatsEnvelope,
};

/// Client for the content-management backend
#[derive(Debug, Clone)]
pub struct PressClient {
    http: ApiClient,
}

impl PressClient {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ApiClient::from_config(config))
    }

    /// Underlying request helper
    pub fn http(&self) -> &ApiClient {
        &self.http
    }
}

/// Bodies carrying a `success` flag and an optional `error`
pub(crate) trait Acknowledged {
    fn succeeded(&self) -> bool;
    fn error_text(&self) -> Option<&str>;
}

macro_rules! acknowledged {
    ($($ty:ty),* $(,)?) => {
        $(impl Acknowledged for $ty {
            fn succeeded(&self) -> bool {
                self.success
            }

            fn error_text(&self) -> Option<&str> {
                self.error.as_deref()
            }
        })*
    };
}

acknowledged!(CacheAck, CacheImageResponse, ImportResponse, ProfileResponse, ScrapeResponse);

impl<T> Acknowledged for StatsEnvelope<T> {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_text(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Reject a `success: false` body, using its `error` or the fallback text
pub(crate) fn accepted<T: Acknowledged>(response: T, fallback: &str) -> Result<T> {
    if response.succeeded() {
        Ok(response)
    } else {
        Err(PressError::rejected(
            response.error_text().filter(|e| !e.is_empty()).unwrap_or(fallback),
        ))
    }
}
