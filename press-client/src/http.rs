//! JSON request helper shared by every endpoint.
//!
//! One request, JSON headers attached, JSON body parsed, one uniform error for
//! any non-success status. There is no retry; the only guard against a hung
//! backend is the optional per-request timeout.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::error::{PressError, Result};

/// Method, extra headers, query and body for one call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn put() -> Self {
        Self {
            method: Method::PUT,
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    /// Attach a JSON body
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| PressError::Decode(format!("request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add a header, replacing the JSON defaults if the name collides
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter (encoded on send)
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// HTTP client bound to one backend root
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Option<Duration>,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `/posts`
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Perform a request and decode the JSON body
    ///
    /// An empty success body decodes as JSON `null`, so `()`, `Option<_>` and
    /// `Value` targets all accept it.
    pub async fn call<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T> {
        let method = options.method.clone();
        let headers = build_headers(&options.headers, "application/json")?;

        let mut request = self
            .client
            .request(method.clone(), self.url(endpoint))
            .headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        log::debug!("{} {}", method, endpoint);

        let response = request.send().await.map_err(|e| {
            log::warn!("API call failed: {} {}: {}", method, endpoint, e);
            PressError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            log::warn!("API call failed: {} {}: {}", method, endpoint, message);
            return Err(PressError::Api {
                message,
                status_code: Some(status.as_u16()),
            });
        }

        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| PressError::Decode(format!("{} {}: {}", method, endpoint, e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.call(endpoint, RequestOptions::get()).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, endpoint: &str, body: &B) -> Result<T> {
        self.call(endpoint, RequestOptions::post().json(body)?).await
    }

    /// POST without a body, as used by the cache administration endpoints
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.call(endpoint, RequestOptions::post()).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, endpoint: &str, body: &B) -> Result<T> {
        self.call(endpoint, RequestOptions::put().json(body)?).await
    }

    /// Open a server-sent event stream
    ///
    /// No timeout is applied; the stream lives until the server closes it or
    /// the caller drops the response.
    pub async fn open_stream(&self, endpoint: &str) -> Result<Response> {
        let headers = build_headers(&[], "text/event-stream")?;
        let response = self
            .client
            .get(self.url(endpoint))
            .headers(headers)
            .send()
            .await
            .map_err(|e| PressError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PressError::Api {
                message: error_message(status, &text),
                status_code: Some(status.as_u16()),
            });
        }

        Ok(response)
    }
}

fn build_headers(extra: &[(String, String)], accept: &'static str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static(accept));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| PressError::ConfigError(format!("invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| PressError::ConfigError(format!("invalid value for header {}", name)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Message for a failed response: the body's `error`, then `message`, then the status text
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| status_text(status))
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
