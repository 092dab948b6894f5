// src/api/client.rs
//! Pure HTTP client wrapper for Notion API.
//!
//! This module provides a thin wrapper around reqwest for making
//! HTTP requests to the Notion API. It handles authentication and
//! basic request/response operations without parsing or business logic.

use crate::constants::NOTION_API_BASE_URL;
use crate::error::AppError;
use crate::types::NotionToken;
use reqwest::{header, Client, Method, Response};
use serde_json::Value;
use std::time::Duration;

/// One request to the Notion API, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API base, e.g. `blocks/<id>/children`
    pub endpoint: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            endpoint: endpoint.into(),
            body: None,
        }
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            endpoint: endpoint.into(),
            body: Some(body),
        }
    }

    pub fn patch(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PATCH,
            endpoint: endpoint.into(),
            body: Some(body),
        }
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
    /// Parsed `Retry-After` header, when the server sent one.
    pub retry_after: Option<Duration>,
}

/// The ability to send one request and read the raw response.
///
/// Only transport failures (connect, TLS, timeout) are errors here; any
/// HTTP status comes back as a response for the caller to classify.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse<String>, AppError>;
}

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(
        token: &NotionToken,
        notion_version: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(token, notion_version)?)
            .user_agent(concat!("md2notion/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: NOTION_API_BASE_URL.to_string(),
        })
    }

    /// Points the client at another API root (used against local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(
        token: &NotionToken,
        notion_version: &str,
    ) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", token.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::InvalidConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_str(notion_version).map_err(|e| {
                AppError::InvalidConfiguration(format!(
                    "Invalid Notion-Version {:?}: {}",
                    notion_version, e
                ))
            })?,
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl HttpTransport for NotionHttpClient {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse<String>, AppError> {
        let url = self.url_for(&request.endpoint);
        log::debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(body) = &request.body {
            if log::log_enabled!(log::Level::Debug) {
                log::debug!("Request body: {}", body);
            }
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        extract_response_text(response).await
    }
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_retry_after);
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
        retry_after,
    })
}

/// Reads a `Retry-After` value given in (possibly fractional) seconds.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some(Duration::from_secs_f64(seconds))
    } else {
        None
    }
}
