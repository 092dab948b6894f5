// src/api/parser.rs
//! Turns raw API responses into typed values or classified errors.

use super::client::ApiResponse;
use super::responses::NotionErrorBody;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use reqwest::StatusCode;

/// Deserialize a 2xx body.
pub fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview_body(body)))
    })
}

/// Classifies a non-2xx response.
///
/// Notion's JSON error body is preferred; anything else falls back to the
/// HTTP status with a short body preview.
pub fn error_from_response(result: &ApiResponse<String>) -> AppError {
    if let Ok(error) = serde_json::from_str::<NotionErrorBody>(&result.data) {
        return AppError::NotionService {
            code: NotionErrorCode::from_api_response(&error.code),
            message: error.message,
            status: result.status,
        };
    }

    AppError::NotionService {
        code: NotionErrorCode::from_http_status(result.status.as_u16()),
        message: status_fallback_message(result.status, &result.url, &result.data),
        status: result.status,
    }
}

fn status_fallback_message(status: StatusCode, url: &str, body: &str) -> String {
    let preview = preview_body(body);
    if preview.is_empty() {
        format!("HTTP {} from {}", status, url)
    } else {
        format!("HTTP {} from {}: {}", status, url, preview)
    }
}

/// First `ERROR_BODY_PREVIEW_LENGTH` characters of a body, trimmed.
pub fn preview_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(ERROR_BODY_PREVIEW_LENGTH) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
