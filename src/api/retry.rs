// src/api/retry.rs
//! Retry with exponential backoff for API operations.
//!
//! Transport failures and 5xx responses back off and retry, 429 waits for
//! the server's `Retry-After`, every other 4xx fails straight away. Each
//! request and each wait races the cancellation signal.

use super::client::{ApiRequest, ApiResponse, HttpTransport};
use super::parser::error_from_response;
use crate::cancellation::CancellationSignal;
use crate::constants::{BASE_BACKOFF, MAX_BACKOFF, MAX_RETRIES};
use crate::error::AppError;
use reqwest::StatusCode;
use std::time::Duration;

/// How often and how patiently failed requests are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_backoff: BASE_BACKOFF,
            max_backoff: MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Doubles `current`, capped at `max_backoff`.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        std::cmp::min(current.saturating_mul(2), self.max_backoff)
    }
}

/// What to do with one attempt's outcome.
enum Attempt {
    Done(ApiResponse<String>),
    Retry { error: AppError, wait: Option<Duration> },
    Fatal(AppError),
}

fn classify(outcome: Result<ApiResponse<String>, AppError>) -> Attempt {
    match outcome {
        Ok(response) if response.status.is_success() => Attempt::Done(response),
        Ok(response) if response.status == StatusCode::TOO_MANY_REQUESTS => Attempt::Retry {
            wait: response.retry_after,
            error: error_from_response(&response),
        },
        Ok(response) if response.status.is_server_error() => Attempt::Retry {
            wait: None,
            error: error_from_response(&response),
        },
        Ok(response) => Attempt::Fatal(error_from_response(&response)),
        Err(error) if error.is_transport_failure() => Attempt::Retry { error, wait: None },
        Err(error) => Attempt::Fatal(error),
    }
}

/// Sends `request`, retrying transient failures under `policy`.
///
/// Returns the first 2xx response. Gives up with the classified error on a
/// fatal status, with `RetriesExhausted` once retries run out, and with
/// `Cancelled` as soon as `cancel` fires.
pub async fn send_with_retry<T>(
    transport: &T,
    request: &ApiRequest,
    policy: &RetryPolicy,
    cancel: &CancellationSignal,
) -> Result<ApiResponse<String>, AppError>
where
    T: HttpTransport + ?Sized,
{
    let mut backoff = policy.base_backoff;
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        attempt += 1;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            outcome = transport.execute(request) => outcome,
        };

        let (error, hint) = match classify(outcome) {
            Attempt::Done(response) => return Ok(response),
            Attempt::Fatal(error) => return Err(error),
            Attempt::Retry { error, wait } => (error, wait),
        };

        if attempt > policy.max_retries {
            log::error!(
                "{} {} failed after {} attempts: {}",
                request.method,
                request.endpoint,
                attempt,
                error
            );
            return Err(AppError::RetriesExhausted {
                attempts: attempt,
                last: Box::new(error),
            });
        }

        let delay = hint.unwrap_or(backoff);
        log::warn!(
            "Attempt {} of {} {} failed ({}), retrying after {:?}",
            attempt,
            request.method,
            request.endpoint,
            error,
            delay
        );
        cancel.sleep(delay).await?;
        backoff = policy.next_backoff(backoff);
    }
}
