//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you how the converter
//! shapes content and how the sync layer talks to Notion.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion block limits
// ---------------------------------------------------------------------------

/// Maximum characters Notion accepts in a single code block's text.
pub const CODE_BLOCK_MAX_CHARS: usize = 2000;

/// How far back from the limit a newline may sit and still be used as the
/// cut point when splitting an oversized code block.
pub const CODE_SPLIT_NEWLINE_WINDOW: usize = 200;

/// Language tag for indented code blocks and fences without an info string.
pub const PLAIN_TEXT_LANGUAGE: &str = "plain text";

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Base URL of the public Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent in the `Notion-Version` header unless overridden.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Number of blocks sent per append request.
///
/// Notion accepts up to 100 children per request, but large nested payloads
/// are rejected well before that. 25 keeps every request comfortably small.
pub const APPEND_BATCH_SIZE: usize = 25;

/// Pause between consecutive append batches.
pub const APPEND_BATCH_PAUSE: Duration = Duration::from_millis(100);

/// Default per-request HTTP timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

// ---------------------------------------------------------------------------
// Retry behaviour
// ---------------------------------------------------------------------------

/// Retries after the first attempt for transient failures.
pub const MAX_RETRIES: u32 = 3;

/// First backoff delay; doubles after every failed attempt.
pub const BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Upper bound for the doubling backoff.
pub const MAX_BACKOFF: Duration = Duration::from_secs(16);

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 300;
