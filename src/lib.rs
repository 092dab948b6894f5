// src/lib.rs
//! md2notion library: converts Markdown documents into Notion blocks and syncs them to a page.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Conversion**: `convert`, `ConversionContext`, `BlockConverter`
//! - **Domain model**: `Block` and its content structs, `RichText`, `Annotations`
//! - **Domain types**: `NotionId`, `NotionToken`, `PageTitle`
//! - **API client**: `NotionHttpClient`, `NotionApi`, `RetryPolicy`, `NotionRepository`
//! - **Sync**: `Synchronizer`, `SyncOperation`, `SyncReport`, `render_dry_run`
//! - **Error handling**: `AppError`, `ConversionError`, `ValidationError`

pub mod api;
pub mod cancellation;
pub mod config;
pub mod constants;
mod error;
pub mod markdown;
pub mod model;
pub mod pipeline;
pub mod sync;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ConversionError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Conversion ---
pub use crate::markdown::{convert, BlockConverter, ConversionContext};

// --- Configuration ---
pub use crate::config::{CommandLineInput, MarkdownSource, SyncConfig};

// --- Domain Model ---
pub use crate::model::{
    measure_blocks, Block, BlockStats, CodeContent, DividerContent, ExternalFile, FileObject,
    ImageContent, ListItemContent, TableContent, TableRowContent, TextBlockContent,
};

// --- Domain Types ---
pub use crate::types::{plain_text, Annotations, NotionId, NotionToken, PageTitle, RichText, Style};

// --- API Client ---
pub use crate::api::{
    ApiRequest, ApiResponse, CreatedPage, ExistingBlock, HttpTransport, NotionApi,
    NotionHttpClient, NotionRepository, RetryPolicy,
};

// --- Sync ---
pub use crate::cancellation::{cancellation, CancellationSignal, CancellationTrigger};
pub use crate::sync::{page_url, render_dry_run, SyncOperation, SyncReport, Synchronizer};

// --- Pipeline Traits ---
pub use crate::pipeline::{BlockComposer, BlockDelivery, MarkdownInput};
