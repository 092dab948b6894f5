// src/api/mod.rs
//! Notion API interaction: writing content into a workspace.
//!
//! This module keeps a clear separation between HTTP transport
//! ([`client`]), retry policy ([`retry`]), response parsing ([`parser`])
//! and the operations the sync layer depends on ([`NotionRepository`]).

pub mod client;
mod pagination;
pub mod parser;
mod repository;
mod responses;
pub mod retry;

use crate::error::AppError;
use crate::model::Block;
use crate::types::{NotionId, PageTitle};

/// The ability to change content in a Notion workspace.
///
/// This is the fundamental algebra for API interaction.
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Appends blocks to the end of a page or block, in order.
    async fn append_children(&self, parent: &NotionId, blocks: &[Block]) -> Result<(), AppError>;

    /// Creates a child page under `parent` whose initial content is `blocks`.
    async fn create_page(
        &self,
        parent: &NotionId,
        title: &PageTitle,
        blocks: &[Block],
    ) -> Result<CreatedPage, AppError>;

    /// All direct children of a page or block.
    async fn list_children(&self, parent: &NotionId) -> Result<Vec<ExistingBlock>, AppError>;

    /// Moves a block to the trash.
    async fn archive_block(&self, id: &NotionId) -> Result<(), AppError>;
}

// Re-export the public interface
pub use client::{ApiRequest, ApiResponse, HttpTransport, NotionHttpClient};
pub use repository::NotionApi;
pub use responses::{CreatedPage, ExistingBlock, PaginatedResponse};
pub use retry::{send_with_retry, RetryPolicy};
