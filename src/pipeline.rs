// src/pipeline.rs
//! Pipeline capability traits: read Markdown, compose blocks, deliver them.
//!
//! Each trait describes a single capability, enabling testing each stage in isolation.

use crate::error::AppError;
use crate::model::Block;
use crate::sync::SyncReport;

/// Supplies raw Markdown bytes.
pub trait MarkdownInput {
    fn read(&self) -> Result<Vec<u8>, AppError>;
}

/// Transforms Markdown bytes into Notion blocks.
pub trait BlockComposer {
    fn compose(&self, markdown: &[u8]) -> Result<Vec<Block>, AppError>;
}

/// Delivers blocks to their destination.
#[async_trait::async_trait]
pub trait BlockDelivery {
    async fn deliver(&self, blocks: Vec<Block>) -> Result<SyncReport, AppError>;
}
