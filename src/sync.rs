// src/sync.rs
//! Writes converted blocks to Notion: append, replace or create.
//!
//! Blocks travel in fixed-size batches, one request at a time, so the page
//! ends up in document order. Replace archives the existing children first;
//! a block that refuses to be archived is logged and skipped.

use crate::api::NotionRepository;
use crate::cancellation::CancellationSignal;
use crate::constants::{APPEND_BATCH_PAUSE, APPEND_BATCH_SIZE};
use crate::error::AppError;
use crate::model::Block;
use crate::types::{NotionId, PageTitle};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// What to do with the converted blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOperation {
    Append { page: NotionId },
    Replace { page: NotionId },
    Create { parent: NotionId, title: PageTitle },
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append { page } => write!(f, "append to page {}", page),
            Self::Replace { page } => write!(f, "replace content of page {}", page),
            Self::Create { parent, title } => {
                write!(f, "create page '{}' under {}", title, parent)
            }
        }
    }
}

/// Outcome of a completed sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub operation: SyncOperation,
    /// The page that now holds the blocks
    pub page_id: NotionId,
    pub page_url: String,
    pub blocks_written: usize,
    pub batches: usize,
    /// Existing blocks archived by a replace
    pub archived: usize,
    pub failed_archives: usize,
}

impl SyncReport {
    /// The line printed for the user once the sync is done.
    pub fn summary_line(&self) -> String {
        match self.operation {
            SyncOperation::Append { .. } => format!("Updated page: {}", self.page_url),
            SyncOperation::Replace { .. } => {
                format!("Replaced content of page: {}", self.page_url)
            }
            SyncOperation::Create { .. } => format!("Created page: {}", self.page_url),
        }
    }
}

/// Short link to a page by id.
pub fn page_url(id: &NotionId) -> String {
    format!("https://notion.so/{}", id.as_str())
}

#[derive(Serialize)]
struct DryRunBody<'a> {
    children: &'a [Block],
}

/// The JSON body an append would send, pretty-printed.
pub fn render_dry_run(blocks: &[Block]) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(&DryRunBody { children: blocks })?)
}

/// Drives one [`SyncOperation`] against a [`NotionRepository`].
pub struct Synchronizer<'a, R: NotionRepository + ?Sized> {
    repository: &'a R,
    cancel: CancellationSignal,
    batch_pause: Duration,
}

impl<'a, R: NotionRepository + ?Sized> Synchronizer<'a, R> {
    pub fn new(repository: &'a R, cancel: CancellationSignal) -> Self {
        Self {
            repository,
            cancel,
            batch_pause: APPEND_BATCH_PAUSE,
        }
    }

    pub fn with_batch_pause(mut self, pause: Duration) -> Self {
        self.batch_pause = pause;
        self
    }

    pub async fn run(&self, operation: SyncOperation, blocks: &[Block]) -> Result<SyncReport, AppError> {
        log::info!("Starting sync: {} ({} blocks)", operation, blocks.len());
        match &operation {
            SyncOperation::Append { page } => {
                let page = page.clone();
                let batches = self.append_batches(&page, blocks).await?;
                Ok(self.report(operation.clone(), page, None, blocks.len(), batches, (0, 0)))
            }
            SyncOperation::Replace { page } => {
                let page = page.clone();
                let archive_counts = self.archive_existing(&page).await?;
                let batches = self.append_batches(&page, blocks).await?;
                Ok(self.report(operation.clone(), page, None, blocks.len(), batches, archive_counts))
            }
            SyncOperation::Create { parent, title } => {
                let (first, rest) = blocks.split_at(blocks.len().min(APPEND_BATCH_SIZE));
                log::info!("Creating page '{}' under {}", title, parent);
                let created = self.repository.create_page(parent, title, first).await?;
                let page = created.id.clone();
                let batches = 1 + self.append_batches(&page, rest).await?;
                Ok(self.report(operation.clone(), page, created.url, blocks.len(), batches, (0, 0)))
            }
        }
    }

    /// Appends `blocks` in order, one batch per request. Returns the batch count.
    async fn append_batches(&self, page: &NotionId, blocks: &[Block]) -> Result<usize, AppError> {
        let total = blocks.len();
        let mut sent = 0;
        for (index, batch) in blocks.chunks(APPEND_BATCH_SIZE).enumerate() {
            if index > 0 && !self.batch_pause.is_zero() {
                self.cancel.sleep(self.batch_pause).await?;
            }
            self.repository
                .append_children(page, batch)
                .await
                .map_err(|e| batch_error(e, sent, batch.len()))?;
            sent += batch.len();
            log::info!("Uploaded {} blocks ({}/{})", batch.len(), sent, total);
        }
        Ok(blocks.chunks(APPEND_BATCH_SIZE).len())
    }

    /// Archives every current child of `page`. Returns (archived, failed).
    async fn archive_existing(&self, page: &NotionId) -> Result<(usize, usize), AppError> {
        let existing = self.repository.list_children(page).await?;
        let mut archived = 0;
        let mut failed = 0;
        for block in existing.iter().filter(|b| !b.archived) {
            match self.repository.archive_block(&block.id).await {
                Ok(()) => archived += 1,
                Err(AppError::Cancelled) => return Err(AppError::Cancelled),
                Err(e) => {
                    failed += 1;
                    log::warn!("Failed to delete block {}: {}", block.id, e);
                }
            }
        }
        if archived > 0 {
            log::info!("Deleted {} existing blocks", archived);
        }
        Ok((archived, failed))
    }

    fn report(
        &self,
        operation: SyncOperation,
        page_id: NotionId,
        url: Option<String>,
        blocks_written: usize,
        batches: usize,
        (archived, failed_archives): (usize, usize),
    ) -> SyncReport {
        SyncReport {
            operation,
            page_url: url.unwrap_or_else(|| page_url(&page_id)),
            page_id,
            blocks_written,
            batches,
            archived,
            failed_archives,
        }
    }
}

/// Logs which blocks a failed append covered.
fn batch_error(error: AppError, offset: usize, len: usize) -> AppError {
    match error {
        AppError::Cancelled => AppError::Cancelled,
        other => {
            log::error!(
                "Failed to append blocks {}-{}: {}",
                offset + 1,
                offset + len,
                other
            );
            other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RichText;
    use pretty_assertions::assert_eq;

    #[test]
    fn dry_run_wraps_blocks_in_children() {
        let json = render_dry_run(&[Block::paragraph(vec![RichText::plain("hi")])]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["children"][0]["type"], "paragraph");
        assert!(json.contains("\n  \"children\""));
    }

    #[test]
    fn summary_lines_match_operation() {
        let page = NotionId::parse("0123456789abcdef0123456789abcdef").unwrap();
        let report = SyncReport {
            operation: SyncOperation::Replace { page: page.clone() },
            page_url: page_url(&page),
            page_id: page,
            blocks_written: 3,
            batches: 1,
            archived: 2,
            failed_archives: 0,
        };
        assert_eq!(
            report.summary_line(),
            "Replaced content of page: https://notion.so/0123456789abcdef0123456789abcdef"
        );
    }
}
