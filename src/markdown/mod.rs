//! Markdown to Notion block conversion.
//!
//! Parsing folds pulldown-cmark events into an owned tree ([`ast`]), then
//! [`BlockConverter`] maps that tree onto Notion blocks using the inline
//! formatter and the image URL resolver. The whole pass is synchronous and
//! keeps no state between calls.

pub mod ast;
mod blocks;
pub mod code;
pub mod inline;
pub mod urls;

pub use blocks::BlockConverter;

use crate::error::ConversionError;
use crate::model::Block;

/// Settings for one conversion call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionContext {
    /// Base for relative image paths; relative images are dropped without it.
    pub image_base_url: Option<String>,
    /// Promote skip/split diagnostics from `debug` to `info`.
    pub verbose: bool,
}

impl ConversionContext {
    pub fn new(image_base_url: Option<String>, verbose: bool) -> Self {
        Self {
            image_base_url,
            verbose,
        }
    }
}

/// Converts Markdown bytes into an ordered block sequence.
///
/// Either every top-level node converts or nothing is returned.
pub fn convert(markdown: &[u8], context: &ConversionContext) -> Result<Vec<Block>, ConversionError> {
    let nodes = ast::parse_document(markdown)?;
    let blocks = BlockConverter::new(context).convert_nodes(&nodes);
    log::debug!(
        "Converted {} top-level nodes into {} blocks",
        nodes.len(),
        blocks.len()
    );
    Ok(blocks)
}
