//! Notion block model produced by the Markdown converter.

mod block;
pub mod blocks;
mod stats;

pub use block::Block;
pub use blocks::{
    CodeContent, DividerContent, ExternalFile, FileObject, ImageContent, ListItemContent,
    TableContent, TableRowContent, TextBlockContent,
};
pub use stats::{measure_blocks, BlockStats};
