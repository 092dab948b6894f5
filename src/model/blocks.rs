use super::Block;
use crate::types::RichText;
use serde::Serialize;

/// Content shared by paragraphs, headings and quotes.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichText>,
}

/// Bulleted or numbered list item with optional nested items.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ListItemContent {
    pub rich_text: Vec<RichText>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

/// Code block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeContent {
    pub caption: Vec<RichText>,
    pub rich_text: Vec<RichText>,
    pub language: String,
}

impl CodeContent {
    /// The literal source text carried by this block.
    pub fn source(&self) -> String {
        crate::types::plain_text(&self.rich_text)
    }
}

/// Divider block; serializes as an empty object.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DividerContent {}

/// Image block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageContent {
    #[serde(flatten)]
    pub image: FileObject,
    pub caption: Vec<RichText>,
}

impl ImageContent {
    pub fn url(&self) -> &str {
        match &self.image {
            FileObject::External { external } => &external.url,
        }
    }
}

/// File object types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FileObject {
    #[serde(rename = "external")]
    External { external: ExternalFile },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalFile {
    pub url: String,
}

/// Table block; rows travel inside the table as `table_row` children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableContent {
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
    pub children: Vec<Block>,
}

/// Table row block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRowContent {
    pub cells: Vec<Vec<RichText>>,
}
