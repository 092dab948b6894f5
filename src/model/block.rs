use super::blocks::*;
use crate::types::RichText;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableRow($pattern) => $result,
        }
    };
}

/// The Notion block types this tool can produce.
///
/// Exactly one content payload exists per block and it always matches the
/// variant, so the wire `type` tag and the populated key cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(TextBlockContent),
    Heading1(TextBlockContent),
    Heading2(TextBlockContent),
    Heading3(TextBlockContent),
    BulletedListItem(ListItemContent),
    NumberedListItem(ListItemContent),
    Quote(TextBlockContent),
    Code(CodeContent),
    Divider(DividerContent),
    Image(ImageContent),
    Table(TableContent),
    TableRow(TableRowContent),
}

impl Block {
    pub fn paragraph(rich_text: Vec<RichText>) -> Self {
        Block::Paragraph(TextBlockContent { rich_text })
    }

    /// Heading for a Markdown level; levels past 3 collapse into `heading_3`.
    pub fn heading(level: u8, rich_text: Vec<RichText>) -> Self {
        let content = TextBlockContent { rich_text };
        match level {
            0 | 1 => Block::Heading1(content),
            2 => Block::Heading2(content),
            _ => Block::Heading3(content),
        }
    }

    pub fn list_item(ordered: bool, rich_text: Vec<RichText>, children: Vec<Block>) -> Self {
        let content = ListItemContent {
            rich_text,
            children,
        };
        if ordered {
            Block::NumberedListItem(content)
        } else {
            Block::BulletedListItem(content)
        }
    }

    pub fn quote(rich_text: Vec<RichText>) -> Self {
        Block::Quote(TextBlockContent { rich_text })
    }

    pub fn code(source: impl Into<String>, language: impl Into<String>) -> Self {
        Block::Code(CodeContent {
            caption: Vec::new(),
            rich_text: vec![RichText::plain(source)],
            language: language.into(),
        })
    }

    pub fn divider() -> Self {
        Block::Divider(DividerContent {})
    }

    pub fn external_image(url: impl Into<String>, caption: Vec<RichText>) -> Self {
        Block::Image(ImageContent {
            image: FileObject::External {
                external: ExternalFile { url: url.into() },
            },
            caption,
        })
    }

    pub fn table(table_width: usize, has_column_header: bool, rows: Vec<Block>) -> Self {
        Block::Table(TableContent {
            table_width,
            has_column_header,
            has_row_header: false,
            children: rows,
        })
    }

    pub fn table_row(cells: Vec<Vec<RichText>>) -> Self {
        Block::TableRow(TableRowContent { cells })
    }

    /// Get block type name as the Notion API spells it
    pub fn block_type(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::Quote(_) => "quote",
            Block::Code(_) => "code",
            Block::Divider(_) => "divider",
            Block::Image(_) => "image",
            Block::Table(_) => "table",
            Block::TableRow(_) => "table_row",
        }
    }

    /// Nested blocks carried by list items and tables.
    pub fn children(&self) -> &[Block] {
        match self {
            Block::BulletedListItem(item) | Block::NumberedListItem(item) => item.children.as_slice(),
            Block::Table(table) => table.children.as_slice(),
            _ => &[],
        }
    }

    /// The block's main text, for the types that have one.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            Block::Paragraph(c)
            | Block::Heading1(c)
            | Block::Heading2(c)
            | Block::Heading3(c)
            | Block::Quote(c) => Some(c.rich_text.as_slice()),
            Block::BulletedListItem(c) | Block::NumberedListItem(c) => Some(c.rich_text.as_slice()),
            Block::Code(c) => Some(c.rich_text.as_slice()),
            Block::Divider(_) | Block::Image(_) | Block::Table(_) | Block::TableRow(_) => None,
        }
    }

    /// Concatenated text of [`Block::rich_text`], empty for text-less blocks.
    pub fn plain_text(&self) -> String {
        self.rich_text()
            .map(crate::types::plain_text)
            .unwrap_or_default()
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let kind = self.block_type();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", kind)?;
        match_all_blocks!(self, content => map.serialize_entry(kind, content)?);
        map.end()
    }
}
