// src/markdown/blocks.rs
//! Block-level conversion from the Markdown tree to Notion blocks.
//!
//! Each top-level node yields zero, one or several blocks. Policy skips
//! (empty paragraphs, HTML, unusable images) are not errors; they are only
//! reported through the diagnostic log.

use super::ast::Node;
use super::code::{fenced_language, split_code_content};
use super::inline::{format_all, format_inline};
use super::urls::resolve_image_url;
use super::ConversionContext;
use crate::constants::{CODE_BLOCK_MAX_CHARS, PLAIN_TEXT_LANGUAGE};
use crate::model::Block;
use crate::types::RichText;
use log::Level;

/// Converts document nodes into blocks under one [`ConversionContext`].
pub struct BlockConverter<'a> {
    context: &'a ConversionContext,
}

impl<'a> BlockConverter<'a> {
    pub fn new(context: &'a ConversionContext) -> Self {
        Self { context }
    }

    /// Converts a sequence of sibling nodes, keeping their order.
    pub fn convert_nodes(&self, nodes: &[Node]) -> Vec<Block> {
        nodes.iter().flat_map(|node| self.convert_node(node)).collect()
    }

    /// Converts a single top-level node.
    pub fn convert_node(&self, node: &Node) -> Vec<Block> {
        match node {
            Node::Heading { level, children } => {
                vec![Block::heading(*level, format_inline(children))]
            }
            Node::Paragraph(children) => self.convert_paragraph(children),
            Node::List { ordered, items } => self.convert_list(*ordered, items),
            Node::Blockquote(children) => vec![Block::quote(join_lines(children))],
            Node::CodeBlock { lines } => self.code_blocks(&lines.concat(), PLAIN_TEXT_LANGUAGE),
            Node::FencedCodeBlock { info, lines } => {
                self.code_blocks(&lines.concat(), &fenced_language(info))
            }
            Node::ThematicBreak => vec![Block::divider()],
            Node::Image {
                destination,
                children,
            } => self.convert_image(destination, children).into_iter().collect(),
            Node::Table(rows) => vec![convert_table(rows)],
            Node::HtmlBlock(_) => {
                self.diagnostic(format_args!("Skipping HTML block"));
                Vec::new()
            }
            Node::ListItem(_)
            | Node::TableHeader(_)
            | Node::TableRow(_)
            | Node::TableCell(_)
            | Node::Text(_)
            | Node::CodeSpan(_)
            | Node::Emphasis { .. }
            | Node::Strikethrough(_)
            | Node::Link { .. }
            | Node::AutoLink(_)
            | Node::InlineHtml(_)
            | Node::SoftBreak
            | Node::HardBreak
            | Node::Container(_) => Vec::new(),
        }
    }

    fn convert_paragraph(&self, children: &[Node]) -> Vec<Block> {
        if let [Node::Image {
            destination,
            children,
        }] = children
        {
            return self.convert_image(destination, children).into_iter().collect();
        }

        let rich_text = format_inline(children);
        if rich_text.is_empty() {
            return Vec::new();
        }
        vec![Block::paragraph(rich_text)]
    }

    fn convert_list(&self, ordered: bool, items: &[Node]) -> Vec<Block> {
        items
            .iter()
            .filter_map(|item| match item {
                Node::ListItem(children) => Some(self.convert_list_item(ordered, children)),
                _ => None,
            })
            .collect()
    }

    /// One list item; nested lists become its children with their own ordering.
    fn convert_list_item(&self, ordered: bool, children: &[Node]) -> Block {
        let rich_text = join_lines(
            children
                .iter()
                .filter(|child| !matches!(child, Node::List { .. })),
        );

        let nested = children
            .iter()
            .filter_map(|child| match child {
                Node::List { ordered, items } => Some(self.convert_list(*ordered, items)),
                _ => None,
            })
            .flatten()
            .collect();

        Block::list_item(ordered, rich_text, nested)
    }

    fn code_blocks(&self, content: &str, language: &str) -> Vec<Block> {
        let chunks = split_code_content(content, CODE_BLOCK_MAX_CHARS);
        if chunks.len() > 1 {
            self.diagnostic(format_args!(
                "Splitting code block of {} characters into {} blocks",
                content.chars().count(),
                chunks.len()
            ));
        }
        if chunks.is_empty() {
            // Empty fences still produce a block
            return vec![Block::code("", language)];
        }
        chunks
            .into_iter()
            .map(|chunk| Block::code(chunk, language))
            .collect()
    }

    fn convert_image(&self, destination: &str, alt: &[Node]) -> Option<Block> {
        let base = self.context.image_base_url.as_deref();
        match resolve_image_url(destination, base) {
            Ok(url) => Some(Block::external_image(url, image_caption(alt))),
            Err(reason) => {
                self.diagnostic(format_args!("Skipping image: {}", reason));
                None
            }
        }
    }

    fn diagnostic(&self, message: std::fmt::Arguments<'_>) {
        let level = if self.context.verbose {
            Level::Info
        } else {
            Level::Debug
        };
        log::log!(level, "{}", message);
    }
}

/// Caption from the first plain text child of the image's alt content.
fn image_caption(alt: &[Node]) -> Vec<RichText> {
    alt.iter()
        .find_map(|node| match node {
            Node::Text(text) => Some(vec![RichText::plain(text.as_str())]),
            _ => None,
        })
        .unwrap_or_default()
}

/// Flattens a quote or list item into one rich-text run.
///
/// Every block-level child starts a new line; adjacent inline children
/// (a tight list item's text) stay on the same line.
fn join_lines<'a>(children: impl IntoIterator<Item = &'a Node>) -> Vec<RichText> {
    let mut lines: Vec<Vec<&Node>> = Vec::new();
    let mut in_inline_run = false;
    for child in children {
        let inline = !starts_new_line(child);
        if !(inline && in_inline_run) {
            lines.push(Vec::new());
        }
        in_inline_run = inline;
        if let Some(line) = lines.last_mut() {
            line.push(child);
        }
    }

    let mut spans: Vec<RichText> = Vec::new();
    for line in lines {
        let formatted = format_all(line);
        if formatted.is_empty() {
            continue;
        }
        if !spans.is_empty() {
            spans.push(RichText::plain("\n"));
        }
        spans.extend(formatted);
    }
    spans
}

fn starts_new_line(node: &Node) -> bool {
    matches!(
        node,
        Node::Paragraph(_)
            | Node::Heading { .. }
            | Node::List { .. }
            | Node::ListItem(_)
            | Node::Blockquote(_)
            | Node::CodeBlock { .. }
            | Node::FencedCodeBlock { .. }
            | Node::ThematicBreak
            | Node::HtmlBlock(_)
            | Node::Table(_)
            | Node::TableHeader(_)
            | Node::TableRow(_)
            | Node::TableCell(_)
    )
}

fn convert_table(rows: &[Node]) -> Block {
    let header_width = rows.iter().find_map(|row| match row {
        Node::TableHeader(cells) => Some(cells.len()),
        _ => None,
    });
    let has_column_header = header_width.is_some();
    let width = header_width
        .or_else(|| {
            rows.iter().find_map(|row| match row {
                Node::TableRow(cells) => Some(cells.len()),
                _ => None,
            })
        })
        .unwrap_or(0);

    let row_blocks = rows
        .iter()
        .filter_map(|row| match row {
            Node::TableHeader(cells) | Node::TableRow(cells) => {
                Some(Block::table_row(table_cells(cells, width)))
            }
            _ => None,
        })
        .collect();

    Block::table(width, has_column_header, row_blocks)
}

/// Cell contents of one row, padded or truncated to the table width.
fn table_cells(cells: &[Node], width: usize) -> Vec<Vec<RichText>> {
    let mut formatted: Vec<Vec<RichText>> = cells
        .iter()
        .filter(|cell| matches!(cell, Node::TableCell(_)))
        .map(|cell| {
            let spans = format_inline(cell.children());
            if spans.is_empty() {
                vec![RichText::plain("")]
            } else {
                spans
            }
        })
        .collect();
    formatted.resize(width, vec![RichText::plain("")]);
    formatted
}
