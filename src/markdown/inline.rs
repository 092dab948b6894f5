//! Inline Markdown to Notion rich text.
//!
//! Formatting is a pure fold over the node tree: every call returns fresh
//! spans and wrapping constructs union their style into what their children
//! produced. Nothing here can fail; unknown leaves simply contribute nothing.

use super::ast::Node;
use crate::types::{RichText, Style};

/// Formats the inline content of `nodes` into an ordered span sequence.
pub fn format_inline(nodes: &[Node]) -> Vec<RichText> {
    format_all(nodes.iter())
}

/// Same as [`format_inline`] for an arbitrary selection of sibling nodes.
pub fn format_all<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<RichText> {
    nodes.into_iter().flat_map(format_node).collect()
}

fn format_node(node: &Node) -> Vec<RichText> {
    match node {
        Node::Text(text) => vec![RichText::plain(text.as_str())],
        Node::CodeSpan(code) => vec![RichText::plain(code.as_str()).styled(Style::Code)],
        Node::SoftBreak => vec![RichText::plain(" ")],
        Node::HardBreak => vec![RichText::plain("\n")],

        Node::Emphasis { level, children } => {
            let style = if *level >= 2 {
                Style::Bold
            } else {
                Style::Italic
            };
            with_style(format_inline(children), style)
        }
        Node::Strikethrough(children) => {
            with_style(format_inline(children), Style::Strikethrough)
        }

        Node::Link {
            destination,
            children,
        } => format_inline(children)
            .into_iter()
            .map(|span| span.linked(destination.as_str()))
            .collect(),
        Node::AutoLink(url) => vec![RichText::plain(url.as_str()).linked(url.as_str())],

        // Images only become blocks when they stand alone in a paragraph.
        Node::Image { .. } => Vec::new(),

        Node::InlineHtml(_)
        | Node::HtmlBlock(_)
        | Node::ThematicBreak
        | Node::CodeBlock { .. }
        | Node::FencedCodeBlock { .. } => Vec::new(),

        Node::Heading { .. }
        | Node::Paragraph(_)
        | Node::List { .. }
        | Node::ListItem(_)
        | Node::Blockquote(_)
        | Node::Table(_)
        | Node::TableHeader(_)
        | Node::TableRow(_)
        | Node::TableCell(_)
        | Node::Container(_) => format_inline(node.children()),
    }
}

fn with_style(spans: Vec<RichText>, style: Style) -> Vec<RichText> {
    spans.into_iter().map(|span| span.styled(style)).collect()
}
