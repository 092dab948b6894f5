//! Owned Markdown syntax tree.
//!
//! pulldown-cmark hands out a flat stream of start/end events. The converter
//! wants a tree it can match on, so the stream is folded into [`Node`]s here:
//! every node owns its children, nothing points back up, and the tree is
//! never mutated after it is built.

use crate::error::ConversionError;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};

/// One node of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    // --- Block nodes ---
    Heading { level: u8, children: Vec<Node> },
    Paragraph(Vec<Node>),
    List { ordered: bool, items: Vec<Node> },
    ListItem(Vec<Node>),
    Blockquote(Vec<Node>),
    /// Indented code block; `lines` keep their trailing newlines.
    CodeBlock { lines: Vec<String> },
    FencedCodeBlock { info: String, lines: Vec<String> },
    ThematicBreak,
    HtmlBlock(String),
    Table(Vec<Node>),
    TableHeader(Vec<Node>),
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),

    // --- Inline nodes ---
    Text(String),
    CodeSpan(String),
    /// Level 1 is `*em*`, level 2 is `**strong**`.
    Emphasis { level: u8, children: Vec<Node> },
    Strikethrough(Vec<Node>),
    Link { destination: String, children: Vec<Node> },
    AutoLink(String),
    Image { destination: String, children: Vec<Node> },
    InlineHtml(String),
    SoftBreak,
    HardBreak,

    /// Any construct without a dedicated variant; only its children matter.
    Container(Vec<Node>),
}

impl Node {
    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading { children, .. }
            | Node::Emphasis { children, .. }
            | Node::Link { children, .. }
            | Node::Image { children, .. } => children,
            Node::List { items, .. } => items,
            Node::Paragraph(children)
            | Node::ListItem(children)
            | Node::Blockquote(children)
            | Node::Table(children)
            | Node::TableHeader(children)
            | Node::TableRow(children)
            | Node::TableCell(children)
            | Node::Strikethrough(children)
            | Node::Container(children) => children,
            Node::CodeBlock { .. }
            | Node::FencedCodeBlock { .. }
            | Node::ThematicBreak
            | Node::HtmlBlock(_)
            | Node::Text(_)
            | Node::CodeSpan(_)
            | Node::AutoLink(_)
            | Node::InlineHtml(_)
            | Node::SoftBreak
            | Node::HardBreak => &[],
        }
    }
}

/// Parser options: CommonMark plus GFM tables and strikethrough.
fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

/// Parses Markdown bytes into the top-level nodes of the document.
pub fn parse_document(source: &[u8]) -> Result<Vec<Node>, ConversionError> {
    let text = std::str::from_utf8(source).map_err(|e| ConversionError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;

    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(text, markdown_options()) {
        builder.push(event)?;
    }
    builder.finish()
}

/// A tag that has been opened but not yet closed.
enum OpenTag {
    Heading(u8),
    Paragraph,
    List { ordered: bool },
    Item,
    BlockQuote,
    FencedCode { info: String },
    IndentedCode,
    HtmlBlock,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { destination: String },
    AutoLink { url: String },
    Image { destination: String },
    Other,
}

impl OpenTag {
    fn from_tag(tag: Tag<'_>) -> Self {
        match tag {
            Tag::Paragraph => OpenTag::Paragraph,
            Tag::Heading { level, .. } => OpenTag::Heading(heading_level(level)),
            Tag::BlockQuote(_) => OpenTag::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => OpenTag::FencedCode {
                info: info.into_string(),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => OpenTag::IndentedCode,
            Tag::HtmlBlock => OpenTag::HtmlBlock,
            Tag::List(start) => OpenTag::List {
                ordered: start.is_some(),
            },
            Tag::Item => OpenTag::Item,
            Tag::Table(_) => OpenTag::Table,
            Tag::TableHead => OpenTag::TableHead,
            Tag::TableRow => OpenTag::TableRow,
            Tag::TableCell => OpenTag::TableCell,
            Tag::Emphasis => OpenTag::Emphasis,
            Tag::Strong => OpenTag::Strong,
            Tag::Strikethrough => OpenTag::Strikethrough,
            Tag::Link {
                link_type: LinkType::Autolink,
                dest_url,
                ..
            } => OpenTag::AutoLink {
                url: dest_url.into_string(),
            },
            Tag::Link {
                link_type: LinkType::Email,
                dest_url,
                ..
            } => OpenTag::AutoLink {
                url: mailto(&dest_url),
            },
            Tag::Link { dest_url, .. } => OpenTag::Link {
                destination: dest_url.into_string(),
            },
            Tag::Image { dest_url, .. } => OpenTag::Image {
                destination: dest_url.into_string(),
            },
            _ => OpenTag::Other,
        }
    }

    /// Name used in error messages.
    fn name(&self) -> &'static str {
        match self {
            OpenTag::Heading(_) => "heading",
            OpenTag::Paragraph => "paragraph",
            OpenTag::List { .. } => "list",
            OpenTag::Item => "list item",
            OpenTag::BlockQuote => "blockquote",
            OpenTag::FencedCode { .. } => "fenced code block",
            OpenTag::IndentedCode => "code block",
            OpenTag::HtmlBlock => "html block",
            OpenTag::Table => "table",
            OpenTag::TableHead => "table header",
            OpenTag::TableRow => "table row",
            OpenTag::TableCell => "table cell",
            OpenTag::Emphasis => "emphasis",
            OpenTag::Strong => "strong emphasis",
            OpenTag::Strikethrough => "strikethrough",
            OpenTag::Link { .. } => "link",
            OpenTag::AutoLink { .. } => "autolink",
            OpenTag::Image { .. } => "image",
            OpenTag::Other => "container",
        }
    }

    fn close(self, children: Vec<Node>) -> Node {
        match self {
            OpenTag::Heading(level) => Node::Heading { level, children },
            OpenTag::Paragraph => Node::Paragraph(children),
            OpenTag::List { ordered } => Node::List {
                ordered,
                items: children,
            },
            OpenTag::Item => Node::ListItem(children),
            OpenTag::BlockQuote => Node::Blockquote(children),
            OpenTag::FencedCode { info } => Node::FencedCodeBlock {
                info,
                lines: literal_lines(children),
            },
            OpenTag::IndentedCode => Node::CodeBlock {
                lines: literal_lines(children),
            },
            OpenTag::HtmlBlock => Node::HtmlBlock(literal_lines(children).concat()),
            OpenTag::Table => Node::Table(children),
            OpenTag::TableHead => Node::TableHeader(children),
            OpenTag::TableRow => Node::TableRow(children),
            OpenTag::TableCell => Node::TableCell(children),
            OpenTag::Emphasis => Node::Emphasis { level: 1, children },
            OpenTag::Strong => Node::Emphasis { level: 2, children },
            OpenTag::Strikethrough => Node::Strikethrough(children),
            OpenTag::Link { destination } => Node::Link {
                destination,
                children,
            },
            OpenTag::AutoLink { url } => Node::AutoLink(url),
            OpenTag::Image { destination } => Node::Image {
                destination,
                children,
            },
            OpenTag::Other => Node::Container(children),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn mailto(address: &str) -> String {
    if address.starts_with("mailto:") {
        address.to_string()
    } else {
        format!("mailto:{}", address)
    }
}

/// Raw text collected inside code and HTML blocks.
fn literal_lines(children: Vec<Node>) -> Vec<String> {
    children
        .into_iter()
        .filter_map(|node| match node {
            Node::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

struct Frame {
    tag: OpenTag,
    children: Vec<Node>,
}

/// Folds parser events into nodes using a stack of open frames.
#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Frame>,
}

impl TreeBuilder {
    fn push(&mut self, event: Event<'_>) -> Result<(), ConversionError> {
        match event {
            Event::Start(tag) => self.open.push(Frame {
                tag: OpenTag::from_tag(tag),
                children: Vec::new(),
            }),
            Event::End(_) => {
                let frame = self
                    .open
                    .pop()
                    .ok_or(ConversionError::UnbalancedTree { node: "document" })?;
                let node = frame.tag.close(frame.children);
                self.append(node);
            }
            Event::Text(text) => self.append(Node::Text(text.into_string())),
            Event::Code(code) => self.append(Node::CodeSpan(code.into_string())),
            Event::Html(html) => {
                if matches!(self.open.last(), Some(frame) if matches!(frame.tag, OpenTag::HtmlBlock))
                {
                    self.append(Node::Text(html.into_string()));
                } else {
                    self.append(Node::InlineHtml(html.into_string()));
                }
            }
            Event::InlineHtml(html) => self.append(Node::InlineHtml(html.into_string())),
            Event::SoftBreak => self.append(Node::SoftBreak),
            Event::HardBreak => self.append(Node::HardBreak),
            Event::Rule => self.append(Node::ThematicBreak),
            _ => {}
        }
        Ok(())
    }

    fn append(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.root.push(node),
        }
    }

    fn finish(mut self) -> Result<Vec<Node>, ConversionError> {
        match self.open.pop() {
            Some(frame) => Err(ConversionError::UnbalancedTree {
                node: frame.tag.name(),
            }),
            None => Ok(self.root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(markdown: &str) -> Vec<Node> {
        parse_document(markdown.as_bytes()).expect("markdown should parse")
    }

    #[test]
    fn headings_keep_their_level() {
        let nodes = parse("#### Deep");
        assert_eq!(
            nodes,
            vec![Node::Heading {
                level: 4,
                children: vec![Node::Text("Deep".to_string())],
            }]
        );
    }

    #[test]
    fn nested_lists_become_children_of_items() {
        let nodes = parse("- outer\n  1. inner\n");
        let Node::List { ordered, items } = &nodes[0] else {
            panic!("expected list, got {:?}", nodes[0]);
        };
        assert!(!ordered);
        let nested = items[0]
            .children()
            .iter()
            .find(|n| matches!(n, Node::List { .. }))
            .expect("nested list");
        assert!(matches!(nested, Node::List { ordered: true, .. }));
    }

    #[test]
    fn fenced_code_keeps_info_and_lines() {
        let nodes = parse("```rust title=main\nfn main() {}\n```\n");
        let Node::FencedCodeBlock { info, lines } = &nodes[0] else {
            panic!("expected fenced code block");
        };
        assert_eq!(info, "rust title=main");
        assert_eq!(lines.concat(), "fn main() {}\n");
    }

    #[test]
    fn indented_code_is_a_plain_code_block() {
        let nodes = parse("    a\n    b\n");
        let Node::CodeBlock { lines } = &nodes[0] else {
            panic!("expected code block");
        };
        assert_eq!(lines.concat(), "a\nb\n");
    }

    #[test]
    fn autolinks_are_distinguished_from_links() {
        let nodes = parse("<https://example.com> and <team@example.com>");
        let children = nodes[0].children();
        assert_eq!(children[0], Node::AutoLink("https://example.com".to_string()));
        assert!(children
            .iter()
            .any(|n| *n == Node::AutoLink("mailto:team@example.com".to_string())));
    }

    #[test]
    fn tables_have_header_and_rows() {
        let nodes = parse("| a | b |\n|---|---|\n| 1 | 2 |\n");
        let Node::Table(rows) = &nodes[0] else {
            panic!("expected table");
        };
        assert!(matches!(rows[0], Node::TableHeader(_)));
        assert!(matches!(rows[1], Node::TableRow(_)));
        assert_eq!(rows[0].children().len(), 2);
    }

    #[test]
    fn html_blocks_are_captured_whole() {
        let nodes = parse("<div>\nhi\n</div>\n");
        assert!(matches!(&nodes[0], Node::HtmlBlock(html) if html.contains("<div>")));
    }

    #[test]
    fn invalid_utf8_is_a_parse_failure() {
        let err = parse_document(&[b'#', b' ', 0xff, 0xfe]).unwrap_err();
        assert_eq!(err, ConversionError::InvalidUtf8 { offset: 2 });
    }

    #[test]
    fn stray_end_event_is_reported() {
        let mut builder = TreeBuilder::default();
        let err = builder
            .push(Event::End(pulldown_cmark::TagEnd::Paragraph))
            .unwrap_err();
        assert_eq!(err, ConversionError::UnbalancedTree { node: "document" });
    }

    #[test]
    fn unclosed_tag_is_reported_by_name() {
        let mut builder = TreeBuilder::default();
        builder.push(Event::Start(Tag::BlockQuote(None))).unwrap();
        let err = builder.finish().unwrap_err();
        assert_eq!(err, ConversionError::UnbalancedTree { node: "blockquote" });
    }
}
