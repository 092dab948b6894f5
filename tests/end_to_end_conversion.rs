// tests/end_to_end_conversion.rs
//! Markdown in, Notion blocks out: whole-document conversion behaviour.

use md2notion::{convert, Block, ConversionContext, RichText, Style};
use pretty_assertions::assert_eq;

fn convert_str(markdown: &str) -> Vec<Block> {
    convert(markdown.as_bytes(), &ConversionContext::default()).expect("conversion should succeed")
}

fn convert_with_base(markdown: &str, base: &str) -> Vec<Block> {
    let context = ConversionContext::new(Some(base.to_string()), false);
    convert(markdown.as_bytes(), &context).expect("conversion should succeed")
}

fn code_source(block: &Block) -> String {
    match block {
        Block::Code(code) => code.source(),
        other => panic!("expected code block, got {}", other.block_type()),
    }
}

#[test]
fn headings_keep_their_levels() {
    let blocks = convert_str("# Heading 1\n\n## Heading 2");

    assert_eq!(
        blocks,
        vec![
            Block::heading(1, vec![RichText::plain("Heading 1")]),
            Block::heading(2, vec![RichText::plain("Heading 2")]),
        ]
    );
}

#[test]
fn deep_headings_clamp_to_heading_3() {
    let blocks = convert_str("### Three\n\n#### Four\n\n##### Five\n\n###### Six");
    let types: Vec<_> = blocks.iter().map(Block::block_type).collect();
    assert_eq!(types, vec!["heading_3"; 4]);
}

#[test]
fn bold_text_splits_into_three_spans() {
    let blocks = convert_str("This is **bold** text.");

    assert_eq!(
        blocks,
        vec![Block::paragraph(vec![
            RichText::plain("This is "),
            RichText::plain("bold").styled(Style::Bold),
            RichText::plain(" text."),
        ])]
    );
}

#[test]
fn fenced_js_becomes_javascript_code() {
    let blocks = convert_str("```js\nconst x = 1;\n```");

    assert_eq!(blocks, vec![Block::code("const x = 1;\n", "javascript")]);
}

#[test]
fn relative_image_resolves_against_base() {
    let blocks = convert_with_base("![Alt](images/pic.png)", "https://example.com/");

    assert_eq!(
        blocks,
        vec![Block::external_image(
            "https://example.com/images/pic.png",
            vec![RichText::plain("Alt")],
        )]
    );
}

#[test]
fn thematic_break_sits_between_paragraphs() {
    let blocks = convert_str("Before\n\n---\n\nAfter");

    assert_eq!(
        blocks,
        vec![
            Block::paragraph(vec![RichText::plain("Before")]),
            Block::divider(),
            Block::paragraph(vec![RichText::plain("After")]),
        ]
    );
}

#[test]
fn long_code_without_newlines_splits_at_limit() {
    let body = "x".repeat(2100);
    let blocks = convert_str(&format!("```\n{}\n```", body));

    assert_eq!(blocks.len(), 2);
    let first = code_source(&blocks[0]);
    let second = code_source(&blocks[1]);
    assert_eq!(first.chars().count(), 2000);
    // The fence keeps the final newline after the body.
    assert_eq!(format!("{}{}", first, second), format!("{}\n", body));
}

#[test]
fn long_code_split_is_lossless() {
    let line = "let value = compute(input);\n";
    let content: String = line.repeat(150);
    assert!(content.len() > 2000);

    let blocks = convert_str(&format!("```rust\n{}```", content));

    assert!(blocks.len() > 1);
    let rebuilt: String = blocks.iter().map(code_source).collect();
    assert_eq!(rebuilt, content);
    for block in &blocks {
        let source = code_source(block);
        assert!(source.chars().count() <= 2000);
        // Short lines always leave a newline near the limit to cut at.
        assert!(source.ends_with('\n'));
    }
}

#[test]
fn code_at_limit_stays_one_block() {
    let content = format!("{}\n", "y".repeat(1999));
    let blocks = convert_str(&format!("```\n{}```", content));

    assert_eq!(blocks.len(), 1);
    assert_eq!(code_source(&blocks[0]), content);
}

#[test]
fn absolute_images_ignore_the_base() {
    let markdown = "![Logo](https://cdn.example.org/logo.png)";

    let without = convert_str(markdown);
    let with = convert_with_base(markdown, "https://example.com/docs/");

    let expected = vec![Block::external_image(
        "https://cdn.example.org/logo.png",
        vec![RichText::plain("Logo")],
    )];
    assert_eq!(without, expected);
    assert_eq!(with, expected);
}

#[test]
fn relative_images_without_base_are_dropped() {
    let blocks = convert_str("Intro\n\n![Diagram](diagram.svg)\n\nOutro");

    assert_eq!(
        blocks,
        vec![
            Block::paragraph(vec![RichText::plain("Intro")]),
            Block::paragraph(vec![RichText::plain("Outro")]),
        ]
    );
}

#[test]
fn unsupported_image_schemes_are_dropped() {
    let context = ConversionContext::new(Some("https://example.com/".to_string()), true);
    let blocks = convert(b"![a](attachment:123)\n\n![b](data:image/png;base64,AAAA)", &context)
        .expect("conversion should succeed");
    assert!(blocks.is_empty());
}

#[test]
fn paragraph_of_only_inline_html_is_dropped() {
    let blocks = convert_str("<b></b>\n\nKept");

    assert_eq!(blocks, vec![Block::paragraph(vec![RichText::plain("Kept")])]);
}

#[test]
fn html_blocks_are_skipped() {
    let blocks = convert_str("<!-- hidden -->\n\nVisible");

    assert_eq!(blocks, vec![Block::paragraph(vec![RichText::plain("Visible")])]);
}

#[test]
fn nested_lists_become_children() {
    let blocks = convert_str("- one\n  1. inner\n- two");

    assert_eq!(
        blocks,
        vec![
            Block::list_item(
                false,
                vec![RichText::plain("one")],
                vec![Block::list_item(true, vec![RichText::plain("inner")], vec![])],
            ),
            Block::list_item(false, vec![RichText::plain("two")], vec![]),
        ]
    );
}

#[test]
fn links_and_inline_code_keep_styles() {
    let blocks = convert_str("See [the *docs*](https://example.com) and `cargo`.");

    assert_eq!(
        blocks,
        vec![Block::paragraph(vec![
            RichText::plain("See "),
            RichText::plain("the ").linked("https://example.com"),
            RichText::plain("docs")
                .styled(Style::Italic)
                .linked("https://example.com"),
            RichText::plain(" and "),
            RichText::plain("cargo").styled(Style::Code),
            RichText::plain("."),
        ])]
    );
}

#[test]
fn tables_become_table_with_rows() {
    let blocks = convert_str("| a | b |\n|---|---|\n| 1 | 2 |\n| 3 |");

    assert_eq!(blocks.len(), 1);
    match &blocks[0] {
        Block::Table(table) => {
            assert_eq!(table.table_width, 2);
            assert!(table.has_column_header);
            assert_eq!(table.children.len(), 3);
            match &table.children[2] {
                Block::TableRow(row) => {
                    assert_eq!(row.cells.len(), 2);
                    assert_eq!(row.cells[0], vec![RichText::plain("3")]);
                }
                other => panic!("expected table row, got {}", other.block_type()),
            }
        }
        other => panic!("expected table, got {}", other.block_type()),
    }
}

#[test]
fn empty_input_yields_no_blocks() {
    assert!(convert_str("").is_empty());
    assert!(convert_str("\n\n   \n").is_empty());
}

#[test]
fn invalid_utf8_is_rejected() {
    let result = convert(&[b'#', b' ', 0xff, 0xfe], &ConversionContext::default());
    assert!(result.is_err());
}

#[test]
fn malformed_absolute_images_are_not_joined_onto_the_base() {
    let blocks = convert_with_base(
        "![a](https://)\n\n![b](<http://exa mple.com/a.png>)",
        "https://example.com/docs/",
    );
    assert!(blocks.is_empty());
}
