//! Rich text spans: the atomic styled-text unit of every Notion block.

use serde::{Serialize, Serializer};
use url::Url;

/// A single inline style that can be layered onto a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Italic,
    Strikethrough,
    Underline,
    Code,
}

/// Text styling flags as Notion names them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Annotations {
    /// Returns a copy with `style` switched on; existing flags are kept.
    pub fn with(mut self, style: Style) -> Self {
        match style {
            Style::Bold => self.bold = true,
            Style::Italic => self.italic = true,
            Style::Strikethrough => self.strikethrough = true,
            Style::Underline => self.underline = true,
            Style::Code => self.code = true,
        }
        self
    }

    /// True when no flag and no color is set.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// One contiguous run of text sharing the same style and link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    pub content: String,
    pub annotations: Annotations,
    pub href: Option<String>,
}

impl RichText {
    /// Create an unstyled span.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            annotations: Annotations::default(),
            href: None,
        }
    }

    /// Returns the span with `style` unioned into its annotations.
    pub fn styled(self, style: Style) -> Self {
        Self {
            annotations: self.annotations.with(style),
            ..self
        }
    }

    /// Returns the span pointing at `url`, replacing any earlier target.
    pub fn linked(self, url: impl Into<String>) -> Self {
        Self {
            href: Some(url.into()),
            ..self
        }
    }
}

/// Concatenates the text of a span sequence, ignoring styles.
pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|span| span.content.as_str()).collect()
}

/// Notion only accepts absolute web or mail URLs in `text.link`.
fn link_target(href: &str) -> Option<&str> {
    let parsed = Url::parse(href).ok()?;
    matches!(parsed.scheme(), "http" | "https" | "mailto").then_some(href)
}

#[derive(Serialize)]
struct WireLink<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct WireText<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<WireLink<'a>>,
}

#[derive(Serialize)]
struct WireRichText<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: WireText<'a>,
    annotations: &'a Annotations,
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<&'a str>,
}

impl Serialize for RichText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let href = self.href.as_deref();
        WireRichText {
            kind: "text",
            text: WireText {
                content: &self.content,
                link: href.and_then(link_target).map(|url| WireLink { url }),
            },
            annotations: &self.annotations,
            href,
        }
        .serialize(serializer)
    }
}
