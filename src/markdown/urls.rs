//! Image URL validation and resolution against a base URL.

use regex::Regex;
use std::fmt;
use url::Url;

/// Why an image reference did not become an image block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSkip {
    /// Empty, `attachment:`, `data:`, a non-http(s) absolute URL, or a
    /// scheme-prefixed reference that does not parse
    Unsupported(String),
    /// Relative reference and no base URL configured
    RelativeWithoutBase(String),
    /// Joining with the base produced something Notion cannot fetch
    InvalidAfterJoin(String),
}

impl fmt::Display for ImageSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(url) => write!(f, "unsupported image URL {:?}", url),
            Self::RelativeWithoutBase(url) => {
                write!(f, "relative image URL {:?} needs --image-base-url", url)
            }
            Self::InvalidAfterJoin(url) => {
                write!(f, "image URL {:?} is not http(s) after joining with base", url)
            }
        }
    }
}

/// True when `url` parses with a scheme of its own.
pub fn is_absolute(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Whether an image reference may be sent to Notion.
///
/// Relative references pass here; they are checked again once joined.
/// Anything that starts with a scheme must parse on its own.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() || has_scheme_prefix(url, "attachment:") || has_scheme_prefix(url, "data:") {
        return false;
    }
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => !starts_with_scheme(url),
    }
}

fn starts_with_scheme(url: &str) -> bool {
    lazy_static::lazy_static! {
        static ref SCHEME_REGEX: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:")
            .expect("Failed to compile URL scheme regex - this is a bug in the code");
    }
    SCHEME_REGEX.is_match(url)
}

fn has_scheme_prefix(url: &str, prefix: &str) -> bool {
    url.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Joins `relative` onto the path of `base`.
///
/// A base with or without a trailing slash gives the same result. When the
/// base does not parse, `relative` is returned unchanged.
pub fn join_url(base: &str, relative: &str) -> String {
    let mut url = match Url::parse(base) {
        Ok(url) => url,
        Err(_) => return relative.to_string(),
    };
    let joined = join_paths(url.path(), relative);
    url.set_path(&joined);
    url.to_string()
}

/// Resolves an image destination to the absolute URL Notion should fetch.
pub fn resolve_image_url(source: &str, base: Option<&str>) -> Result<String, ImageSkip> {
    if !is_valid_image_url(source) {
        return Err(ImageSkip::Unsupported(source.to_string()));
    }
    if is_absolute(source) {
        return Ok(source.to_string());
    }

    let base = match base.map(str::trim).filter(|b| !b.is_empty()) {
        Some(base) => base,
        None => return Err(ImageSkip::RelativeWithoutBase(source.to_string())),
    };

    let joined = join_url(base, source);
    if is_absolute(&joined) && is_valid_image_url(&joined) {
        Ok(joined)
    } else {
        Err(ImageSkip::InvalidAfterJoin(joined))
    }
}

/// Slash-joins two paths and normalizes the result lexically.
fn join_paths(base: &str, relative: &str) -> String {
    let joined = [base, relative]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        return String::new();
    }
    clean_path(&joined)
}

/// Lexical path cleanup: drops empty and `.` segments and folds `..`.
fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if !rooted => segments.push(".."),
                _ => {}
            },
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}
