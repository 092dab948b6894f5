//! Code block helpers: language normalization and size-bounded splitting.

use crate::constants::{CODE_SPLIT_NEWLINE_WINDOW, PLAIN_TEXT_LANGUAGE};

/// Maps a fence language tag onto Notion's language vocabulary.
///
/// Input is trimmed and lower-cased first. Unknown tags pass through.
pub fn normalize_language(tag: &str) -> String {
    let tag = tag.trim().to_lowercase();
    let normalized = match tag.as_str() {
        "" => PLAIN_TEXT_LANGUAGE,
        "js" | "javascript" => "javascript",
        "ts" | "typescript" => "typescript",
        "py" | "python" => "python",
        "go" | "golang" => "go",
        "sh" | "bash" | "shell" => "bash",
        "yml" | "yaml" => "yaml",
        "md" | "markdown" => "markdown",
        "json" => "json",
        "xml" => "xml",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        _ => return tag,
    };
    normalized.to_string()
}

/// Language for a fenced block, taken from the first token of its info string.
pub fn fenced_language(info: &str) -> String {
    normalize_language(info.split_whitespace().next().unwrap_or(""))
}

/// Splits `content` into chunks of at most `max_chars` characters.
///
/// A full-size chunk with content still remaining is cut just after its last
/// newline, provided that newline lies within the final
/// `CODE_SPLIT_NEWLINE_WINDOW` characters. Concatenating the chunks always
/// yields `content` again.
pub fn split_code_content(content: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 {
        return vec![content];
    }

    let mut chunks = Vec::new();
    let mut rest = content;

    while !rest.is_empty() {
        // Byte offset of the char just past the candidate, if any remains.
        let boundary = match rest.char_indices().nth(max_chars) {
            Some((offset, _)) => offset,
            None => {
                chunks.push(rest);
                break;
            }
        };

        let candidate = &rest[..boundary];
        let cut = last_newline_cut(candidate, max_chars).unwrap_or(boundary);
        let (chunk, remaining) = rest.split_at(cut);
        chunks.push(chunk);
        rest = remaining;
    }

    chunks
}

/// Byte offset just past the candidate's last newline, when that newline sits
/// late enough in the chunk to be worth cutting at.
fn last_newline_cut(candidate: &str, max_chars: usize) -> Option<usize> {
    let threshold = max_chars.saturating_sub(CODE_SPLIT_NEWLINE_WINDOW);
    let byte_index = candidate.rfind('\n')?;
    let char_index = candidate[..byte_index].chars().count();
    (char_index > threshold).then_some(byte_index + 1)
}
