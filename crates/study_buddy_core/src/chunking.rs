//! Paragraph chunking of extracted document text.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Splits text into paragraph chunks on blank-line boundaries.
///
/// Chunks are trimmed and empty ones are dropped; order is preserved.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
    RE_BLANK_LINE
        .split(&normalised)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}
