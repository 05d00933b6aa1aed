//! Markdown to plain-text conversion for speech input.
//!
//! Summaries come back from the model with light markdown (bold, italic,
//! `###` headers, `>` takeaways, `•`/`-` bullets). Speech engines read those
//! markers aloud, so the narration path gets a flattened copy:
//!
//! - headers become `Title: ` and run into the following line
//! - blockquotes lose their `>` and run into the following line
//! - bullet items become `item. ` and run into the following line
//! - bold and italic markers are dropped, keeping the inner text
//! - runs of blank lines collapse to a single newline
//!
//! The conversion is deterministic and line-oriented, so a header followed by
//! a bullet list (or the other way round) flattens the same way regardless
//! of order.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_QUOTE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:>[ \t]?)+").unwrap());
static RE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}[ \t]*(.*?)[ \t#]*$").unwrap());
// `•` never starts prose, so it needs no trailing space. `-5` and `*word*` do.
static RE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:•[ \t]*|[\-*+][ \t]+)(.*)$").unwrap());
static RE_BOLD_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static RE_BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").unwrap());
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static RE_ITALIC_UNDERSCORES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b_([^_\n]+?)_\b").unwrap());
static RE_BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());

enum LineKind {
    Header,
    Quote,
    Bullet,
    Plain,
}

/// Flattens model markdown into text suitable for a speech engine.
pub fn to_plain_text(markdown: &str) -> String {
    let normalised = markdown.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalised.len());

    for line in normalised.lines() {
        let (kind, content) = classify(line);
        let content = strip_inline(&content);
        match kind {
            LineKind::Header => {
                let content = content.trim();
                if !content.is_empty() {
                    out.push_str(content);
                    out.push_str(if ends_with_punctuation(content) { " " } else { ": " });
                }
            }
            LineKind::Bullet => {
                let content = content.trim();
                if !content.is_empty() {
                    out.push_str(content);
                    out.push_str(if ends_with_punctuation(content) { " " } else { ". " });
                }
            }
            LineKind::Quote => {
                let content = content.trim();
                if !content.is_empty() {
                    out.push_str(content);
                    out.push(' ');
                }
            }
            LineKind::Plain if content.trim().is_empty() => {
                let kept = out.trim_end_matches(' ').len();
                out.truncate(kept);
                out.push('\n');
            }
            LineKind::Plain => {
                out.push_str(content.trim_end());
                out.push('\n');
            }
        }
    }

    RE_BLANK_RUNS.replace_all(&out, "\n").trim().to_string()
}

/// Peels block-level markers off one line.
fn classify(line: &str) -> (LineKind, String) {
    let trimmed = line.trim_start();
    let (quoted, rest) = match RE_QUOTE_PREFIX.find(trimmed) {
        Some(m) => (true, trimmed[m.end()..].trim_start()),
        None => (false, trimmed),
    };

    if let Some(caps) = RE_HEADER.captures(rest) {
        let title = caps.get(1).map_or("", |m| m.as_str());
        return (LineKind::Header, title.to_string());
    }
    if let Some(caps) = RE_BULLET.captures(rest) {
        return (LineKind::Bullet, caps[1].to_string());
    }
    if quoted {
        return (LineKind::Quote, rest.to_string());
    }
    (LineKind::Plain, rest.to_string())
}

fn strip_inline(text: &str) -> String {
    let s = RE_BOLD_STARS.replace_all(text, "$1");
    let s = RE_BOLD_UNDERSCORES.replace_all(&s, "$1");
    let s = RE_ITALIC.replace_all(&s, "$1");
    let s = RE_ITALIC_UNDERSCORES.replace_all(&s, "$1");
    // Unbalanced markers would otherwise be spoken.
    s.replace('*', "")
}

fn ends_with_punctuation(text: &str) -> bool {
    text.ends_with(['.', '!', '?', ':', ';'])
}
