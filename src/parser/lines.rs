//! Line classification for the block parser.
//!
//! Each classifier looks at one (right-trimmed) source line in isolation.

use once_cell::sync::Lazy;
use regex::Regex;

static PAGE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*---\s*$").unwrap());

static WIKI_EMBED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*!\[\[([^\]|]+)(?:\|([^\]]+))?\]\]\s*$").unwrap());

static MARKDOWN_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*!\[([^\]]*)\]\(([^)]+)\)\s*$").unwrap());

static FENCE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```([\w+-]*)\s*$").unwrap());

static FENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*```\s*$").unwrap());

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)\s+(.+)$").unwrap());

static UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)[-*+]\s+(.+)$").unwrap());

static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)\d+\.\s+(.+)$").unwrap());

/// Check if a line is empty or whitespace only.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Check if a line is a horizontal rule, which acts as a page break.
pub fn is_page_break(line: &str) -> bool {
    PAGE_BREAK.is_match(line)
}

/// Parse an image embed occupying the whole line into `(src, alt)`.
pub fn image_embed(line: &str) -> Option<(String, String)> {
    if let Some(caps) = WIKI_EMBED.captures(line) {
        let src = caps[1].trim().to_string();
        let alt = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
        return Some((src, alt.to_string()));
    }

    if let Some(caps) = MARKDOWN_IMAGE.captures(line) {
        return Some((caps[2].trim().to_string(), caps[1].trim().to_string()));
    }

    None
}

/// Parse an opening code fence, returning its language tag.
pub fn fence_start(line: &str) -> Option<String> {
    FENCE_START
        .captures(line)
        .map(|caps| caps[1].trim().to_string())
}

/// Check if a line closes a code fence.
pub fn is_fence_end(line: &str) -> bool {
    FENCE_END.is_match(line)
}

/// Parse a heading line into `(marker count, text)`.
///
/// The marker count is not clamped here.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim();
    HEADING.captures(line).map(|caps| {
        let level = caps.get(1).map_or(0, |m| m.len());
        let text = caps.get(2).map_or("", |m| m.as_str());
        (level, text)
    })
}

/// Parse a bulleted list item, returning its text.
pub fn unordered_item(line: &str) -> Option<&str> {
    UNORDERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Parse a numbered list item, returning its text.
pub fn ordered_item(line: &str) -> Option<&str> {
    ORDERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}
