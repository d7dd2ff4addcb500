//! Inline span parser: `` `code` ``, `**bold**`, `*italic*`, `_italic_`.
//!
//! Spans never nest. The scanner walks the cleaned line left to right and
//! tries, at every position, code > bold > single-star italic > underscore
//! italic. An opening marker without a matching closer is literal text.

use crate::model::{Inline, Marks};
use once_cell::sync::Lazy;
use regex::Regex;

static WIKI_LINK_ALIAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]|]+)\|([^\]]+)\]\]").unwrap());

static WIKI_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

static ESCAPED_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([\\`*_{}\[\]()#+\-.!|>])").unwrap());

static CHECKBOX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[( |x|X)\]\s+").unwrap());

static HORIZONTAL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Clean a line before span scanning.
///
/// Cross-references keep their visible alias, links keep their label,
/// backslash escapes are removed, a leading checkbox is dropped and runs of
/// spaces/tabs collapse to one space.
pub fn clean_inline_text(line: &str) -> String {
    let out = WIKI_LINK_ALIAS.replace_all(line, "$2");
    let out = WIKI_LINK.replace_all(&out, "$1");
    let out = MARKDOWN_LINK.replace_all(&out, "$1");
    let out = ESCAPED_PUNCTUATION.replace_all(&out, "$1");
    let out = CHECKBOX.replace(&out, "");
    HORIZONTAL_WHITESPACE.replace_all(&out, " ").into_owned()
}

/// Parse one line of text into inline runs.
///
/// Adjacent runs with identical marks are merged and empty runs dropped, so
/// no two consecutive runs in the result share a mark set.
pub fn parse_inlines(line: &str) -> Vec<Inline> {
    let s = clean_inline_text(line);
    let mut runs = Vec::new();
    let mut i = 0;

    while i < s.len() {
        let rest = &s[i..];

        if let Some((inner, consumed, marks)) = match_span(rest) {
            push_run(&mut runs, inner, marks);
            i += consumed;
            continue;
        }

        match rest.find(is_marker) {
            // Unmatched marker at the cursor: emit it literally. Markers are
            // ASCII, so a one-byte slice is a whole character.
            Some(0) => {
                push_run(&mut runs, &rest[..1], Marks::default());
                i += 1;
            }
            Some(next) => {
                push_run(&mut runs, &rest[..next], Marks::default());
                i += next;
            }
            None => {
                push_run(&mut runs, rest, Marks::default());
                break;
            }
        }
    }

    runs
}

fn is_marker(c: char) -> bool {
    matches!(c, '`' | '*' | '_')
}

/// Try to match a closed span at the start of `rest`.
///
/// Returns the inner text, the number of bytes consumed and the marks.
fn match_span(rest: &str) -> Option<(&str, usize, Marks)> {
    if let Some(body) = rest.strip_prefix('`') {
        if let Some(end) = body.find('`') {
            return Some((&body[..end], end + 2, Marks::code()));
        }
    }

    if let Some(body) = rest.strip_prefix("**") {
        if let Some(end) = body.find("**") {
            return Some((&body[..end], end + 4, Marks::bold()));
        }
    }

    if !rest.starts_with("**") {
        if let Some(body) = rest.strip_prefix('*') {
            if let Some(end) = body.find('*') {
                return Some((&body[..end], end + 2, Marks::italic()));
            }
        }
    }

    if let Some(body) = rest.strip_prefix('_') {
        if let Some(end) = body.find('_') {
            return Some((&body[..end], end + 2, Marks::italic()));
        }
    }

    None
}

fn push_run(runs: &mut Vec<Inline>, text: &str, marks: Marks) {
    if text.is_empty() {
        return;
    }

    if let Some(Inline::Text(last)) = runs.last_mut() {
        if last.marks == marks {
            last.text.push_str(text);
            return;
        }
    }

    runs.push(Inline::text(text, marks));
}
