//! Markup parsing module.
//!
//! Turns raw note text into a [`DocumentModel`]. Parsing never fails:
//! anything the parser does not recognise becomes paragraph text.

mod inline;
mod lines;
mod table;

pub use inline::{clean_inline_text, parse_inlines};
pub use table::{is_separator, split_row};

use crate::model::{Block, DocumentModel, ListItem};
use unicode_normalization::UnicodeNormalization;

/// Parse raw markup text into a document model.
///
/// # Example
///
/// ```
/// use gostdoc::parser::parse;
/// use gostdoc::model::Block;
///
/// let doc = parse("# Title\n\nSome **bold** text.");
/// assert_eq!(doc.len(), 2);
/// assert!(matches!(doc.blocks[0], Block::Heading { level: 1, .. }));
/// ```
pub fn parse(text: &str) -> DocumentModel {
    let source = normalize_source(text);
    let lines: Vec<&str> = source.split('\n').collect();
    let doc = BlockParser::new(&lines).run();
    log::debug!(
        "parsed {} blocks from {} lines",
        doc.blocks.len(),
        lines.len()
    );
    doc
}

/// Normalize line endings to `\n` and text to Unicode NFC.
pub fn normalize_source(text: &str) -> String {
    text.replace("\r\n", "\n").nfc().collect()
}

/// Line-oriented block parser with one line of lookahead.
struct BlockParser<'a> {
    lines: &'a [&'a str],
    pos: usize,
    doc: DocumentModel,
}

impl<'a> BlockParser<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            pos: 0,
            doc: DocumentModel::new(),
        }
    }

    fn run(mut self) -> DocumentModel {
        while self.pos < self.lines.len() {
            self.parse_block();
        }
        self.doc
    }

    fn current(&self) -> &'a str {
        self.lines[self.pos].trim_end()
    }

    /// Check whether the line at `index` opens a table: it contains a
    /// delimiter and the next line is a separator row.
    fn starts_table(&self, index: usize) -> bool {
        table::has_delimiter(self.lines[index])
            && index + 1 < self.lines.len()
            && table::is_separator(self.lines[index + 1])
    }

    fn parse_block(&mut self) {
        let line = self.current();

        if lines::is_blank(line) {
            self.pos += 1;
            return;
        }

        if lines::is_page_break(line) {
            self.doc.push(Block::PageBreak);
            self.pos += 1;
            return;
        }

        if let Some((src, alt)) = lines::image_embed(line) {
            self.doc.push(Block::Image { src, alt });
            self.pos += 1;
            return;
        }

        if let Some(lang) = lines::fence_start(line) {
            self.parse_code_block(lang);
            return;
        }

        if self.starts_table(self.pos) {
            self.parse_table();
            return;
        }

        if let Some((level, text)) = lines::heading(line) {
            self.doc.push(Block::heading(level, parse_inlines(text)));
            self.pos += 1;
            return;
        }

        if lines::ordered_item(line).is_some() {
            self.parse_list(true);
            return;
        }

        if lines::unordered_item(line).is_some() {
            self.parse_list(false);
            return;
        }

        self.parse_paragraph();
    }

    /// Capture lines verbatim until a closing fence. An unterminated fence
    /// runs to the end of input.
    fn parse_code_block(&mut self, lang: String) {
        self.pos += 1;
        let mut code = Vec::new();

        while self.pos < self.lines.len() && !lines::is_fence_end(self.lines[self.pos]) {
            code.push(self.lines[self.pos].trim_end_matches('\r').to_string());
            self.pos += 1;
        }

        if self.pos < self.lines.len() {
            self.pos += 1;
        } else {
            log::debug!("unterminated code fence closed at end of input");
        }

        self.doc.push(Block::CodeBlock { lang, lines: code });
    }

    fn parse_table(&mut self) {
        let Some(header) = table::split_row(self.current()) else {
            return self.parse_paragraph();
        };
        self.pos += 2;

        let mut rows = vec![header];
        while self.pos < self.lines.len() {
            let line = self.current();
            if lines::is_blank(line) {
                break;
            }
            match table::split_row(line) {
                Some(cells) => rows.push(cells),
                None => break,
            }
            self.pos += 1;
        }

        let rows = rows
            .into_iter()
            .map(|row| row.iter().map(|cell| parse_inlines(cell)).collect())
            .collect();
        self.doc.push(Block::Table { rows });
    }

    /// Collect consecutive items of one kind. Indentation is ignored, so
    /// nested items flatten into the same list.
    fn parse_list(&mut self, ordered: bool) {
        let mut items = Vec::new();

        while self.pos < self.lines.len() {
            let line = self.current();
            if lines::is_blank(line) || lines::is_page_break(line) {
                break;
            }

            let text = if ordered {
                lines::ordered_item(line)
            } else {
                lines::unordered_item(line)
            };
            let Some(text) = text else {
                break;
            };

            items.push(ListItem::new(parse_inlines(text)));
            self.pos += 1;
        }

        self.doc.push(Block::List { ordered, items });
    }

    /// Accumulate lines until a blank line or the start of another block,
    /// joining them with single spaces.
    fn parse_paragraph(&mut self) {
        let mut buf: Vec<&str> = Vec::new();

        while self.pos < self.lines.len() {
            let line = self.current();
            if !buf.is_empty() && self.interrupts_paragraph(line) {
                break;
            }
            if lines::is_blank(line) {
                break;
            }
            buf.push(line.trim());
            self.pos += 1;
        }

        let text = buf.join(" ");
        let text = text.trim();
        if !text.is_empty() {
            self.doc.push(Block::paragraph(parse_inlines(text)));
        }
    }

    fn interrupts_paragraph(&self, line: &str) -> bool {
        lines::is_page_break(line)
            || lines::image_embed(line).is_some()
            || lines::fence_start(line).is_some()
            || lines::heading(line).is_some()
            || lines::unordered_item(line).is_some()
            || lines::ordered_item(line).is_some()
            || self.starts_table(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Inline, Marks};

    #[test]
    fn test_heading_and_paragraph() {
        let doc = parse("# Title\n\nSome **bold** and *italic* text.");
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.blocks[0],
            Block::Heading {
                level: 1,
                inlines: vec![Inline::plain("Title")],
            }
        );
        assert_eq!(
            doc.blocks[1],
            Block::Paragraph {
                inlines: vec![
                    Inline::plain("Some "),
                    Inline::text("bold", Marks::bold()),
                    Inline::plain(" and "),
                    Inline::text("italic", Marks::italic()),
                    Inline::plain(" text."),
                ],
            }
        );
    }

    #[test]
    fn test_heading_level_clamped_to_six() {
        let doc = parse("####### Too deep");
        assert!(matches!(doc.blocks[0], Block::Heading { level: 6, .. }));
    }

    #[test]
    fn test_paragraph_lines_joined() {
        let doc = parse("first line\n  second line  \nthird\n\nnext");
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.blocks[0],
            Block::paragraph(vec![Inline::plain("first line second line third")])
        );
    }

    #[test]
    fn test_paragraph_interrupted_by_heading() {
        let doc = parse("text\n## Section\nmore");
        assert_eq!(doc.len(), 3);
        assert!(matches!(doc.blocks[1], Block::Heading { level: 2, .. }));
    }

    #[test]
    fn test_page_break() {
        let doc = parse("one\n\n---\n\ntwo");
        assert_eq!(doc.blocks[1], Block::PageBreak);
    }

    #[test]
    fn test_code_block() {
        let doc = parse("```rust\nfn main() {\n    println!(\"hi\");\n}\n```\nafter");
        assert_eq!(
            doc.blocks[0],
            Block::CodeBlock {
                lang: "rust".into(),
                lines: vec![
                    "fn main() {".into(),
                    "    println!(\"hi\");".into(),
                    "}".into(),
                ],
            }
        );
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_unterminated_fence() {
        let doc = parse("```\nline **one**\nline two");
        assert_eq!(doc.len(), 1);
        assert_eq!(
            doc.blocks[0],
            Block::CodeBlock {
                lang: String::new(),
                lines: vec!["line **one**".into(), "line two".into()],
            }
        );
    }

    #[test]
    fn test_table() {
        let doc = parse("| A | B |\n|---|:---:|\n| 1 | **2** |\n| 3 | 4 |\n\nafter");
        assert_eq!(doc.len(), 2);
        let Block::Table { rows } = &doc.blocks[0] else {
            panic!("expected table, got {:?}", doc.blocks[0]);
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], vec![Inline::plain("A")]);
        assert_eq!(rows[1][1], vec![Inline::text("2", Marks::bold())]);
    }

    #[test]
    fn test_pipe_line_without_separator_is_paragraph() {
        let doc = parse("a | b\njust prose");
        assert_eq!(doc.len(), 1);
        assert_eq!(
            doc.blocks[0],
            Block::paragraph(vec![Inline::plain("a | b just prose")])
        );
    }

    #[test]
    fn test_table_interrupts_paragraph() {
        let doc = parse("Intro text\n| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(doc.len(), 2);
        assert!(matches!(doc.blocks[1], Block::Table { .. }));
    }

    #[test]
    fn test_lists() {
        let doc = parse("- one\n  - nested\n* two\n1. first\n2. second");
        assert_eq!(doc.len(), 2);
        let Block::List { ordered, items } = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert!(!ordered);
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].inlines, vec![Inline::plain("nested")]);

        let Block::List { ordered, items } = &doc.blocks[1] else {
            panic!("expected list");
        };
        assert!(ordered);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_images() {
        let doc = parse("![[pics/a.png|Chart]]\n![Scheme](b.jpg)");
        assert_eq!(
            doc.blocks,
            vec![
                Block::Image {
                    src: "pics/a.png".into(),
                    alt: "Chart".into(),
                },
                Block::Image {
                    src: "b.jpg".into(),
                    alt: "Scheme".into(),
                },
            ]
        );
    }

    #[test]
    fn test_crlf_and_blank_input() {
        assert!(parse("").is_empty());
        assert!(parse("\r\n  \r\n\t\n").is_empty());

        let doc = parse("a\r\nb\r\n");
        assert_eq!(doc.blocks[0], Block::paragraph(vec![Inline::plain("a b")]));
    }

    #[test]
    fn test_nfc_normalization() {
        // "й" written as "и" + combining breve
        let doc = parse("\u{0438}\u{0306}");
        assert_eq!(doc.blocks[0], Block::paragraph(vec![Inline::plain("\u{0439}")]));
    }
}
