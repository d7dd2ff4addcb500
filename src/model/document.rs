//! Document and block-level types.

use super::{inlines_to_text, Inline};
use serde::{Deserialize, Serialize};

/// A parsed document: an ordered sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Blocks in source order
    pub blocks: Vec<Block>,
}

impl DocumentModel {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Add a block to the document.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One structural unit of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    /// A heading (level 1-6)
    Heading {
        /// Heading level
        level: u8,
        /// Heading content
        inlines: Vec<Inline>,
    },

    /// A paragraph of text
    Paragraph {
        /// Paragraph content
        inlines: Vec<Inline>,
    },

    /// A run of consecutive list items of the same kind
    List {
        /// Numbered (`1.`) rather than bulleted (`-`, `*`, `+`)
        ordered: bool,
        /// Items in source order
        items: Vec<ListItem>,
    },

    /// A table; the first row is the header
    Table {
        /// Rows of cells
        rows: Vec<TableRow>,
    },

    /// A fenced code block, kept verbatim
    CodeBlock {
        /// Language tag after the opening fence (may be empty)
        lang: String,
        /// Raw lines
        lines: Vec<String>,
    },

    /// An image embed on a line of its own
    Image {
        /// Source path as written
        src: String,
        /// Alternative text
        alt: String,
    },

    /// An explicit page break
    PageBreak,
}

impl Block {
    /// Create a heading, clamping the level to 1-6.
    pub fn heading(level: usize, inlines: Vec<Inline>) -> Self {
        Block::Heading {
            level: level.clamp(1, 6) as u8,
            inlines,
        }
    }

    /// Create a paragraph.
    pub fn paragraph(inlines: Vec<Inline>) -> Self {
        Block::Paragraph { inlines }
    }

    /// Get the block kind as used in serialized output.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::List { .. } => "list",
            Block::Table { .. } => "table",
            Block::CodeBlock { .. } => "codeBlock",
            Block::Image { .. } => "image",
            Block::PageBreak => "pageBreak",
        }
    }

    /// Get plain text content, or `None` for blocks without text.
    pub fn plain_text(&self) -> Option<String> {
        match self {
            Block::Heading { inlines, .. } | Block::Paragraph { inlines } => {
                Some(inlines_to_text(inlines))
            }
            Block::List { items, .. } => Some(
                items
                    .iter()
                    .map(|item| inlines_to_text(&item.inlines))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Block::Table { rows } => Some(
                rows.iter()
                    .map(|row| {
                        row.iter()
                            .map(|cell| inlines_to_text(cell))
                            .collect::<Vec<_>>()
                            .join("\t")
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Block::CodeBlock { lines, .. } => Some(lines.join("\n")),
            Block::Image { alt, .. } if !alt.is_empty() => Some(alt.clone()),
            Block::Image { .. } | Block::PageBreak => None,
        }
    }
}

/// A single list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item content
    pub inlines: Vec<Inline>,
}

impl ListItem {
    /// Create a list item.
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self { inlines }
    }
}

/// A table cell: a sequence of inline runs.
pub type Cell = Vec<Inline>;

/// A table row: a sequence of cells.
pub type TableRow = Vec<Cell>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Marks;

    #[test]
    fn test_document_new() {
        let doc = DocumentModel::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn test_heading_level_clamped() {
        let h = Block::heading(9, vec![Inline::plain("Deep")]);
        assert!(matches!(h, Block::Heading { level: 6, .. }));

        let h = Block::heading(0, vec![Inline::plain("Zero")]);
        assert!(matches!(h, Block::Heading { level: 1, .. }));
    }

    #[test]
    fn test_plain_text() {
        let mut doc = DocumentModel::new();
        doc.push(Block::heading(1, vec![Inline::plain("Title")]));
        doc.push(Block::paragraph(vec![
            Inline::plain("Hello "),
            Inline::text("world", Marks::bold()),
        ]));
        doc.push(Block::PageBreak);

        assert_eq!(doc.plain_text(), "Title\n\nHello world");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Block::PageBreak).unwrap();
        assert_eq!(json, r#"{"type":"pageBreak"}"#);

        let block = Block::CodeBlock {
            lang: "rust".into(),
            lines: vec!["fn main() {}".into()],
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "codeBlock");
        assert_eq!(block.kind(), "codeBlock");
    }
}
