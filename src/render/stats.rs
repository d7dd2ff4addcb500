//! Statistics collected while assembling a document.

use serde::{Deserialize, Serialize};

/// Counts of what the assembler emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyStats {
    /// Headings rendered
    pub heading_count: u32,

    /// Body paragraphs rendered
    pub paragraph_count: u32,

    /// List items rendered
    pub list_item_count: u32,

    /// Code lines rendered
    pub code_line_count: u32,

    /// Tables rendered
    pub table_count: u32,

    /// Figures numbered, found or not
    pub figure_count: u32,

    /// Figures whose image could not be found
    pub missing_image_count: u32,

    /// Page breaks honoured
    pub page_break_count: u32,

    /// Caption paragraphs captured for a following table
    pub captured_caption_count: u32,

    /// Words in rendered text (whitespace-separated tokens)
    pub word_count: u32,
}

impl AssemblyStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word counts from rendered text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &AssemblyStats) {
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.list_item_count += other.list_item_count;
        self.code_line_count += other.code_line_count;
        self.table_count += other.table_count;
        self.figure_count += other.figure_count;
        self.missing_image_count += other.missing_image_count;
        self.page_break_count += other.page_break_count;
        self.captured_caption_count += other.captured_caption_count;
        self.word_count += other.word_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let mut stats = AssemblyStats::new();
        stats.count_text("Итоги  квартала\tкратко");
        assert_eq!(stats.word_count, 3);
    }

    #[test]
    fn test_merge() {
        let mut a = AssemblyStats {
            table_count: 2,
            figure_count: 1,
            ..Default::default()
        };
        let b = AssemblyStats {
            table_count: 1,
            missing_image_count: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.table_count, 3);
        assert_eq!(a.figure_count, 1);
        assert_eq!(a.missing_image_count, 1);
    }
}
