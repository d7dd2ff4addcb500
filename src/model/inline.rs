//! Inline-level types.

use serde::{Deserialize, Serialize};

/// Inline content within a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    /// A run of text sharing one set of marks
    Text(TextRun),
}

impl Inline {
    /// Create a text run with the given marks.
    pub fn text(text: impl Into<String>, marks: Marks) -> Self {
        Inline::Text(TextRun {
            text: text.into(),
            marks,
        })
    }

    /// Create an unmarked text run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::text(text, Marks::default())
    }

    /// Get the text of this inline.
    pub fn as_text(&self) -> &str {
        match self {
            Inline::Text(run) => &run.text,
        }
    }

    /// Get the marks of this inline.
    pub fn marks(&self) -> Marks {
        match self {
            Inline::Text(run) => run.marks,
        }
    }
}

/// A run of text with consistent emphasis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Emphasis flags
    #[serde(flatten)]
    pub marks: Marks,
}

impl TextRun {
    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Emphasis flags carried per run. Marks never nest beyond these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marks {
    /// Bold text
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    /// Italic text
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,

    /// Inline code
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Marks {
    /// Bold only.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// Italic only.
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }

    /// Code only.
    pub fn code() -> Self {
        Self {
            code: true,
            ..Default::default()
        }
    }

    /// Check if any mark is set.
    pub fn any(&self) -> bool {
        self.bold || self.italic || self.code
    }
}

/// Concatenate the text of inline runs, ignoring marks.
pub fn inlines_to_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::as_text).collect()
}
