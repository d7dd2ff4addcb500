//! Typed style preset.
//!
//! A [`StylePreset`] is only ever produced by [`normalize`](super::normalize),
//! which merges user input over the built-in defaults and validates it.

use super::{Role, RoleStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named bundle of typography and layout rules applied to one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    /// Preset identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Page geometry
    pub page: PageSetup,

    /// Base font
    pub font: FontSpec,

    /// Base paragraph layout
    pub paragraph: ParagraphSpec,

    /// Page numbering
    pub pagination: Pagination,

    /// Localized labels and messages
    pub strings: PresetStrings,

    /// Per-role overrides, complete after normalization
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<Role, RoleStyle>,
}

/// Page size and margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    /// Paper size
    #[serde(default)]
    pub size: PageSize,

    /// Margins in millimeters
    pub margins_mm: Margins,

    /// Left margin used under the long-term storage policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_term_storage_left_margin_mm: Option<f64>,
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    /// 210 x 297 mm
    #[default]
    A4,
    /// 148 x 210 mm
    A5,
    /// 8.5 x 11 in
    Letter,
}

impl PageSize {
    /// All accepted names.
    pub const NAMES: [&'static str; 3] = ["A4", "A5", "Letter"];

    /// Page width and height in millimeters.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}

/// Page margins in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin
    pub top: f64,
    /// Bottom margin
    pub bottom: f64,
    /// Left margin
    pub left: f64,
    /// Right margin
    pub right: f64,
}

/// Font settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    /// Font family name
    pub family: String,

    /// Font size in points
    pub size_pt: f64,

    /// Force bold on every run
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    /// Force italic on every run
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,

    /// Render in capitals
    #[serde(default, skip_serializing_if = "is_false")]
    pub all_caps: bool,

    /// Text color as hex RGB (e.g., "000000")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Paragraph layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphSpec {
    /// Text alignment
    pub alignment: Alignment,

    /// First-line indent in centimeters
    pub first_line_indent_cm: f64,

    /// Line spacing multiplier (1.0 = single)
    pub line_spacing: f64,

    /// Space before paragraph in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_before_pt: Option<f64>,

    /// Space after paragraph in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_after_pt: Option<f64>,

    /// Start the paragraph on a new page
    #[serde(default, skip_serializing_if = "is_false")]
    pub page_break_before: bool,

    /// Keep on the same page as the next paragraph
    #[serde(default, skip_serializing_if = "is_false")]
    pub keep_with_next: bool,

    /// Keep all lines on one page
    #[serde(default, skip_serializing_if = "is_false")]
    pub keep_lines: bool,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment
    Left,
    /// Right alignment
    Right,
    /// Center alignment
    Center,
    /// Justified alignment (default)
    #[default]
    Justify,
}

impl Alignment {
    /// All accepted names.
    pub const NAMES: [&'static str; 4] = ["left", "right", "center", "justify"];
}

/// Page numbering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Where the page number is placed
    pub position: PagePosition,

    /// Header/footer distance from the page edge in millimeters
    pub offset_from_top_mm: f64,

    /// First page number of the main section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<i64>,

    /// Number of leading pages without a visible number.
    ///
    /// Validated but not used for section generation; unnumbered pages come
    /// only from the separate table-of-contents section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_first_pages: Option<u32>,
}

impl Pagination {
    /// Starting page number, floored to 1.
    pub fn first_page_number(&self) -> u32 {
        match self.start_at {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => 1,
        }
    }
}

/// Page number placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PagePosition {
    /// No page numbers
    #[default]
    None,
    /// Header, left
    TopLeft,
    /// Header, centered
    TopCenter,
    /// Header, right
    TopRight,
    /// Footer, left
    BottomLeft,
    /// Footer, centered
    BottomCenter,
    /// Footer, right
    BottomRight,
}

impl PagePosition {
    /// All accepted names.
    pub const NAMES: [&'static str; 7] = [
        "none",
        "top-left",
        "top-center",
        "top-right",
        "bottom-left",
        "bottom-center",
        "bottom-right",
    ];

    /// Check if the number goes into the header.
    pub fn is_top(self) -> bool {
        matches!(
            self,
            PagePosition::TopLeft | PagePosition::TopCenter | PagePosition::TopRight
        )
    }

    /// Horizontal alignment of the number, or `None` when numbering is off.
    pub fn alignment(self) -> Option<Alignment> {
        match self {
            PagePosition::None => None,
            PagePosition::TopLeft | PagePosition::BottomLeft => Some(Alignment::Left),
            PagePosition::TopCenter | PagePosition::BottomCenter => Some(Alignment::Center),
            PagePosition::TopRight | PagePosition::BottomRight => Some(Alignment::Right),
        }
    }
}

/// Localized strings used in generated content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetStrings {
    /// Visible title above the table of contents
    pub toc_title: String,

    /// Title of the table-of-contents field itself
    pub toc_field_title: String,

    /// Table caption label (e.g., "Таблица")
    pub table_label: String,

    /// Figure caption label (e.g., "Рисунок")
    pub figure_label: String,

    /// Separator between number and caption text (e.g., " — ")
    pub caption_separator: String,

    /// Placeholder for a missing image; `{src}` is replaced by the path
    pub image_not_found: String,
}

impl PresetStrings {
    /// Format the missing-image message for a source path.
    pub fn image_not_found_message(&self, src: &str) -> String {
        self.image_not_found.replace("{src}", src)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_position_serde() {
        let pos: PagePosition = serde_json::from_str("\"bottom-right\"").unwrap();
        assert_eq!(pos, PagePosition::BottomRight);
        assert!(!pos.is_top());
        assert_eq!(pos.alignment(), Some(Alignment::Right));
        assert_eq!(serde_json::to_string(&PagePosition::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_first_page_number() {
        let mut p = Pagination {
            position: PagePosition::TopCenter,
            offset_from_top_mm: 10.0,
            start_at: None,
            skip_first_pages: None,
        };
        assert_eq!(p.first_page_number(), 1);
        p.start_at = Some(3);
        assert_eq!(p.first_page_number(), 3);
        p.start_at = Some(0);
        assert_eq!(p.first_page_number(), 1);
        p.start_at = Some(-4);
        assert_eq!(p.first_page_number(), 1);
    }

    #[test]
    fn test_image_not_found_message() {
        let strings = PresetStrings {
            toc_title: "CONTENTS".into(),
            toc_field_title: "Contents".into(),
            table_label: "Table".into(),
            figure_label: "Figure".into(),
            caption_separator: " - ".into(),
            image_not_found: "[Image not found: {src}]".into(),
        };
        assert_eq!(
            strings.image_not_found_message("a/b.png"),
            "[Image not found: a/b.png]"
        );
    }
}
