//! Output primitive tree handed to an encoder.
//!
//! All lengths are in twips and font sizes in half-points; see
//! [`crate::units`].

use crate::model::ImageResource;
use crate::preset::{Alignment, PageSetup, Pagination};
use crate::units::mm_to_twips;
use serde::Serialize;

use super::AssemblyStats;

/// An assembled document: ordered sections plus statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDocument {
    /// Document title written to the package properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body font used as the document-wide default
    pub default_font: DefaultFont,

    /// Independently paginated sections, in order
    pub sections: Vec<Section>,

    /// Assembly statistics
    pub stats: AssemblyStats,
}

impl OutputDocument {
    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Iterate over every image placement in document order.
    pub fn images(&self) -> impl Iterator<Item = &ImagePlacement> {
        self.sections
            .iter()
            .flat_map(|s| s.children.iter())
            .filter_map(|p| match p {
                Primitive::Image(image) => Some(image),
                _ => None,
            })
    }

    /// Total number of content primitives across all sections.
    pub fn primitive_count(&self) -> usize {
        self.sections.iter().map(|s| s.children.len()).sum()
    }
}

/// Document-wide default font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultFont {
    /// Font family
    pub family: String,
    /// Size in half-points
    pub size_half_points: i64,
}

/// One independently paginated region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Page size, margins and header/footer distances
    pub page: PageGeometry,

    /// Header content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderFooter>,

    /// Footer content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<HeaderFooter>,

    /// Restart page numbering at this value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number_start: Option<u32>,

    /// Content primitives
    pub children: Vec<Primitive>,
}

impl Section {
    /// Create a section without header, footer or numbering.
    pub fn new(page: PageGeometry, children: Vec<Primitive>) -> Self {
        Self {
            page,
            header: None,
            footer: None,
            page_number_start: None,
            children,
        }
    }

    /// Check if the section shows a page number.
    pub fn has_page_number(&self) -> bool {
        self.header
            .iter()
            .chain(self.footer.iter())
            .any(HeaderFooter::has_page_number)
    }
}

/// Page geometry in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    /// Page width
    pub width: i64,
    /// Page height
    pub height: i64,
    /// Top margin
    pub margin_top: i64,
    /// Bottom margin
    pub margin_bottom: i64,
    /// Left margin
    pub margin_left: i64,
    /// Right margin
    pub margin_right: i64,
    /// Distance from the top edge to the header
    pub header_distance: i64,
    /// Distance from the bottom edge to the footer
    pub footer_distance: i64,
}

impl PageGeometry {
    /// Derive page geometry from preset page and pagination settings.
    pub fn from_preset(page: &PageSetup, pagination: &Pagination) -> Self {
        let (width_mm, height_mm) = page.size.dimensions_mm();
        let offset = mm_to_twips(pagination.offset_from_top_mm);
        Self {
            width: mm_to_twips(width_mm),
            height: mm_to_twips(height_mm),
            margin_top: mm_to_twips(page.margins_mm.top),
            margin_bottom: mm_to_twips(page.margins_mm.bottom),
            margin_left: mm_to_twips(page.margins_mm.left),
            margin_right: mm_to_twips(page.margins_mm.right),
            header_distance: offset,
            footer_distance: offset,
        }
    }
}

/// Header or footer content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderFooter {
    /// Paragraphs in the header/footer
    pub paragraphs: Vec<StyledParagraph>,
}

impl HeaderFooter {
    /// Header/footer holding the current page number.
    pub fn page_number(alignment: Alignment) -> Self {
        Self {
            paragraphs: vec![StyledParagraph {
                alignment: Some(alignment),
                runs: vec![Run::PageNumber],
                ..StyledParagraph::default()
            }],
        }
    }

    fn has_page_number(&self) -> bool {
        self.paragraphs.iter().any(StyledParagraph::has_page_number)
    }
}

/// A content primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Primitive {
    /// Styled paragraph
    Paragraph(StyledParagraph),
    /// Bordered table
    Table(StyledTable),
    /// Centered image
    Image(ImagePlacement),
    /// Table-of-contents field filled in by the consuming application
    TableOfContents(TocPlaceholder),
}

/// Paragraph with resolved layout and runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledParagraph {
    /// Alignment; `None` inherits the document default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    /// First-line indent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line_indent: Option<i64>,

    /// Spacing before/after and line spacing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,

    /// Start on a new page
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub page_break_before: bool,

    /// Keep with the next paragraph
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub keep_next: bool,

    /// Keep lines together
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub keep_lines: bool,

    /// Semantic heading level for outline and table of contents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,

    /// Content runs
    pub runs: Vec<Run>,
}

impl StyledParagraph {
    /// Empty paragraph that forces a page break.
    pub fn page_break() -> Self {
        Self {
            page_break_before: true,
            ..Self::default()
        }
    }

    /// Concatenated text of every text run.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .filter_map(|r| match r {
                Run::Text(run) => Some(run.text.as_str()),
                Run::PageNumber => None,
            })
            .collect()
    }

    /// Check if the paragraph holds a page number field.
    pub fn has_page_number(&self) -> bool {
        self.runs.iter().any(|r| matches!(r, Run::PageNumber))
    }

    /// Text runs only.
    pub fn text_runs(&self) -> impl Iterator<Item = &StyledRun> {
        self.runs.iter().filter_map(|r| match r {
            Run::Text(run) => Some(run),
            Run::PageNumber => None,
        })
    }
}

/// Paragraph spacing in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spacing {
    /// Space before
    pub before: i64,
    /// Space after
    pub after: i64,
    /// Line height ("auto" rule, 240 = single)
    pub line: i64,
}

/// A run inside a styled paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Run {
    /// Formatted text
    Text(StyledRun),
    /// Current page number field
    PageNumber,
}

/// Text with resolved character formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledRun {
    /// Text content
    pub text: String,
    /// Font family
    pub font: String,
    /// Size in half-points
    pub size_half_points: i64,
    /// Bold
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    /// Italic
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    /// Capitals
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub all_caps: bool,
    /// Hex RGB color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Table with uniform borders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledTable {
    /// Width as a percentage of the text area
    pub width_percent: u8,
    /// Borders on every edge and both inner axes
    pub borders: TableBorders,
    /// Rows of cells, all with the same column count
    pub rows: Vec<Vec<TableCell>>,
}

impl StyledTable {
    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    /// Cell paragraphs
    pub paragraphs: Vec<StyledParagraph>,
}

/// Border line settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    /// Line style
    pub style: BorderStyle,
    /// Width in eighths of a point
    pub size: u32,
    /// Hex RGB color
    pub color: String,
}

impl Border {
    /// Thin single black line.
    pub fn single() -> Self {
        Self {
            style: BorderStyle::Single,
            size: 4,
            color: "000000".to_string(),
        }
    }
}

/// Border line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    /// Single line
    Single,
    /// No line
    None,
}

/// Edge of a table a border applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TableEdge {
    /// Outer top edge
    Top,
    /// Outer left edge
    Left,
    /// Outer bottom edge
    Bottom,
    /// Outer right edge
    Right,
    /// Between rows
    InsideHorizontal,
    /// Between columns
    InsideVertical,
}

/// Table borders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBorders {
    /// Top edge
    pub top: Border,
    /// Bottom edge
    pub bottom: Border,
    /// Left edge
    pub left: Border,
    /// Right edge
    pub right: Border,
    /// Between rows
    pub inside_horizontal: Border,
    /// Between columns
    pub inside_vertical: Border,
}

impl TableBorders {
    /// Same border everywhere.
    pub fn uniform(border: Border) -> Self {
        Self {
            top: border.clone(),
            bottom: border.clone(),
            left: border.clone(),
            right: border.clone(),
            inside_horizontal: border.clone(),
            inside_vertical: border,
        }
    }

    /// Every border with its edge.
    pub fn edges(&self) -> [(TableEdge, &Border); 6] {
        [
            (TableEdge::Top, &self.top),
            (TableEdge::Left, &self.left),
            (TableEdge::Bottom, &self.bottom),
            (TableEdge::Right, &self.right),
            (TableEdge::InsideHorizontal, &self.inside_horizontal),
            (TableEdge::InsideVertical, &self.inside_vertical),
        ]
    }
}

/// An embedded image at a fixed display size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlacement {
    /// Image data and type
    pub resource: ImageResource,
    /// Alternative text
    pub alt: String,
    /// Display width in pixels
    pub width_px: u32,
    /// Display height in pixels
    pub height_px: u32,
}

/// Table-of-contents field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocPlaceholder {
    /// Title of the field
    pub title: String,
    /// First heading level included
    pub min_level: u8,
    /// Last heading level included
    pub max_level: u8,
    /// Entries link to their headings
    pub hyperlink: bool,
}
