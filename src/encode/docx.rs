//! WordprocessingML (`.docx`) encoder built on `docx-rs`.
//!
//! The last section maps to the document-level section properties. Every
//! earlier section ends with an empty paragraph carrying its own section
//! properties, so each section starts on a new page.

use super::DocumentEncoder;
use crate::error::EncodeError;
use crate::preset::Alignment;
use crate::render::{
    BorderStyle, HeaderFooter, ImagePlacement, OutputDocument, PageGeometry, Primitive, Section,
    StyledParagraph, StyledRun, StyledTable, TableBorders as OutputBorders,
    TableCell as OutputCell, TableEdge, TocPlaceholder,
};
use crate::units::px_to_emu;
use chrono::{DateTime, SecondsFormat, Utc};
use docx_rs::{
    AlignmentType, BorderType, Docx, DocxError, Footer, Header, LineSpacing, PageMargin, PageNum,
    PageNumType, PageSize, Paragraph, Pic, Run, RunFonts, SectionProperty, SpecialIndentType,
    Style, StyleType, Table, TableBorder, TableBorderPosition, TableBorders, TableCell,
    TableOfContents, TableRow, WidthType,
};
use std::io::Cursor;

/// Encoder producing a `.docx` package.
#[derive(Debug, Clone, Default)]
pub struct DocxEncoder {
    created: Option<DateTime<Utc>>,
}

impl DocxEncoder {
    /// Create a DOCX encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the creation timestamp instead of using the current time.
    pub fn with_timestamp(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

impl DocumentEncoder for DocxEncoder {
    fn name(&self) -> &str {
        "docx"
    }

    fn extension(&self) -> &str {
        "docx"
    }

    fn mime_type(&self) -> &str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }

    fn encode(&self, doc: &OutputDocument) -> Result<Vec<u8>, EncodeError> {
        let created = self
            .created
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut docx = Docx::new()
            .default_fonts(fonts(&doc.default_font.family))
            .default_size(to_usize(doc.default_font.size_half_points))
            .created_at(&created)
            .updated_at(&created);
        for level in 1..=6 {
            docx = docx.add_style(heading_style(level));
        }

        if let Some((last, earlier)) = doc.sections.split_last() {
            for section in earlier {
                docx = add_children(docx, section);
                if section.header.is_some() || section.footer.is_some() {
                    log::warn!("header and footer are only written for the last section");
                }
                docx = docx.add_paragraph(Paragraph::new().section_property(section_property(section)));
            }

            docx = add_children(docx, last)
                .page_size(to_u32(last.page.width), to_u32(last.page.height))
                .page_margin(page_margin(&last.page));
            if let Some(header) = &last.header {
                docx = docx.header(header_part(header));
            }
            if let Some(footer) = &last.footer {
                docx = docx.footer(footer_part(footer));
            }
            if let Some(start) = last.page_number_start {
                docx = docx.page_num_type(PageNumType::new().start(start));
            }
        }

        let mut buf = Vec::new();
        docx.build()
            .pack(Cursor::new(&mut buf))
            .map_err(DocxError::from)?;

        log::debug!(
            "encoded {} sections, {} images into {} bytes",
            doc.sections.len(),
            doc.images().count(),
            buf.len()
        );
        Ok(buf)
    }
}

fn add_children(mut docx: Docx, section: &Section) -> Docx {
    let width = text_width(&section.page);
    for child in &section.children {
        docx = match child {
            Primitive::Paragraph(p) => docx.add_paragraph(paragraph(p)),
            Primitive::Table(t) => docx.add_table(table(t, width)),
            Primitive::Image(image) => docx.add_paragraph(image_paragraph(image)),
            Primitive::TableOfContents(toc) => docx.add_table_of_contents(table_of_contents(toc)),
        };
    }
    docx
}

fn section_property(section: &Section) -> SectionProperty {
    let page = &section.page;
    let mut property = SectionProperty::new()
        .page_size(PageSize::new().size(to_u32(page.width), to_u32(page.height)))
        .page_margin(page_margin(page));
    if let Some(start) = section.page_number_start {
        property = property.page_num_type(PageNumType::new().start(start));
    }
    property
}

fn page_margin(page: &PageGeometry) -> PageMargin {
    PageMargin::new()
        .top(to_i32(page.margin_top))
        .bottom(to_i32(page.margin_bottom))
        .left(to_i32(page.margin_left))
        .right(to_i32(page.margin_right))
        .header(to_i32(page.header_distance))
        .footer(to_i32(page.footer_distance))
}

/// Width between the left and right margins.
fn text_width(page: &PageGeometry) -> i64 {
    (page.width - page.margin_left - page.margin_right).max(0)
}

fn heading_style_id(level: u8) -> String {
    format!("Heading{level}")
}

fn heading_style(level: u8) -> Style {
    Style::new(&heading_style_id(level), StyleType::Paragraph)
        .name(&format!("heading {level}"))
        .based_on("Normal")
        .next("Normal")
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Right => AlignmentType::Right,
        Alignment::Center => AlignmentType::Center,
        Alignment::Justify => AlignmentType::Both,
    }
}

fn fonts(family: &str) -> RunFonts {
    RunFonts::new()
        .ascii(family)
        .hi_ansi(family)
        .east_asia(family)
        .cs(family)
}

fn paragraph(p: &StyledParagraph) -> Paragraph {
    p.text_runs()
        .fold(paragraph_properties(Paragraph::new(), p), |out, run| {
            out.add_run(text_run(run))
        })
}

fn paragraph_properties(mut out: Paragraph, p: &StyledParagraph) -> Paragraph {
    if let Some(level) = p.heading_level {
        out = out.style(&heading_style_id(level));
    }
    if p.keep_next {
        out = out.keep_next(true);
    }
    if p.keep_lines {
        out = out.keep_lines(true);
    }
    if p.page_break_before {
        out = out.page_break_before(true);
    }
    if let Some(spacing) = p.spacing {
        out = out.line_spacing(
            LineSpacing::new()
                .before(to_u32(spacing.before) as _)
                .after(to_u32(spacing.after) as _)
                .line(to_i32(spacing.line) as _),
        );
    }
    if let Some(indent) = p.first_line_indent {
        out = out.indent(
            None,
            Some(SpecialIndentType::FirstLine(to_i32(indent))),
            None,
            None,
        );
    }
    if let Some(alignment) = p.alignment {
        out = out.align(alignment_type(alignment));
    }
    out
}

fn text_run(r: &StyledRun) -> Run {
    let mut run = Run::new()
        .add_text(r.text.as_str())
        .fonts(fonts(&r.font))
        .size(to_usize(r.size_half_points));
    if r.bold {
        run = run.bold();
    }
    if r.italic {
        run = run.italic();
    }
    if r.all_caps {
        run.run_property = run.run_property.caps();
    }
    if let Some(color) = &r.color {
        run = run.color(color.as_str());
    }
    run
}

fn image_paragraph(image: &ImagePlacement) -> Paragraph {
    let pic = Pic::new_with_dimensions(image.resource.data.clone(), image.width_px, image.height_px)
        .size(emu(image.width_px), emu(image.height_px));
    Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(Run::new().add_image(pic))
}

fn table(t: &StyledTable, text_width: i64) -> Table {
    let columns = t.column_count().max(1);
    let column_width = to_usize(text_width / columns as i64);
    let rows = t
        .rows
        .iter()
        .map(|row| TableRow::new(row.iter().map(table_cell).collect()))
        .collect();

    Table::new(rows)
        .set_grid(vec![column_width; columns])
        .width(usize::from(t.width_percent) * 50, WidthType::Pct)
        .set_borders(table_borders(&t.borders))
}

fn table_cell(cell: &OutputCell) -> TableCell {
    let out = TableCell::new().width(100, WidthType::Auto);
    if cell.paragraphs.is_empty() {
        return out.add_paragraph(Paragraph::new());
    }
    cell.paragraphs
        .iter()
        .fold(out, |out, p| out.add_paragraph(paragraph(p)))
}

fn table_borders(borders: &OutputBorders) -> TableBorders {
    borders
        .edges()
        .into_iter()
        .fold(TableBorders::new(), |out, (edge, border)| {
            out.set(
                TableBorder::new(border_position(edge))
                    .border_type(border_type(border.style))
                    .size(border.size as _)
                    .color(border.color.as_str()),
            )
        })
}

fn border_position(edge: TableEdge) -> TableBorderPosition {
    match edge {
        TableEdge::Top => TableBorderPosition::Top,
        TableEdge::Left => TableBorderPosition::Left,
        TableEdge::Bottom => TableBorderPosition::Bottom,
        TableEdge::Right => TableBorderPosition::Right,
        TableEdge::InsideHorizontal => TableBorderPosition::InsideH,
        TableEdge::InsideVertical => TableBorderPosition::InsideV,
    }
}

fn border_type(style: BorderStyle) -> BorderType {
    match style {
        BorderStyle::Single => BorderType::Single,
        BorderStyle::None => BorderType::Nil,
    }
}

/// Table-of-contents field, marked dirty so the consuming application
/// fills it from the heading styles on open.
fn table_of_contents(toc: &TocPlaceholder) -> TableOfContents {
    let out = TableOfContents::new()
        .heading_styles_range(usize::from(toc.min_level), usize::from(toc.max_level))
        .alias(toc.title.as_str())
        .dirty();
    if toc.hyperlink {
        out.hyperlink()
    } else {
        out
    }
}

fn page_number(p: &StyledParagraph) -> Paragraph {
    Paragraph::new()
        .align(alignment_type(p.alignment.unwrap_or(Alignment::Left)))
        .add_page_num(PageNum::new())
}

fn header_part(content: &HeaderFooter) -> Header {
    content.paragraphs.iter().fold(Header::new(), |out, p| {
        if p.has_page_number() {
            out.add_paragraph(page_number(p))
        } else {
            out.add_paragraph(paragraph(p))
        }
    })
}

fn footer_part(content: &HeaderFooter) -> Footer {
    content.paragraphs.iter().fold(Footer::new(), |out, p| {
        if p.has_page_number() {
            out.add_paragraph(page_number(p))
        } else {
            out.add_paragraph(paragraph(p))
        }
    })
}

fn emu(px: u32) -> u32 {
    u32::try_from(px_to_emu(px)).unwrap_or(u32::MAX)
}

fn to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn to_usize(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageResource;
    use crate::render::{
        AssemblyStats, Border, DefaultFont, Run as OutputRun, Spacing, TableBorders as Borders,
    };
    use chrono::TimeZone;
    use std::io::Read;
    use zip::ZipArchive;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn page() -> PageGeometry {
        PageGeometry {
            width: 11906,
            height: 16838,
            margin_top: 1134,
            margin_bottom: 1134,
            margin_left: 1701,
            margin_right: 567,
            header_distance: 567,
            footer_distance: 567,
        }
    }

    fn text(text: &str, bold: bool) -> OutputRun {
        OutputRun::Text(StyledRun {
            text: text.into(),
            font: "Times New Roman".into(),
            size_half_points: 28,
            bold,
            italic: false,
            all_caps: false,
            color: None,
        })
    }

    fn document(sections: Vec<Section>) -> OutputDocument {
        OutputDocument {
            title: Some("Отчёт".into()),
            default_font: DefaultFont {
                family: "Times New Roman".into(),
                size_half_points: 28,
            },
            sections,
            stats: AssemblyStats::default(),
        }
    }

    fn encode(doc: &OutputDocument) -> Vec<u8> {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        DocxEncoder::new().with_timestamp(stamp).encode(doc).unwrap()
    }

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_paragraph_formatting() {
        let heading = StyledParagraph {
            alignment: Some(Alignment::Justify),
            first_line_indent: Some(709),
            spacing: Some(Spacing {
                before: 0,
                after: 120,
                line: 360,
            }),
            heading_level: Some(2),
            keep_next: true,
            runs: vec![text("A & B", true)],
            ..StyledParagraph::default()
        };
        let doc = document(vec![Section::new(
            page(),
            vec![
                Primitive::Paragraph(heading),
                Primitive::Paragraph(StyledParagraph::page_break()),
            ],
        )]);

        let xml = part(&encode(&doc), "word/document.xml");
        assert!(xml.contains(r#"w:val="Heading2""#));
        assert!(xml.contains("w:keepNext"));
        assert!(xml.contains(r#"w:firstLine="709""#));
        assert!(xml.contains(r#"w:val="both""#));
        assert!(xml.contains(r#"w:after="120""#));
        assert!(xml.contains("A &amp; B</w:t>"));
        assert!(xml.contains("w:pageBreakBefore"));
        assert!(xml.contains(r#"w:w="11906""#));
        assert!(xml.contains(r#"w:left="1701""#));
    }

    #[test]
    fn test_heading_styles_defined() {
        let doc = document(vec![Section::new(page(), Vec::new())]);
        let styles = part(&encode(&doc), "word/styles.xml");
        for level in 1..=6 {
            assert!(styles.contains(&format!(r#"w:styleId="Heading{level}""#)));
        }
    }

    #[test]
    fn test_page_number_header_and_start() {
        let mut section = Section::new(
            page(),
            vec![Primitive::Paragraph(StyledParagraph {
                runs: vec![text("Текст", false)],
                ..StyledParagraph::default()
            })],
        );
        section.header = Some(HeaderFooter::page_number(Alignment::Center));
        section.page_number_start = Some(3);

        let bytes = encode(&document(vec![section]));
        let header_name = part_names(&bytes)
            .into_iter()
            .find(|n| n.starts_with("word/header"))
            .unwrap();
        assert!(part(&bytes, &header_name).contains("PAGE"));

        let xml = part(&bytes, "word/document.xml");
        assert!(xml.contains("w:headerReference"));
        assert!(xml.contains(r#"w:start="3""#));
    }

    #[test]
    fn test_toc_section_is_separate() {
        let toc = Section::new(
            page(),
            vec![Primitive::TableOfContents(TocPlaceholder {
                title: "Содержание".into(),
                min_level: 1,
                max_level: 6,
                hyperlink: true,
            })],
        );
        let main = Section::new(
            page(),
            vec![Primitive::Paragraph(StyledParagraph {
                runs: vec![text("Текст", false)],
                ..StyledParagraph::default()
            })],
        );

        let xml = part(&encode(&document(vec![toc, main])), "word/document.xml");
        assert_eq!(xml.matches("<w:sectPr").count(), 2);
        assert!(xml.contains("TOC"));
        assert!(xml.contains("Содержание"));
    }

    #[test]
    fn test_table_and_image() {
        let cell = |s: &str| OutputCell {
            paragraphs: vec![StyledParagraph {
                runs: vec![text(s, false)],
                ..StyledParagraph::default()
            }],
        };
        let table = StyledTable {
            width_percent: 100,
            borders: Borders::uniform(Border::single()),
            rows: vec![vec![cell("A"), cell("B")], vec![cell("1"), OutputCell { paragraphs: Vec::new() }]],
        };
        let image = ImagePlacement {
            resource: ImageResource::new(PNG.to_vec(), "chart.png"),
            alt: "График".into(),
            width_px: 500,
            height_px: 300,
        };
        let doc = document(vec![Section::new(
            page(),
            vec![Primitive::Table(table), Primitive::Image(image)],
        )]);

        let bytes = encode(&doc);
        let xml = part(&bytes, "word/document.xml");
        assert!(xml.contains("<w:tbl>"));
        assert!(xml.contains("w:insideH"));
        assert!(xml.contains(r#"w:w="4819""#));
        assert!(xml.contains("<w:drawing>"));
        assert!(part_names(&bytes).iter().any(|n| n.starts_with("word/media/")));
    }

    #[test]
    fn test_fixed_timestamp() {
        let bytes = encode(&document(vec![Section::new(page(), Vec::new())]));
        assert!(part(&bytes, "docProps/core.xml").contains("2025-01-02T03:04:05Z"));
    }
}
