//! Document assembler: model + preset → output primitive tree.

use super::output::{
    Border, DefaultFont, HeaderFooter, ImagePlacement, OutputDocument, PageGeometry, Primitive,
    Run, Section, Spacing, StyledParagraph, StyledRun, StyledTable, TableBorders, TableCell,
    TocPlaceholder,
};
use super::{AssemblyStats, CaptionPattern, ExportOptions, IMAGE_HEIGHT_PX, IMAGE_WIDTH_PX};
use crate::error::Result;
use crate::model::{inlines_to_text, Block, DocumentModel, Inline, ListItem, TableRow};
use crate::preset::{Alignment, FontSpec, ResolvedStyles, Role, RoleStyle, StylePreset};
use crate::storage::{file_stem, ImageResolver};
use crate::units::{cm_to_twips, line_spacing_to_twips, pt_to_half_points, pt_to_twips};

/// Font used for inline `code` runs.
const CODE_FONT: &str = "Courier New";

/// Smallest size of inline code, in points.
const MIN_CODE_SIZE_PT: f64 = 10.0;

/// Literal prefix of every list item paragraph.
const LIST_MARKER: &str = "- ";

/// Assemble a document model into sections of styled primitives.
///
/// `source_location` is the storage path of the note, used to resolve
/// relative image references.
pub async fn assemble(
    model: &DocumentModel,
    preset: &StylePreset,
    options: &ExportOptions,
    source_location: Option<&str>,
    resolver: &dyn ImageResolver,
) -> Result<OutputDocument> {
    Assembler::new(preset, *options)
        .assemble(model, source_location, resolver)
        .await
}

/// Running state of one assembly pass.
#[derive(Default)]
struct AssemblyState {
    table_counter: u32,
    figure_counter: u32,
    pending_caption: Option<String>,
    children: Vec<Primitive>,
    stats: AssemblyStats,
}

impl AssemblyState {
    fn push_paragraph(&mut self, paragraph: StyledParagraph) {
        self.children.push(Primitive::Paragraph(paragraph));
    }
}

/// Maps blocks to primitives for one preset and set of options.
///
/// The assembler itself holds no per-document state, so one instance can
/// assemble several documents.
pub struct Assembler<'p> {
    preset: &'p StylePreset,
    styles: ResolvedStyles,
    options: ExportOptions,
    captions: CaptionPattern,
}

impl<'p> Assembler<'p> {
    /// Create an assembler, resolving the preset's role styles.
    pub fn new(preset: &'p StylePreset, options: ExportOptions) -> Self {
        Self {
            preset,
            styles: ResolvedStyles::synthesize(preset),
            options,
            captions: CaptionPattern::new(
                &preset.strings.table_label,
                &preset.strings.caption_separator,
            ),
        }
    }

    /// Get the resolved role styles.
    pub fn styles(&self) -> &ResolvedStyles {
        &self.styles
    }

    /// Assemble one document.
    ///
    /// Images are resolved one at a time in document order.
    pub async fn assemble(
        &self,
        model: &DocumentModel,
        source_location: Option<&str>,
        resolver: &dyn ImageResolver,
    ) -> Result<OutputDocument> {
        let mut state = AssemblyState::default();

        for block in &model.blocks {
            match block {
                Block::PageBreak => self.page_break(&mut state),
                Block::Heading { level, inlines } => self.heading(*level, inlines, &mut state),
                Block::Paragraph { inlines } => self.paragraph(inlines, &mut state),
                Block::List { items, .. } => self.list(items, &mut state),
                Block::CodeBlock { lines, .. } => self.code_block(lines, &mut state),
                Block::Table { rows } => self.table(rows, &mut state),
                Block::Image { src, alt } => {
                    self.image(src, alt, source_location, resolver, &mut state)
                        .await?
                }
            }
        }

        if let Some(caption) = &state.pending_caption {
            log::debug!("caption \"{}\" not followed by a table, dropped", caption);
        }

        log::debug!(
            "assembled {} primitives ({} tables, {} figures)",
            state.children.len(),
            state.table_counter,
            state.figure_counter
        );

        Ok(self.build_document(state))
    }

    fn page_break(&self, state: &mut AssemblyState) {
        if self.options.ignore_page_breaks {
            return;
        }
        state.push_paragraph(StyledParagraph::page_break());
        state.stats.page_break_count += 1;
    }

    fn heading(&self, level: u8, inlines: &[Inline], state: &mut AssemblyState) {
        let level = level.clamp(1, 6);
        let mut paragraph = self.role_paragraph(Role::heading(level), inlines);
        paragraph.heading_level = Some(level);

        state.stats.heading_count += 1;
        state.stats.count_text(&inlines_to_text(inlines));
        state.push_paragraph(paragraph);
    }

    fn paragraph(&self, inlines: &[Inline], state: &mut AssemblyState) {
        let text = inlines_to_text(inlines);
        if self.captions.is_caption(&text) {
            log::debug!("captured table caption \"{}\"", text.trim());
            state.pending_caption = Some(text.trim().to_string());
            state.stats.captured_caption_count += 1;
            return;
        }

        state.stats.paragraph_count += 1;
        state.stats.count_text(&text);
        state.push_paragraph(self.role_paragraph(Role::Normal, inlines));
    }

    fn list(&self, items: &[ListItem], state: &mut AssemblyState) {
        for item in items {
            let mut inlines = Vec::with_capacity(item.inlines.len() + 1);
            inlines.push(Inline::plain(LIST_MARKER));
            inlines.extend(item.inlines.iter().cloned());

            let mut paragraph = self.role_paragraph(Role::Normal, &inlines);
            paragraph.alignment = Some(Alignment::Left);

            state.stats.list_item_count += 1;
            state.stats.count_text(&inlines_to_text(&item.inlines));
            state.push_paragraph(paragraph);
        }
    }

    fn code_block(&self, lines: &[String], state: &mut AssemblyState) {
        let style = self.styles.get(Role::ListingText);
        let spacing = paragraph_layout(style).spacing;

        for line in lines {
            state.push_paragraph(StyledParagraph {
                alignment: Some(Alignment::Left),
                spacing,
                runs: vec![Run::Text(StyledRun {
                    text: line.clone(),
                    font: style.font.family.clone(),
                    size_half_points: pt_to_half_points(style.font.size_pt),
                    bold: false,
                    italic: false,
                    all_caps: false,
                    color: style.font.color.clone(),
                })],
                ..StyledParagraph::default()
            });
            state.stats.code_line_count += 1;
        }
    }

    fn table(&self, rows: &[TableRow], state: &mut AssemblyState) {
        state.table_counter += 1;
        state.stats.table_count += 1;

        let caption = state
            .pending_caption
            .take()
            .unwrap_or_else(|| self.captions.default_caption(state.table_counter));
        state.push_paragraph(self.caption_paragraph(&caption));

        if let Some(table) = self.styled_table(rows) {
            state.children.push(Primitive::Table(table));
        }
    }

    async fn image(
        &self,
        src: &str,
        alt: &str,
        source_location: Option<&str>,
        resolver: &dyn ImageResolver,
        state: &mut AssemblyState,
    ) -> Result<()> {
        state.figure_counter += 1;
        state.stats.figure_count += 1;
        let number = state.figure_counter;
        let strings = &self.preset.strings;

        match resolver.resolve(source_location, src).await? {
            Some(resource) => {
                state.children.push(Primitive::Image(ImagePlacement {
                    resource,
                    alt: alt.to_string(),
                    width_px: IMAGE_WIDTH_PX,
                    height_px: IMAGE_HEIGHT_PX,
                }));
            }
            None => {
                let message = strings.image_not_found_message(src);
                let mut placeholder = self.role_paragraph(Role::Normal, &[Inline::plain(message)]);
                placeholder.first_line_indent = None;
                placeholder.alignment = Some(Alignment::Center);
                state.stats.missing_image_count += 1;
                state.push_paragraph(placeholder);
            }
        }

        let name = match file_stem(src) {
            "" => "image",
            stem => stem,
        };
        let caption = format!(
            "{} {}{}{}",
            strings.figure_label, number, strings.caption_separator, name
        );
        let mut paragraph = self.role_paragraph(Role::FigureCaption, &[Inline::plain(caption)]);
        paragraph.first_line_indent = None;
        state.push_paragraph(paragraph);

        Ok(())
    }

    /// Caption paragraph: upright prefix, italic remainder.
    ///
    /// Caption runs take only the family and size of the role font; the
    /// italic flag is set per run regardless of the role.
    fn caption_paragraph(&self, caption: &str) -> StyledParagraph {
        let style = self.styles.get(Role::TableCaption);
        let parts = self.captions.split(caption);
        let mut paragraph = paragraph_layout(style);
        paragraph.first_line_indent = None;

        if !parts.prefix.is_empty() {
            paragraph.runs.push(caption_run(&parts.prefix, &style.font, false));
        }
        if !parts.rest.is_empty() {
            paragraph.runs.push(caption_run(&parts.rest, &style.font, true));
        }
        paragraph
    }

    /// Bordered table; rows shorter than the widest row are padded with
    /// empty cells.
    fn styled_table(&self, rows: &[TableRow]) -> Option<StyledTable> {
        let columns = rows.iter().map(Vec::len).max()?;
        if columns == 0 {
            return None;
        }

        let rows: Vec<Vec<TableCell>> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let role = if i == 0 {
                    Role::TableHeaderText
                } else {
                    Role::TableText
                };
                (0..columns)
                    .map(|c| {
                        let inlines = row.get(c).map(Vec::as_slice).unwrap_or_default();
                        let mut paragraph = self.role_paragraph(role, inlines);
                        paragraph.first_line_indent = None;
                        TableCell {
                            paragraphs: vec![paragraph],
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Some(StyledTable {
            width_percent: 100,
            borders: TableBorders::uniform(Border::single()),
            rows,
        })
    }

    fn role_paragraph(&self, role: Role, inlines: &[Inline]) -> StyledParagraph {
        let style = self.styles.get(role);
        let mut paragraph = paragraph_layout(style);
        paragraph.runs = runs_from_inlines(inlines, &style.font);
        paragraph
    }

    fn build_document(&self, state: AssemblyState) -> OutputDocument {
        let preset = self.preset;
        let page = PageGeometry::from_preset(&preset.page, &preset.pagination);
        let mut sections = Vec::with_capacity(2);

        if self.options.include_toc {
            let mut title =
                self.role_paragraph(Role::TocTitle, &[Inline::plain(&preset.strings.toc_title)]);
            title.first_line_indent = None;
            title.alignment = Some(Alignment::Center);

            let toc = TocPlaceholder {
                title: preset.strings.toc_field_title.clone(),
                min_level: 1,
                max_level: 6,
                hyperlink: true,
            };
            sections.push(Section::new(
                page,
                vec![Primitive::Paragraph(title), Primitive::TableOfContents(toc)],
            ));
        }

        let mut main = Section::new(page, state.children);
        if self.options.enable_pagination {
            let position = preset.pagination.position;
            if let Some(alignment) = position.alignment() {
                let number = HeaderFooter::page_number(alignment);
                if position.is_top() {
                    main.header = Some(number);
                } else {
                    main.footer = Some(number);
                }
            }
            main.page_number_start = Some(preset.pagination.first_page_number());
        }
        sections.push(main);

        let body = &self.styles.get(Role::Normal).font;
        OutputDocument {
            title: None,
            default_font: DefaultFont {
                family: body.family.clone(),
                size_half_points: pt_to_half_points(body.size_pt),
            },
            sections,
            stats: state.stats,
        }
    }
}

/// Paragraph layout for a role, without runs.
///
/// The first-line indent is only set when positive.
pub fn paragraph_layout(style: &RoleStyle) -> StyledParagraph {
    let p = &style.paragraph;
    StyledParagraph {
        alignment: Some(p.alignment),
        first_line_indent: (p.first_line_indent_cm > 0.0)
            .then(|| cm_to_twips(p.first_line_indent_cm)),
        spacing: Some(Spacing {
            before: pt_to_twips(p.spacing_before_pt.unwrap_or(0.0)),
            after: pt_to_twips(p.spacing_after_pt.unwrap_or(0.0)),
            line: line_spacing_to_twips(p.line_spacing),
        }),
        page_break_before: p.page_break_before,
        keep_next: p.keep_with_next,
        keep_lines: p.keep_lines,
        heading_level: None,
        runs: Vec::new(),
    }
}

/// Runs for inline content under a role font.
///
/// Role bold/italic force the mark on every run. Code runs switch to a
/// monospace font two points smaller, but never below 10 pt.
pub fn runs_from_inlines(inlines: &[Inline], font: &FontSpec) -> Vec<Run> {
    inlines
        .iter()
        .map(|inline| {
            let marks = inline.marks();
            let (family, size_pt) = if marks.code {
                (CODE_FONT.to_string(), (font.size_pt - 2.0).max(MIN_CODE_SIZE_PT))
            } else {
                (font.family.clone(), font.size_pt)
            };
            Run::Text(StyledRun {
                text: inline.as_text().to_string(),
                font: family,
                size_half_points: pt_to_half_points(size_pt),
                bold: font.bold || marks.bold,
                italic: font.italic || marks.italic,
                all_caps: font.all_caps,
                color: font.color.clone(),
            })
        })
        .collect()
}

fn caption_run(text: &str, font: &FontSpec, italic: bool) -> Run {
    Run::Text(StyledRun {
        text: text.to_string(),
        font: font.family.clone(),
        size_half_points: pt_to_half_points(font.size_pt),
        bold: false,
        italic,
        all_caps: false,
        color: None,
    })
}
