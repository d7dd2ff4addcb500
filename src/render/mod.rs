//! Document assembly.
//!
//! [`assemble`] walks a [`DocumentModel`](crate::model::DocumentModel) once,
//! resolving each block to styled output primitives under a
//! [`StylePreset`](crate::preset::StylePreset), and lays the result out in
//! sections ready for an [`encoder`](crate::encode).

mod assembler;
mod caption;
mod options;
mod output;
mod stats;

pub use assembler::{assemble, paragraph_layout, runs_from_inlines, Assembler};
pub use caption::{CaptionParts, CaptionPattern};
pub use options::{ExportOptions, IMAGE_HEIGHT_PX, IMAGE_WIDTH_PX};
pub use output::{
    Border, BorderStyle, DefaultFont, HeaderFooter, ImagePlacement, OutputDocument, PageGeometry,
    Primitive, Run, Section, Spacing, StyledParagraph, StyledRun, StyledTable, TableBorders,
    TableCell, TableEdge, TocPlaceholder,
};
pub use stats::AssemblyStats;
