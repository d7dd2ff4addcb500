//! # gostdoc
//!
//! Export Markdown notes to Word documents formatted by GOST-style presets.
//!
//! The pipeline has four stages:
//!
//! 1. [`parser`] turns note text into a [`DocumentModel`] of blocks.
//! 2. [`preset`] merges a partial style preset over the defaults and
//!    validates it into a [`StylePreset`].
//! 3. [`render`] assembles the model into sections of styled primitives,
//!    numbering tables and figures and capturing table captions.
//! 4. [`encode`] writes the primitive tree as a `.docx` package (or JSON).
//!
//! [`export::Exporter`] wires the stages to a [`storage::Storage`] backend.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gostdoc::{default_preset, markdown_to_docx, normalize, ExportOptions, NormalizePolicy};
//!
//! # async fn run() -> gostdoc::Result<()> {
//! let preset = normalize(default_preset(), NormalizePolicy::new())?;
//! let options = ExportOptions::new().with_toc(true);
//! let bytes = markdown_to_docx("# Введение\n\nТекст.", &preset, &options).await?;
//! std::fs::write("out.docx", bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encode;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod preset;
pub mod render;
pub mod storage;
pub mod units;

// Re-export commonly used types
pub use config::Settings;
pub use encode::{DocumentEncoder, DocxEncoder, EncoderRegistry, JsonEncoder, JsonFormat};
pub use error::{EncodeError, Error, Result};
pub use export::{apply_file_name_template, ExportResult, Exporter};
pub use model::{Block, DocumentModel, ImageResource, Inline, Marks, TextRun};
pub use parser::{parse, parse_inlines};
pub use preset::{
    default_preset, normalize, NormalizePolicy, PresetRegistry, ResolvedStyles, Role,
    StylePreset,
};
pub use render::{assemble, AssemblyStats, ExportOptions, OutputDocument};
pub use storage::{FsStorage, MemoryStorage, Storage, StorageImageResolver};

/// Convert Markdown text to `.docx` bytes.
///
/// There is no storage behind the text, so every image becomes a
/// not-found placeholder. Use [`Exporter`] to embed images.
///
/// # Example
///
/// ```no_run
/// use gostdoc::{markdown_to_docx, ExportOptions, PresetRegistry, NormalizePolicy};
///
/// # async fn run() -> gostdoc::Result<()> {
/// let registry = PresetRegistry::with_builtins()?;
/// let preset = registry.resolve("gost-r-7.0.97-2025", NormalizePolicy::new())?;
/// let bytes = markdown_to_docx("Текст", &preset, &ExportOptions::default()).await?;
/// assert!(!bytes.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn markdown_to_docx(
    text: &str,
    preset: &StylePreset,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    let model = parser::parse(text);
    if model.is_empty() {
        return Err(Error::EmptyDocument);
    }

    let storage = MemoryStorage::new();
    let resolver = StorageImageResolver::new(&storage);
    let doc = assemble(&model, preset, options, None, &resolver).await?;

    DocxEncoder::new()
        .encode(&doc)
        .map_err(Error::EncodingFailed)
}
