//! End-to-end export of one note.
//!
//! The pipeline reads the note through a [`Storage`] backend, parses it,
//! resolves the selected preset, assembles the output tree, encodes it and
//! writes the result back into storage.
//!
//! # Example
//!
//! ```no_run
//! use gostdoc::config::Settings;
//! use gostdoc::export::Exporter;
//! use gostdoc::storage::FsStorage;
//!
//! # async fn run() -> gostdoc::Result<()> {
//! let storage = FsStorage::new("vault");
//! let exporter = Exporter::new(&storage, Settings::default())?;
//! let result = exporter.export_note(Some("Notes/Report.md")).await?;
//! println!("saved {}", result.output_path);
//! # Ok(())
//! # }
//! ```

mod file_name;

pub use file_name::{apply_file_name_template, sanitize_file_name, TITLE_PLACEHOLDER};

use crate::config::{Settings, DEFAULT_OUTPUT_FOLDER};
use crate::encode::{DocumentEncoder, DocxEncoder};
use crate::error::{Error, Result};
use crate::parser;
use crate::preset::{PresetRegistry, StylePreset};
use crate::render::{assemble, AssemblyStats, ExportOptions, OutputDocument};
use crate::storage::{file_stem, join_vault_path, Storage, StorageImageResolver};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a successful export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    /// Storage path of the written file
    pub output_path: String,

    /// File name of the written file
    pub output_file_name: String,

    /// Size of the encoded output in bytes
    pub size: usize,

    /// Assembly statistics
    pub stats: AssemblyStats,
}

/// Runs exports against one storage backend.
///
/// Every call builds its own assembly state, so one exporter can serve
/// several exports concurrently.
pub struct Exporter<'s> {
    storage: &'s dyn Storage,
    settings: Settings,
    registry: PresetRegistry,
    encoder: Arc<dyn DocumentEncoder>,
}

impl<'s> Exporter<'s> {
    /// Create an exporter writing `.docx` files.
    pub fn new(storage: &'s dyn Storage, settings: Settings) -> Result<Self> {
        let registry = settings.registry()?;
        Ok(Self {
            storage,
            settings,
            registry,
            encoder: Arc::new(DocxEncoder::new()),
        })
    }

    /// Use a different encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn DocumentEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Override the export options from settings.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.settings.export_options = options;
        self
    }

    /// Select a preset by identifier.
    pub fn with_preset(mut self, id: impl Into<String>) -> Self {
        self.settings.preset_id = id.into();
        self
    }

    /// Get the settings in effect.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the preset registry.
    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    /// Resolve the selected preset.
    pub fn preset(&self) -> Result<StylePreset> {
        self.registry
            .resolve(&self.settings.preset_id, self.settings.policy())
    }

    /// Parse and assemble a note without encoding it.
    pub async fn render_note(&self, source_path: Option<&str>) -> Result<OutputDocument> {
        let source_path = match source_path.map(str::trim) {
            Some(path) if !path.is_empty() => path,
            _ => return Err(Error::NoSourceDocument),
        };

        let preset = self.preset()?;

        let text = self
            .storage
            .read_text(source_path)
            .await
            .map_err(|source| Error::SourceUnreadable {
                path: source_path.to_string(),
                source,
            })?;

        let model = parser::parse(&text);
        if model.is_empty() {
            return Err(Error::EmptyDocument);
        }
        log::debug!("parsed {} blocks from {}", model.len(), source_path);

        let resolver = StorageImageResolver::new(self.storage);
        let doc = assemble(
            &model,
            &preset,
            &self.settings.export_options,
            Some(source_path),
            &resolver,
        )
        .await?;

        Ok(doc.with_title(file_stem(source_path)))
    }

    /// Export a note and write the result to the output folder.
    pub async fn export_note(&self, source_path: Option<&str>) -> Result<ExportResult> {
        let doc = self.render_note(source_path).await?;
        let title = doc.title.clone().unwrap_or_default();

        let bytes = self.encoder.encode(&doc).map_err(Error::EncodingFailed)?;

        let folder = match self.settings.output_folder.trim() {
            "" => DEFAULT_OUTPUT_FOLDER,
            f => f,
        };
        let folder_path = join_vault_path(&[folder]);
        let file_name = apply_file_name_template(
            &self.settings.file_name_template,
            &title,
            self.encoder.extension(),
        );
        let output_path = join_vault_path(&[&folder_path, &file_name]);

        self.persist(&folder_path, &output_path, &bytes).await?;
        log::debug!(
            "exported {} with {} encoder ({} bytes)",
            output_path,
            self.encoder.name(),
            bytes.len()
        );

        Ok(ExportResult {
            output_path,
            output_file_name: file_name,
            size: bytes.len(),
            stats: doc.stats,
        })
    }

    async fn persist(&self, folder: &str, path: &str, bytes: &[u8]) -> Result<()> {
        self.storage
            .ensure_folder(folder)
            .await
            .map_err(|source| Error::PersistFailed {
                path: folder.to_string(),
                source,
            })?;
        self.storage
            .write_binary(path, bytes)
            .await
            .map_err(|source| Error::PersistFailed {
                path: path.to_string(),
                source,
            })
    }
}
