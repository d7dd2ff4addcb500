//! Error types for gostdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for gostdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while exporting a document.
///
/// Every variant is terminal for the export attempt that produced it; nothing
/// is retried internally.
#[derive(Error, Debug)]
pub enum Error {
    /// The style preset failed validation after defaults were applied.
    #[error("Invalid preset \"{id}\": {}", .violations.join("; "))]
    PresetInvalid {
        /// Preset identifier (or "unknown" when absent)
        id: String,
        /// Every violation found, in document order
        violations: Vec<String>,
    },

    /// The requested preset identifier does not resolve.
    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    /// There is no source document to export.
    #[error("No source document to export")]
    NoSourceDocument,

    /// The source document exists but could not be read.
    #[error("Cannot read source document {path}: {source}")]
    SourceUnreadable {
        /// Storage path of the source document
        path: String,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// An image exists in storage but could not be read.
    #[error("Cannot read image {path}: {source}")]
    ImageUnreadable {
        /// Storage path of the image
        path: String,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Parsing produced no blocks.
    #[error("Document is empty, nothing to export")]
    EmptyDocument,

    /// The output encoder failed.
    #[error("Failed to encode document: {0}")]
    EncodingFailed(#[source] EncodeError),

    /// Writing the output or creating its folder failed.
    #[error("Failed to save {path}: {source}")]
    PersistFailed {
        /// Destination path
        path: String,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// I/O error when reading configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in a preset or settings document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a preset validation failure.
    pub fn preset_invalid(id: impl Into<String>, violations: Vec<String>) -> Self {
        Error::PresetInvalid {
            id: id.into(),
            violations,
        }
    }

    /// Short, human-readable message for the caller-facing layer.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::PresetNotFound(_) => "The selected preset was not found.",
            Error::PresetInvalid { .. } => "The selected preset is invalid.",
            Error::NoSourceDocument => "There is no note to export.",
            Error::SourceUnreadable { .. } => "The note could not be read.",
            Error::ImageUnreadable { .. } => "An embedded image could not be read.",
            Error::EmptyDocument => "The note is empty, nothing to export.",
            Error::EncodingFailed(_) => "Failed to build the Word document.",
            Error::PersistFailed { .. } => "Failed to save the exported file.",
            Error::Io(_) | Error::Json(_) => "Unknown error.",
        }
    }
}

/// Failures raised by an output encoder.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Error building or packing the word-processing document.
    #[error("document build error: {0}")]
    Docx(#[from] docx_rs::DocxError),

    /// I/O error while writing encoder output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
