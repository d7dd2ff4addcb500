//! Output encoders.
//!
//! An encoder turns an assembled [`OutputDocument`] into the bytes of a
//! file. The word-processing encoder is the primary target; the JSON encoder
//! dumps the primitive tree for inspection.
//!
//! # Example
//!
//! ```no_run
//! use gostdoc::encode::EncoderRegistry;
//!
//! let registry = EncoderRegistry::with_defaults();
//! let docx = registry.get("docx").unwrap();
//! assert_eq!(docx.extension(), "docx");
//! ```

mod docx;
mod json;

pub use docx::DocxEncoder;
pub use json::{JsonEncoder, JsonFormat};

use crate::error::EncodeError;
use crate::render::OutputDocument;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for output encoders.
///
/// Implement this trait to add a new output format.
pub trait DocumentEncoder: Send + Sync {
    /// Get the name of this encoder.
    fn name(&self) -> &str;

    /// File extension of the output, without the leading dot.
    fn extension(&self) -> &str;

    /// MIME type of the output.
    fn mime_type(&self) -> &str;

    /// Encode a document to bytes.
    fn encode(&self, doc: &OutputDocument) -> Result<Vec<u8>, EncodeError>;
}

/// Registry of encoders keyed by name.
pub struct EncoderRegistry {
    by_name: HashMap<String, Arc<dyn DocumentEncoder>>,
}

impl EncoderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the DOCX and JSON encoders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxEncoder::new()));
        registry.register(Arc::new(JsonEncoder::default()));
        registry
    }

    /// Register an encoder under its name.
    pub fn register(&mut self, encoder: Arc<dyn DocumentEncoder>) {
        self.by_name
            .insert(encoder.name().to_lowercase(), encoder);
    }

    /// Get an encoder by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn DocumentEncoder>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Names of every registered encoder, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = EncoderRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["docx", "json"]);
        assert!(registry.get("DOCX").is_some());
        assert!(registry.get("pdf").is_none());
    }

    #[test]
    fn test_encoder_metadata() {
        let registry = EncoderRegistry::with_defaults();
        let json = registry.get("json").unwrap();
        assert_eq!(json.extension(), "json");
        assert_eq!(json.mime_type(), "application/json");
    }
}
