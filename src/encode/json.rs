//! JSON encoder: the assembled primitive tree as a JSON document.

use super::DocumentEncoder;
use crate::error::EncodeError;
use crate::render::OutputDocument;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without whitespace
    Compact,
}

/// Encoder writing the output tree as JSON. Image bytes are omitted.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    format: JsonFormat,
}

impl JsonEncoder {
    /// Create a JSON encoder.
    pub fn new(format: JsonFormat) -> Self {
        Self { format }
    }
}

impl DocumentEncoder for JsonEncoder {
    fn name(&self) -> &str {
        "json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn mime_type(&self) -> &str {
        "application/json"
    }

    fn encode(&self, doc: &OutputDocument) -> Result<Vec<u8>, EncodeError> {
        let bytes = match self.format {
            JsonFormat::Pretty => serde_json::to_vec_pretty(doc)?,
            JsonFormat::Compact => serde_json::to_vec(doc)?,
        };
        Ok(bytes)
    }
}
