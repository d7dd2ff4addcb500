//! Export settings.
//!
//! Settings are a JSON document in which every field is optional:
//!
//! ```json
//! {
//!   "presetId": "gost-r-7.0.97-2025",
//!   "exportOptions": { "includeToc": true },
//!   "longTermStorage": false,
//!   "outputFolder": "Exports",
//!   "fileNameTemplate": "{title}",
//!   "userPresets": []
//! }
//! ```

use crate::error::Result;
use crate::preset::{NormalizePolicy, PresetRegistry, UserPreset};
use crate::render::ExportOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Preset used when settings name none.
pub const DEFAULT_PRESET_ID: &str = "gost-r-7.0.97-2025";

/// Folder exports are written to, relative to the storage root.
pub const DEFAULT_OUTPUT_FOLDER: &str = "Exports";

/// Output file name template; the encoder's extension is appended.
pub const DEFAULT_FILE_NAME_TEMPLATE: &str = "{title}";

/// User-level export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Selected preset identifier
    pub preset_id: String,

    /// Default export options
    pub export_options: ExportOptions,

    /// Replace the left margin with the long-term storage margin
    pub long_term_storage: bool,

    /// Presets defined by the user
    pub user_presets: Vec<UserPreset>,

    /// Destination folder for exported files
    pub output_folder: String,

    /// File name template with a `{title}` placeholder
    pub file_name_template: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset_id: DEFAULT_PRESET_ID.to_string(),
            export_options: ExportOptions::default(),
            long_term_storage: false,
            user_presets: Vec::new(),
            output_folder: DEFAULT_OUTPUT_FOLDER.to_string(),
            file_name_template: DEFAULT_FILE_NAME_TEMPLATE.to_string(),
        }
    }
}

impl Settings {
    /// Create default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        let settings = Self::from_json_str(&text)?;
        log::debug!(
            "loaded settings from {} (preset {}, {} user presets)",
            path.as_ref().display(),
            settings.preset_id,
            settings.user_presets.len()
        );
        Ok(settings)
    }

    /// Set the preset identifier.
    pub fn with_preset(mut self, id: impl Into<String>) -> Self {
        self.preset_id = id.into();
        self
    }

    /// Set the default export options.
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export_options = options;
        self
    }

    /// Enable the long-term storage margin policy.
    pub fn with_long_term_storage(mut self, enabled: bool) -> Self {
        self.long_term_storage = enabled;
        self
    }

    /// Set the output folder.
    pub fn with_output_folder(mut self, folder: impl Into<String>) -> Self {
        self.output_folder = folder.into();
        self
    }

    /// Set the file name template.
    pub fn with_file_name_template(mut self, template: impl Into<String>) -> Self {
        self.file_name_template = template.into();
        self
    }

    /// Normalization policy derived from these settings.
    pub fn policy(&self) -> NormalizePolicy {
        NormalizePolicy::new().with_long_term_storage(self.long_term_storage)
    }

    /// Preset registry with the built-ins and these settings' user presets.
    pub fn registry(&self) -> Result<PresetRegistry> {
        Ok(PresetRegistry::with_builtins()?.with_user_presets(self.user_presets.iter().cloned()))
    }
}
