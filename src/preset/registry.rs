//! Built-in and user preset lookup.

use super::{normalize, NormalizePolicy, StylePreset};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const BUILTIN_SOURCES: [&str; 2] = [
    include_str!("builtin/gost-r-7.0.97-2025.json"),
    include_str!("builtin/mirea-vkr-gost-r-7.0.91-2021.json"),
];

/// A preset stored in user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreset {
    /// Preset identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Raw, possibly partial, preset document
    #[serde(default)]
    pub preset: Value,
}

/// One entry of the preset picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetOption {
    /// Preset identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Whether the preset comes from user settings
    pub is_user: bool,
}

/// Lookup table over built-in presets and user presets.
///
/// User presets shadow built-ins with the same identifier.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    builtin: Vec<(String, String, Value)>,
    user: Vec<UserPreset>,
}

impl PresetRegistry {
    /// Load the embedded built-in presets.
    ///
    /// Each built-in must at least carry a string `id` and `name`.
    pub fn with_builtins() -> Result<Self> {
        let mut builtin = Vec::with_capacity(BUILTIN_SOURCES.len());
        for source in BUILTIN_SOURCES {
            let value: Value = serde_json::from_str(source)?;
            let id = value.get("id").and_then(Value::as_str);
            let name = value.get("name").and_then(Value::as_str);
            let (Some(id), Some(name)) = (id, name) else {
                return Err(Error::preset_invalid(
                    id.unwrap_or("unknown"),
                    vec!["id and name must be strings".to_string()],
                ));
            };
            builtin.push((id.to_string(), name.to_string(), value.clone()));
        }

        Ok(Self {
            builtin,
            user: Vec::new(),
        })
    }

    /// Add user presets from settings.
    pub fn with_user_presets(mut self, presets: impl IntoIterator<Item = UserPreset>) -> Self {
        self.user.extend(presets);
        self
    }

    /// Raw preset document for an identifier, user presets first.
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.user
            .iter()
            .find(|p| p.id == id)
            .map(|p| &p.preset)
            .or_else(|| {
                self.builtin
                    .iter()
                    .find(|(builtin_id, _, _)| builtin_id == id)
                    .map(|(_, _, value)| value)
            })
    }

    /// Look up and normalize a preset.
    pub fn resolve(&self, id: &str, policy: NormalizePolicy) -> Result<StylePreset> {
        let raw = self
            .get(id)
            .ok_or_else(|| Error::PresetNotFound(id.to_string()))?;
        log::debug!("resolving preset {}", id);
        normalize(raw, policy)
    }

    /// List presets for a picker, user presets first.
    pub fn options(&self) -> Vec<PresetOption> {
        let user = self.user.iter().map(|p| PresetOption {
            id: p.id.clone(),
            name: p.name.clone(),
            is_user: true,
        });
        let builtin = self.builtin.iter().map(|(id, name, _)| PresetOption {
            id: id.clone(),
            name: name.clone(),
            is_user: false,
        });
        user.chain(builtin).collect()
    }
}
