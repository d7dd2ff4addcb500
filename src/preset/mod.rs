//! Style presets.
//!
//! A preset is authored as a partial JSON document. [`normalize`] merges it
//! over the built-in defaults, applies the optional long-term storage policy
//! and validates the result into a typed [`StylePreset`].
//! [`ResolvedStyles::synthesize`] then expands the preset into a flat
//! role-to-style table for the assembler.

mod normalize;
mod registry;
mod styles;
mod types;

pub use normalize::{deep_merge, default_preset, normalize, normalize_preset, validate, NormalizePolicy};
pub use registry::{PresetOption, PresetRegistry, UserPreset};
pub use styles::{ResolvedStyles, Role, RoleStyle};
pub use types::{
    Alignment, FontSpec, Margins, PagePosition, PageSetup, PageSize, Pagination, ParagraphSpec,
    PresetStrings, StylePreset,
};
