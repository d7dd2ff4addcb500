//! Preset normalization: merge over defaults, apply policy, validate.

use super::{Alignment, PagePosition, PageSize, Role, StylePreset};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

static DEFAULT_PRESET: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("defaults.json")).expect("embedded default preset is valid JSON")
});

/// Built-in default preset every raw preset is merged over.
pub fn default_preset() -> &'static Value {
    &DEFAULT_PRESET
}

/// Policy flags applied once, before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizePolicy {
    /// Use the preset's long-term storage left margin
    pub long_term_storage: bool,
}

impl NormalizePolicy {
    /// Create a policy with every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the long-term storage margin.
    pub fn with_long_term_storage(mut self, enabled: bool) -> Self {
        self.long_term_storage = enabled;
        self
    }
}

/// Recursively merge `patch` over `base`.
///
/// Keys holding objects on both sides are merged; any other value in
/// `patch` replaces the base value. A non-object `patch` leaves `base`
/// unchanged.
pub fn deep_merge(base: &Value, patch: &Value) -> Value {
    let (Value::Object(base_map), Value::Object(patch_map)) = (base, patch) else {
        return base.clone();
    };

    let mut out = base_map.clone();
    for (key, value) in patch_map {
        let merged = match out.get(key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                deep_merge(existing, value)
            }
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    Value::Object(out)
}

/// Normalize a raw, possibly partial, preset document.
///
/// Fails with [`Error::PresetInvalid`] carrying every violation found.
/// Normalizing an already normalized preset yields the same preset.
pub fn normalize(raw: &Value, policy: NormalizePolicy) -> Result<StylePreset> {
    if !raw.is_object() {
        return Err(Error::preset_invalid(
            "unknown",
            vec!["preset must be an object".to_string()],
        ));
    }

    let mut merged = deep_merge(default_preset(), raw);
    if policy.long_term_storage {
        apply_long_term_storage(&mut merged);
    }
    complete_roles(&mut merged);

    let id = merged
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let violations = validate(&merged);
    if !violations.is_empty() {
        log::warn!("preset {} rejected: {} violation(s)", id, violations.len());
        return Err(Error::preset_invalid(id, violations));
    }

    serde_json::from_value(merged).map_err(|e| Error::preset_invalid(id, vec![e.to_string()]))
}

/// Re-normalize a typed preset, e.g. to apply a policy to a stored preset.
pub fn normalize_preset(preset: &StylePreset, policy: NormalizePolicy) -> Result<StylePreset> {
    normalize(&serde_json::to_value(preset)?, policy)
}

fn apply_long_term_storage(preset: &mut Value) {
    let Some(page) = preset.get_mut("page").and_then(Value::as_object_mut) else {
        return;
    };
    let Some(margin) = page.get("longTermStorageLeftMarginMm").cloned() else {
        return;
    };
    if let Some(margins) = page.get_mut("marginsMm").and_then(Value::as_object_mut) {
        log::debug!("long-term storage policy: left margin {}", margin);
        margins.insert("left".to_string(), margin);
    }
}

/// Merge each declared role over the top-level font and paragraph, dropping
/// unknown role names.
fn complete_roles(preset: &mut Value) {
    let base = json!({
        "font": preset.get("font").cloned().unwrap_or(Value::Null),
        "paragraph": preset.get("paragraph").cloned().unwrap_or(Value::Null),
    });

    let Some(styles) = preset.get_mut("styles").and_then(Value::as_object_mut) else {
        return;
    };

    styles.retain(|name, _| {
        let known = Role::from_name(name).is_some();
        if !known {
            log::warn!("ignoring unknown style role \"{}\"", name);
        }
        known
    });

    for style in styles.values_mut() {
        if style.is_object() {
            *style = deep_merge(&base, style);
        }
    }
}

/// Collected validation failures.
#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn push(&mut self, message: String) {
        self.0.push(message);
    }

    fn object<'v>(&mut self, value: Option<&'v Value>, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Some(Value::Object(map)) => Some(map),
            _ => {
                self.push(format!("{path} must be an object"));
                None
            }
        }
    }

    fn string(&mut self, value: Option<&Value>, path: &str, allow_empty: bool) {
        match value.and_then(Value::as_str) {
            Some(s) if allow_empty || !s.trim().is_empty() => {}
            Some(_) => self.push(format!("{path} must not be empty")),
            None => self.push(format!("{path} must be a string")),
        }
    }

    fn optional_string(&mut self, value: Option<&Value>, path: &str) {
        if value.is_some() {
            self.string(value, path, true);
        }
    }

    fn non_negative(&mut self, value: Option<&Value>, path: &str) {
        match value.and_then(Value::as_f64) {
            Some(n) if n >= 0.0 => {}
            _ => self.push(format!("{path} must be a non-negative number")),
        }
    }

    fn positive(&mut self, value: Option<&Value>, path: &str) {
        match value.and_then(Value::as_f64) {
            Some(n) if n > 0.0 => {}
            _ => self.push(format!("{path} must be a positive number")),
        }
    }

    fn optional_non_negative(&mut self, value: Option<&Value>, path: &str) {
        if value.is_some() {
            self.non_negative(value, path);
        }
    }

    fn optional_bool(&mut self, value: Option<&Value>, path: &str) {
        if value.is_some_and(|v| !v.is_boolean()) {
            self.push(format!("{path} must be a boolean"));
        }
    }

    fn one_of(&mut self, value: Option<&Value>, path: &str, allowed: &[&str]) {
        match value.and_then(Value::as_str) {
            Some(s) if allowed.contains(&s) => {}
            _ => self.push(format!("{path} must be one of: {}", allowed.join(", "))),
        }
    }

    fn font(&mut self, value: Option<&Value>, path: &str) {
        let Some(font) = self.object(value, path) else {
            return;
        };
        self.string(font.get("family"), &format!("{path}.family"), false);
        self.positive(font.get("sizePt"), &format!("{path}.sizePt"));
        for flag in ["bold", "italic", "allCaps"] {
            self.optional_bool(font.get(flag), &format!("{path}.{flag}"));
        }
        self.optional_string(font.get("color"), &format!("{path}.color"));
    }

    fn paragraph(&mut self, value: Option<&Value>, path: &str) {
        let Some(paragraph) = self.object(value, path) else {
            return;
        };
        self.one_of(
            paragraph.get("alignment"),
            &format!("{path}.alignment"),
            &Alignment::NAMES,
        );
        self.non_negative(
            paragraph.get("firstLineIndentCm"),
            &format!("{path}.firstLineIndentCm"),
        );
        self.positive(paragraph.get("lineSpacing"), &format!("{path}.lineSpacing"));
        for key in ["spacingBeforePt", "spacingAfterPt"] {
            self.optional_non_negative(paragraph.get(key), &format!("{path}.{key}"));
        }
        for flag in ["pageBreakBefore", "keepWithNext", "keepLines"] {
            self.optional_bool(paragraph.get(flag), &format!("{path}.{flag}"));
        }
    }
}

/// Check a merged preset document, returning every violation found.
pub fn validate(preset: &Value) -> Vec<String> {
    let mut v = Violations::default();

    if !preset.is_object() {
        v.push("preset must be an object".to_string());
        return v.0;
    }

    v.string(preset.get("id"), "id", false);
    v.string(preset.get("name"), "name", false);

    if let Some(page) = v.object(preset.get("page"), "page") {
        if page.contains_key("size") {
            v.one_of(page.get("size"), "page.size", &PageSize::NAMES);
        }
        if let Some(margins) = v.object(page.get("marginsMm"), "page.marginsMm") {
            for side in ["top", "bottom", "left", "right"] {
                v.non_negative(margins.get(side), &format!("page.marginsMm.{side}"));
            }
        }
        v.optional_non_negative(
            page.get("longTermStorageLeftMarginMm"),
            "page.longTermStorageLeftMarginMm",
        );
    }

    v.font(preset.get("font"), "font");
    v.paragraph(preset.get("paragraph"), "paragraph");

    if let Some(pagination) = v.object(preset.get("pagination"), "pagination") {
        v.one_of(
            pagination.get("position"),
            "pagination.position",
            &PagePosition::NAMES,
        );
        v.non_negative(pagination.get("offsetFromTopMm"), "pagination.offsetFromTopMm");
        if pagination
            .get("startAt")
            .is_some_and(|n| n.as_i64().is_none())
        {
            v.push("pagination.startAt must be an integer".to_string());
        }
        if pagination
            .get("skipFirstPages")
            .is_some_and(|n| n.as_u64().and_then(|n| u32::try_from(n).ok()).is_none())
        {
            v.push("pagination.skipFirstPages must be a non-negative integer".to_string());
        }
    }

    if let Some(strings) = v.object(preset.get("strings"), "strings") {
        for key in ["tocTitle", "tocFieldTitle", "tableLabel", "figureLabel"] {
            v.string(strings.get(key), &format!("strings.{key}"), false);
        }
        for key in ["captionSeparator", "imageNotFound"] {
            v.string(strings.get(key), &format!("strings.{key}"), true);
        }
    }

    if let Some(styles) = preset.get("styles") {
        if let Some(styles) = v.object(Some(styles), "styles") {
            for (role, style) in styles {
                let path = format!("styles.{role}");
                if v.object(Some(style), &path).is_some() {
                    v.font(style.get("font"), &format!("{path}.font"));
                    v.paragraph(style.get("paragraph"), &format!("{path}.paragraph"));
                }
            }
        }
    }

    v.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(default_preset()).is_empty());
        let preset = normalize(&json!({}), NormalizePolicy::new()).unwrap();
        assert_eq!(preset.id, "custom");
        assert_eq!(preset.font.family, "Times New Roman");
        assert_eq!(preset.font.size_pt, 14.0);
        assert_eq!(preset.paragraph.alignment, Alignment::Justify);
        assert_eq!(preset.paragraph.first_line_indent_cm, 1.25);
        assert_eq!(preset.page.margins_mm.right, 10.0);
        assert_eq!(preset.pagination.position, PagePosition::TopCenter);
        assert!(preset.styles.is_empty());
    }

    #[test]
    fn test_deep_merge() {
        let base = json!({"a": {"x": 1, "y": 2}, "b": [1, 2], "c": "keep"});
        let patch = json!({"a": {"y": 3}, "b": [9]});
        assert_eq!(
            deep_merge(&base, &patch),
            json!({"a": {"x": 1, "y": 3}, "b": [9], "c": "keep"})
        );
        assert_eq!(deep_merge(&base, &json!(42)), base);
        assert_eq!(
            deep_merge(&json!({"a": {"x": 1}}), &json!({"a": null})),
            json!({"a": null})
        );
    }

    #[test]
    fn test_partial_override() {
        let raw = json!({
            "id": "mine",
            "name": "Mine",
            "font": {"sizePt": 12},
            "page": {"marginsMm": {"left": 25}}
        });
        let preset = normalize(&raw, NormalizePolicy::new()).unwrap();
        assert_eq!(preset.font.size_pt, 12.0);
        assert_eq!(preset.font.family, "Times New Roman");
        assert_eq!(preset.page.margins_mm.left, 25.0);
        assert_eq!(preset.page.margins_mm.top, 20.0);
    }

    #[test]
    fn test_violations_are_aggregated() {
        let raw = json!({
            "font": {"sizePt": 0},
            "paragraph": {"alignment": "diagonal"},
            "pagination": {"position": "middle"},
            "page": {"marginsMm": {"top": -1}}
        });
        let err = normalize(&raw, NormalizePolicy::new()).unwrap_err();
        let Error::PresetInvalid { id, violations } = err else {
            panic!("expected PresetInvalid");
        };
        assert_eq!(id, "custom");
        assert_eq!(violations.len(), 4);
        assert!(violations.iter().any(|v| v.starts_with("font.sizePt")));
        assert!(violations.iter().any(|v| v.starts_with("paragraph.alignment")));
        assert!(violations.iter().any(|v| v.starts_with("pagination.position")));
        assert!(violations.iter().any(|v| v.starts_with("page.marginsMm.top")));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            normalize(&json!([1, 2]), NormalizePolicy::new()),
            Err(Error::PresetInvalid { .. })
        ));
    }

    #[test]
    fn test_long_term_storage_policy() {
        let policy = NormalizePolicy::new().with_long_term_storage(true);
        let preset = normalize(&json!({}), policy).unwrap();
        assert_eq!(preset.page.margins_mm.left, 30.0);

        let raw = json!({"page": {"longTermStorageLeftMarginMm": 35}});
        let preset = normalize(&raw, policy).unwrap();
        assert_eq!(preset.page.margins_mm.left, 35.0);
    }

    #[test]
    fn test_roles_completed_and_unknown_dropped() {
        let raw = json!({
            "styles": {
                "heading1": {"font": {"bold": true}},
                "sidebar": {"font": {"sizePt": 9}}
            }
        });
        let preset = normalize(&raw, NormalizePolicy::new()).unwrap();
        assert_eq!(preset.styles.len(), 1);
        let h1 = &preset.styles[&Role::Heading1];
        assert!(h1.font.bold);
        assert_eq!(h1.font.family, "Times New Roman");
        assert_eq!(h1.paragraph.line_spacing, 1.5);
    }

    #[test]
    fn test_invalid_role_style_reported() {
        let raw = json!({"styles": {"tableText": {"font": {"sizePt": -2}}}});
        let err = normalize(&raw, NormalizePolicy::new()).unwrap_err();
        assert!(err.to_string().contains("styles.tableText.font.sizePt"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = json!({
            "id": "x",
            "name": "X",
            "pagination": {"position": "bottom-right", "startAt": 3},
            "styles": {"heading2": {"paragraph": {"alignment": "center"}}}
        });
        let once = normalize(&raw, NormalizePolicy::new()).unwrap();
        let twice = normalize_preset(&once, NormalizePolicy::new()).unwrap();
        assert_eq!(once, twice);
    }
}
