//! Integration tests for preset normalization and lookup.

use gostdoc::preset::{
    normalize, normalize_preset, Alignment, NormalizePolicy, PagePosition, PresetRegistry,
    ResolvedStyles, Role, UserPreset,
};
use gostdoc::Error;
use serde_json::json;

#[test]
fn test_builtins_normalize_and_are_idempotent() {
    let registry = PresetRegistry::with_builtins().unwrap();
    for option in registry.options() {
        let once = registry.resolve(&option.id, NormalizePolicy::new()).unwrap();
        let twice = normalize_preset(&once, NormalizePolicy::new()).unwrap();
        assert_eq!(once, twice, "preset {} is not idempotent", option.id);
    }
}

#[test]
fn test_builtin_values() {
    let registry = PresetRegistry::with_builtins().unwrap();

    let gost = registry
        .resolve("gost-r-7.0.97-2025", NormalizePolicy::new())
        .unwrap();
    assert_eq!(gost.paragraph.line_spacing, 1.0);
    assert_eq!(gost.pagination.position, PagePosition::TopCenter);

    let mirea = registry
        .resolve("mirea-vkr-gost-r-7.0.91-2021", NormalizePolicy::new())
        .unwrap();
    assert_eq!(mirea.page.margins_mm.left, 30.0);
    assert_eq!(mirea.page.margins_mm.right, 15.0);
    assert_eq!(mirea.pagination.position, PagePosition::BottomCenter);
    assert_eq!(mirea.pagination.first_page_number(), 3);

    let styles = ResolvedStyles::synthesize(&mirea);
    assert!(styles.get(Role::Heading1).font.all_caps);
    assert!(styles.get(Role::Heading1).paragraph.page_break_before);
}

#[test]
fn test_user_presets_listed_first_and_shadow_builtins() {
    let registry = PresetRegistry::with_builtins()
        .unwrap()
        .with_user_presets([UserPreset {
            id: "gost-r-7.0.97-2025".into(),
            name: "Мой ГОСТ".into(),
            preset: json!({"font": {"family": "Arial"}}),
        }]);

    let options = registry.options();
    assert!(options[0].is_user);
    assert_eq!(options[0].name, "Мой ГОСТ");
    assert_eq!(options.len(), 3);

    let preset = registry
        .resolve("gost-r-7.0.97-2025", NormalizePolicy::new())
        .unwrap();
    assert_eq!(preset.font.family, "Arial");
}

#[test]
fn test_unknown_preset() {
    let registry = PresetRegistry::with_builtins().unwrap();
    let err = registry.resolve("nope", NormalizePolicy::new()).unwrap_err();
    assert!(matches!(err, Error::PresetNotFound(ref id) if id == "nope"));
    assert_eq!(err.user_message(), "The selected preset was not found.");
}

#[test]
fn test_all_violations_reported() {
    let err = normalize(
        &json!({
            "font": {"sizePt": 0},
            "paragraph": {"alignment": "diagonal", "lineSpacing": -1},
            "pagination": {"position": "middle"}
        }),
        NormalizePolicy::new(),
    )
    .unwrap_err();

    match err {
        Error::PresetInvalid { id, violations } => {
            assert_eq!(id, "custom");
            assert_eq!(violations.len(), 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_long_term_storage_overrides_left_margin() {
    let preset = normalize(
        &json!({"page": {"marginsMm": {"left": 25}}}),
        NormalizePolicy::new().with_long_term_storage(true),
    )
    .unwrap();
    assert_eq!(preset.page.margins_mm.left, 30.0);

    let preset = normalize(
        &json!({"page": {"marginsMm": {"left": 25}}}),
        NormalizePolicy::new(),
    )
    .unwrap();
    assert_eq!(preset.page.margins_mm.left, 25.0);
}

#[test]
fn test_role_fallbacks() {
    let preset = normalize(
        &json!({
            "styles": {
                "heading1": {"paragraph": {"alignment": "center"}}
            }
        }),
        NormalizePolicy::new(),
    )
    .unwrap();
    let styles = ResolvedStyles::synthesize(&preset);

    assert_eq!(styles.get(Role::Heading4).paragraph.alignment, Alignment::Center);
    assert_eq!(styles.get(Role::TableText).paragraph.alignment, Alignment::Justify);
    assert_eq!(styles.get(Role::TocTitle).paragraph.alignment, Alignment::Center);
}
