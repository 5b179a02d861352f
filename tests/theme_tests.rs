use habitual::models::CustomTheme;
use habitual::theme::{
    default_theme_colors, hsl_to_rgb, parse_hsl, predefined_themes, resolve, ColorSlot,
    ThemeColors, DEFAULT_THEME_ID,
};

#[test]
fn predefined_themes_are_complete_and_valid() {
    for theme in predefined_themes() {
        for slot in ColorSlot::ALL {
            let value = theme
                .colors
                .get(&slot)
                .unwrap_or_else(|| panic!("{}: missing slot {}", theme.id, slot));
            assert!(
                parse_hsl(value).is_some(),
                "{}: slot {} holds invalid HSL {:?}",
                theme.id,
                slot,
                value
            );
        }
    }
}

#[test]
fn predefined_ids_are_unique_and_default_comes_first() {
    let themes = predefined_themes();
    assert_eq!(themes[0].id, DEFAULT_THEME_ID);
    let mut ids: Vec<&str> = themes.iter().map(|t| t.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), themes.len());
}

#[test]
fn resolve_finds_predefined_themes() {
    let colors = resolve("default_dark", &[]);
    assert_eq!(
        colors.get(&ColorSlot::Background).map(|s| s.as_str()),
        Some("240 10% 3.9%")
    );
    for slot in ColorSlot::ALL {
        assert!(colors.contains_key(&slot));
    }
}

#[test]
fn resolve_merges_partial_custom_theme_over_defaults() {
    let mut colors = ThemeColors::new();
    colors.insert(ColorSlot::Background, "270 20% 12%".to_string());
    let custom = CustomTheme {
        id: "theme_abc".to_string(),
        name: "Dusk".to_string(),
        colors,
    };

    let resolved = resolve("theme_abc", &[custom]);
    assert_eq!(
        resolved.get(&ColorSlot::Background).map(|s| s.as_str()),
        Some("270 20% 12%")
    );
    // Unset slots fall back to the system default for that slot.
    let defaults = default_theme_colors();
    assert_eq!(
        resolved.get(&ColorSlot::Foreground),
        defaults.get(&ColorSlot::Foreground)
    );
    for slot in ColorSlot::ALL {
        assert!(parse_hsl(&resolved[&slot]).is_some());
    }
}

#[test]
fn resolve_falls_back_to_defaults_for_unknown_id() {
    // A stale reference to a deleted custom theme must not panic and must
    // still yield a complete color set.
    let resolved = resolve("theme_deleted", &[]);
    assert_eq!(resolved, default_theme_colors());
}

#[test]
fn parse_hsl_accepts_the_triple_format() {
    assert_eq!(parse_hsl("240 60% 94.1%"), Some((240.0, 60.0, 94.1)));
    assert_eq!(parse_hsl("0 0% 0%"), Some((0.0, 0.0, 0.0)));
    assert_eq!(parse_hsl("360 100% 100%"), Some((360.0, 100.0, 100.0)));
}

#[test]
fn parse_hsl_rejects_malformed_input() {
    assert_eq!(parse_hsl(""), None);
    assert_eq!(parse_hsl("240 60%"), None);
    assert_eq!(parse_hsl("240 60% 50% 10%"), None);
    assert_eq!(parse_hsl("240  60% 50%"), None); // double space
    assert_eq!(parse_hsl("abc 60% 50%"), None);
    assert_eq!(parse_hsl("240 60 50"), None); // missing %
    assert_eq!(parse_hsl("-10 60% 50%"), None);
    assert_eq!(parse_hsl("240 60.% 50%"), None);
    assert_eq!(parse_hsl("1240 60% 50%"), None);
}

#[test]
fn parse_hsl_enforces_component_ranges() {
    assert_eq!(parse_hsl("361 0% 0%"), None);
    assert_eq!(parse_hsl("0 101% 0%"), None);
    assert_eq!(parse_hsl("0 0% 100.5%"), None);
}

#[test]
fn hsl_to_rgb_hits_known_points() {
    assert_eq!(hsl_to_rgb(0.0, 0.0, 100.0), (255, 255, 255));
    assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), (0, 0, 0));
    assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), (255, 0, 0));
    assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), (0, 255, 0));
    assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), (0, 0, 255));
}

#[test]
fn slot_names_round_trip() {
    for slot in ColorSlot::ALL {
        assert_eq!(ColorSlot::from_name(slot.name()), Some(slot));
    }
    assert_eq!(ColorSlot::from_name("taskPendingBackground"), Some(ColorSlot::TaskPendingBackground));
    assert_eq!(ColorSlot::from_name("nope"), None);
}
