use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CustomTheme, PredefinedTheme};

/// Identifier of the canonical default theme. Unknown or stale theme
/// identifiers resolve to this palette.
pub const DEFAULT_THEME_ID: &str = "default_light";

/// The fixed schema of named color slots every resolved theme fills.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "camelCase")]
pub enum ColorSlot {
    Background,
    Foreground,
    Card,
    CardForeground,
    Popover,
    PopoverForeground,
    Primary,
    PrimaryForeground,
    Secondary,
    SecondaryForeground,
    Muted,
    MutedForeground,
    Accent,
    AccentForeground,
    Destructive,
    DestructiveForeground,
    Border,
    Input,
    Ring,
    TaskPendingBackground,
    TaskCompletedBackground,
}

impl ColorSlot {
    /// Every slot, in schema order.
    pub const ALL: [ColorSlot; 21] = [
        ColorSlot::Background,
        ColorSlot::Foreground,
        ColorSlot::Card,
        ColorSlot::CardForeground,
        ColorSlot::Popover,
        ColorSlot::PopoverForeground,
        ColorSlot::Primary,
        ColorSlot::PrimaryForeground,
        ColorSlot::Secondary,
        ColorSlot::SecondaryForeground,
        ColorSlot::Muted,
        ColorSlot::MutedForeground,
        ColorSlot::Accent,
        ColorSlot::AccentForeground,
        ColorSlot::Destructive,
        ColorSlot::DestructiveForeground,
        ColorSlot::Border,
        ColorSlot::Input,
        ColorSlot::Ring,
        ColorSlot::TaskPendingBackground,
        ColorSlot::TaskCompletedBackground,
    ];

    /// The slot's name as it appears in the persisted blob and on the CLI.
    pub fn name(self) -> &'static str {
        match self {
            ColorSlot::Background => "background",
            ColorSlot::Foreground => "foreground",
            ColorSlot::Card => "card",
            ColorSlot::CardForeground => "cardForeground",
            ColorSlot::Popover => "popover",
            ColorSlot::PopoverForeground => "popoverForeground",
            ColorSlot::Primary => "primary",
            ColorSlot::PrimaryForeground => "primaryForeground",
            ColorSlot::Secondary => "secondary",
            ColorSlot::SecondaryForeground => "secondaryForeground",
            ColorSlot::Muted => "muted",
            ColorSlot::MutedForeground => "mutedForeground",
            ColorSlot::Accent => "accent",
            ColorSlot::AccentForeground => "accentForeground",
            ColorSlot::Destructive => "destructive",
            ColorSlot::DestructiveForeground => "destructiveForeground",
            ColorSlot::Border => "border",
            ColorSlot::Input => "input",
            ColorSlot::Ring => "ring",
            ColorSlot::TaskPendingBackground => "taskPendingBackground",
            ColorSlot::TaskCompletedBackground => "taskCompletedBackground",
        }
    }

    /// Looks a slot up by its blob/CLI name.
    pub fn from_name(name: &str) -> Option<ColorSlot> {
        ColorSlot::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl std::fmt::Display for ColorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of theme colors, slot -> `"H S% L%"`. Resolved themes hold every
/// slot; custom themes hold only the slots the user overrode.
pub type ThemeColors = BTreeMap<ColorSlot, String>;

fn color_set(pairs: &[(ColorSlot, &str)]) -> ThemeColors {
    pairs
        .iter()
        .map(|(slot, value)| (*slot, (*value).to_string()))
        .collect()
}

/// The absolute system defaults. Every resolution starts from this set, so a
/// resolved theme can never be missing a slot.
pub fn default_theme_colors() -> ThemeColors {
    color_set(&[
        (ColorSlot::Background, "0 0% 96.1%"),
        (ColorSlot::Foreground, "240 10% 10%"),
        (ColorSlot::Card, "0 0% 100%"),
        (ColorSlot::CardForeground, "240 10% 10%"),
        (ColorSlot::Popover, "0 0% 100%"),
        (ColorSlot::PopoverForeground, "240 10% 10%"),
        (ColorSlot::Primary, "240 60% 94.1%"),
        (ColorSlot::PrimaryForeground, "240 20% 25%"),
        (ColorSlot::Secondary, "240 30% 90%"),
        (ColorSlot::SecondaryForeground, "240 15% 20%"),
        (ColorSlot::Muted, "240 20% 92%"),
        (ColorSlot::MutedForeground, "240 10% 45%"),
        (ColorSlot::Accent, "300 26% 86%"),
        (ColorSlot::AccentForeground, "300 20% 25%"),
        (ColorSlot::Destructive, "0 84.2% 60.2%"),
        (ColorSlot::DestructiveForeground, "0 0% 98%"),
        (ColorSlot::Border, "240 20% 85%"),
        (ColorSlot::Input, "240 25% 92%"),
        (ColorSlot::Ring, "300 40% 75%"),
        (ColorSlot::TaskPendingBackground, "0 0% 92%"),
        (ColorSlot::TaskCompletedBackground, "120 70% 90%"),
    ])
}

fn over_defaults(overrides: &[(ColorSlot, &str)]) -> ThemeColors {
    let mut colors = default_theme_colors();
    colors.extend(color_set(overrides));
    colors
}

/// The themes shipped with the application, `default_light` first.
pub fn predefined_themes() -> Vec<PredefinedTheme> {
    vec![
        PredefinedTheme {
            id: DEFAULT_THEME_ID,
            name: "Default Light",
            colors: default_theme_colors(),
        },
        PredefinedTheme {
            id: "default_dark",
            name: "Default Dark",
            colors: over_defaults(&[
                (ColorSlot::Background, "240 10% 3.9%"),
                (ColorSlot::Foreground, "0 0% 98%"),
                (ColorSlot::Card, "240 10% 3.9%"),
                (ColorSlot::CardForeground, "0 0% 98%"),
                (ColorSlot::Popover, "240 10% 3.9%"),
                (ColorSlot::PopoverForeground, "0 0% 98%"),
                (ColorSlot::Primary, "240 60% 85%"),
                (ColorSlot::PrimaryForeground, "240 10% 15%"),
                (ColorSlot::Secondary, "240 10% 14.9%"),
                (ColorSlot::SecondaryForeground, "0 0% 98%"),
                (ColorSlot::Muted, "240 10% 14.9%"),
                (ColorSlot::MutedForeground, "0 0% 63.9%"),
                (ColorSlot::Accent, "300 30% 70%"),
                (ColorSlot::AccentForeground, "0 0% 98%"),
                (ColorSlot::Destructive, "0 62.8% 30.6%"),
                (ColorSlot::DestructiveForeground, "0 0% 98%"),
                (ColorSlot::Border, "240 10% 14.9%"),
                (ColorSlot::Input, "240 10% 14.9%"),
                (ColorSlot::Ring, "300 40% 65%"),
                (ColorSlot::TaskPendingBackground, "240 5% 18%"),
                (ColorSlot::TaskCompletedBackground, "120 40% 22%"),
            ]),
        },
        PredefinedTheme {
            id: "sky_blue",
            name: "Sky Blue",
            colors: over_defaults(&[
                (ColorSlot::Background, "210 40% 98%"),
                (ColorSlot::Foreground, "210 40% 10%"),
                (ColorSlot::Card, "207 60% 97%"),
                (ColorSlot::CardForeground, "210 40% 10%"),
                (ColorSlot::Popover, "207 60% 97%"),
                (ColorSlot::PopoverForeground, "210 40% 10%"),
                (ColorSlot::Primary, "207 90% 54%"),
                (ColorSlot::PrimaryForeground, "0 0% 100%"),
                (ColorSlot::Accent, "187 70% 40%"),
                (ColorSlot::AccentForeground, "0 0% 100%"),
                (ColorSlot::Border, "210 30% 90%"),
                (ColorSlot::Input, "210 30% 95%"),
                (ColorSlot::Ring, "207 90% 60%"),
                (ColorSlot::TaskPendingBackground, "210 50% 92%"),
                (ColorSlot::TaskCompletedBackground, "130 60% 90%"),
            ]),
        },
        PredefinedTheme {
            id: "cheery_yellow",
            name: "Cheery Yellow",
            colors: over_defaults(&[
                (ColorSlot::Background, "50 30% 97%"),
                (ColorSlot::Foreground, "50 20% 20%"),
                (ColorSlot::Card, "45 80% 98%"),
                (ColorSlot::CardForeground, "50 20% 20%"),
                (ColorSlot::Popover, "45 80% 98%"),
                (ColorSlot::PopoverForeground, "50 20% 20%"),
                (ColorSlot::Primary, "45 100% 58%"),
                (ColorSlot::PrimaryForeground, "45 30% 20%"),
                (ColorSlot::Accent, "30 100% 65%"),
                (ColorSlot::AccentForeground, "0 0% 100%"),
                (ColorSlot::Border, "50 25% 90%"),
                (ColorSlot::Input, "50 25% 95%"),
                (ColorSlot::Ring, "45 100% 65%"),
                (ColorSlot::TaskPendingBackground, "50 70% 93%"),
                (ColorSlot::TaskCompletedBackground, "90 60% 90%"),
            ]),
        },
        PredefinedTheme {
            id: "forest_green",
            name: "Forest Green",
            colors: over_defaults(&[
                (ColorSlot::Background, "120 10% 96%"),
                (ColorSlot::Foreground, "120 25% 10%"),
                (ColorSlot::Card, "120 20% 98%"),
                (ColorSlot::CardForeground, "120 25% 10%"),
                (ColorSlot::Popover, "120 20% 98%"),
                (ColorSlot::PopoverForeground, "120 25% 10%"),
                (ColorSlot::Primary, "120 39% 39%"),
                (ColorSlot::PrimaryForeground, "0 0% 100%"),
                (ColorSlot::Accent, "100 40% 55%"),
                (ColorSlot::AccentForeground, "120 25% 15%"),
                (ColorSlot::Border, "120 10% 88%"),
                (ColorSlot::Input, "120 10% 92%"),
                (ColorSlot::Ring, "120 39% 45%"),
                (ColorSlot::TaskPendingBackground, "120 20% 92%"),
                (ColorSlot::TaskCompletedBackground, "90 40% 88%"),
            ]),
        },
    ]
}

/// Resolves an active theme identifier to a complete color set.
///
/// Lookup order: predefined themes by stable id, then the user's custom
/// themes by generated id, then the system defaults. Custom themes are
/// partial; their colors are merged over the defaults slot by slot. A stale
/// identifier (say, a deleted custom theme) lands on the defaults, so the
/// result always has every slot populated.
pub fn resolve(active_id: &str, custom: &[CustomTheme]) -> ThemeColors {
    let mut colors = default_theme_colors();
    if let Some(predefined) = predefined_themes().into_iter().find(|t| t.id == active_id) {
        colors.extend(predefined.colors);
        return colors;
    }
    if let Some(theme) = custom.iter().find(|t| t.id == active_id) {
        colors.extend(theme.colors.clone());
    }
    colors
}

/// Parses an `"H S% L%"` triple.
///
/// Accepts exactly three space-separated components: an integer hue 0-360
/// and two percentages 0-100 with an optional decimal part. Returns the
/// numeric components, or `None` if the string does not match.
pub fn parse_hsl(value: &str) -> Option<(f64, f64, f64)> {
    let mut parts = value.split(' ');
    let hue = parts.next()?;
    let saturation = parts.next()?;
    let lightness = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if hue.is_empty() || hue.len() > 3 || !hue.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let h: f64 = hue.parse().ok()?;
    if h > 360.0 {
        return None;
    }

    let s = parse_percent(saturation)?;
    let l = parse_percent(lightness)?;
    Some((h, s, l))
}

fn parse_percent(part: &str) -> Option<f64> {
    let number = part.strip_suffix('%')?;
    let integral = number.split('.').next().unwrap_or("");
    if integral.is_empty() || integral.len() > 3 || !integral.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(fraction) = number.split_once('.').map(|(_, f)| f) {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    let value: f64 = number.parse().ok()?;
    if value > 100.0 {
        return None;
    }
    Some(value)
}

/// Converts HSL components (hue in degrees, saturation/lightness in percent)
/// to 8-bit RGB. Used to turn theme slots into terminal colors.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let s = s / 100.0;
    let l = l / 100.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h % 360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
