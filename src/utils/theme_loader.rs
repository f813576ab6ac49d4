use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::internal::theme_store::ThemePreference;

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeFile {
    pub themes: Vec<ThemeVariant>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeVariant {
    pub mode: String, // "light" or "dark"
    pub colors: HashMap<String, String>,
}

/// Colors every view draws with.
#[derive(Debug, Clone, PartialEq)]
pub struct TuiTheme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub primary_bg: Color,
    pub primary_fg: Color,
    pub card_bg: Color,
    pub card_border: Color,
    pub accent_bg: Color,
    pub accent_fg: Color,
    pub skeleton: Color,
    pub destructive: Color,
    pub like: Color,
}

impl TuiTheme {
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(255, 255, 255),
            foreground: Color::Rgb(15, 23, 42),
            muted: Color::Rgb(100, 116, 139),
            border: Color::Rgb(226, 232, 240),
            primary_bg: Color::Rgb(15, 23, 42),
            primary_fg: Color::Rgb(248, 250, 252),
            card_bg: Color::Rgb(255, 255, 255),
            card_border: Color::Rgb(203, 213, 225),
            accent_bg: Color::Rgb(241, 245, 249),
            accent_fg: Color::Rgb(15, 23, 42),
            skeleton: Color::Rgb(226, 232, 240),
            destructive: Color::Rgb(220, 38, 38),
            like: Color::Rgb(225, 29, 72),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(2, 8, 23),
            foreground: Color::Rgb(248, 250, 252),
            muted: Color::Rgb(148, 163, 184),
            border: Color::Rgb(30, 41, 59),
            primary_bg: Color::Rgb(248, 250, 252),
            primary_fg: Color::Rgb(15, 23, 42),
            card_bg: Color::Rgb(15, 23, 42),
            card_border: Color::Rgb(51, 65, 85),
            accent_bg: Color::Rgb(30, 41, 59),
            accent_fg: Color::Rgb(248, 250, 252),
            skeleton: Color::Rgb(30, 41, 59),
            destructive: Color::Rgb(248, 113, 113),
            like: Color::Rgb(251, 113, 133),
        }
    }

    pub fn builtin(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Light => Self::light(),
            ThemePreference::Dark => Self::dark(),
        }
    }

    /// Palette for `preference`, from `theme_file` when configured and
    /// readable, otherwise the built-in one.
    pub fn resolve(theme_file: Option<&str>, preference: ThemePreference) -> Self {
        match theme_file {
            Some(path) => load_theme(Path::new(path), preference).unwrap_or_else(|e| {
                tracing::error!("Failed to load theme '{}': {:#}", path, e);
                Self::builtin(preference)
            }),
            None => Self::builtin(preference),
        }
    }
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Load the variant matching `preference` from a JSON theme file. Colors the
/// file leaves out keep their built-in value.
#[tracing::instrument(skip(path), fields(path = ?path, mode = %preference))]
pub fn load_theme(path: &Path, preference: ThemePreference) -> Result<TuiTheme> {
    let content = fs::read_to_string(path).context("Failed to read theme file")?;
    let theme_file: ThemeFile =
        serde_json::from_str(&content).context("Failed to parse theme JSON")?;

    let mode = preference.to_string();
    let variant = theme_file
        .themes
        .iter()
        .find(|t| t.mode.eq_ignore_ascii_case(&mode))
        .context("No matching theme variant found")?;

    let base = TuiTheme::builtin(preference);
    let pick = |key: &str, fallback: Color| {
        variant
            .colors
            .get(key)
            .and_then(|v| parse_color(v))
            .unwrap_or(fallback)
    };

    Ok(TuiTheme {
        background: pick("background", base.background),
        foreground: pick("foreground", base.foreground),
        muted: pick("muted.foreground", base.muted),
        border: pick("border", base.border),
        primary_bg: pick("primary.background", base.primary_bg),
        primary_fg: pick("primary.foreground", base.primary_fg),
        card_bg: pick("card.background", base.card_bg),
        card_border: pick("card.border", base.card_border),
        accent_bg: pick("accent.background", base.accent_bg),
        accent_fg: pick("accent.foreground", base.accent_fg),
        skeleton: pick("skeleton", base.skeleton),
        destructive: pick("destructive", base.destructive),
        like: pick("like", base.like),
    })
}

fn parse_color(value: &str) -> Option<Color> {
    parse_hex(value).or_else(|| value.trim().parse::<Color>().ok())
}

fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    match hex.len() {
        6 | 8 => {
            // For 8-char hex (with alpha), ignore the alpha and use the RGB components.
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}
