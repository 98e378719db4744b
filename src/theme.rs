//! Color lookup for the renderer.
//!
//! The renderer never inspects host styling itself. It asks a
//! [`ColorResolver`] for each semantic role; the host either passes an
//! explicit [`Palette`] or resolved theme colors ([`ThemeColors`]), and any
//! role the theme leaves out falls back to the palette.

use serde::{Deserialize, Serialize};

/// What a color is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Background,
    Line,
    BlackStone,
    BlackStroke,
    WhiteStone,
    WhiteStroke,
    Hoshi,
    Text,
}

pub trait ColorResolver {
    /// Returns a CSS color for `role`, or `None` to use the fallback.
    fn resolve(&self, role: ColorRole) -> Option<&str>;
}

/// A complete set of colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub background: String,
    pub line: String,
    pub black_stone: String,
    pub black_stroke: String,
    pub white_stone: String,
    pub white_stroke: String,
    pub hoshi: String,
    pub text: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#DCB35C".to_string(),
            line: "#000000".to_string(),
            black_stone: "#000000".to_string(),
            black_stroke: "#000000".to_string(),
            white_stone: "#FFFFFF".to_string(),
            white_stroke: "#000000".to_string(),
            hoshi: "#000000".to_string(),
            text: "#000000".to_string(),
        }
    }
}

impl Palette {
    pub fn get(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::Background => &self.background,
            ColorRole::Line => &self.line,
            ColorRole::BlackStone => &self.black_stone,
            ColorRole::BlackStroke => &self.black_stroke,
            ColorRole::WhiteStone => &self.white_stone,
            ColorRole::WhiteStroke => &self.white_stroke,
            ColorRole::Hoshi => &self.hoshi,
            ColorRole::Text => &self.text,
        }
    }
}

impl ColorResolver for Palette {
    fn resolve(&self, role: ColorRole) -> Option<&str> {
        Some(self.get(role))
    }
}

/// Colors resolved by the host from its current theme. Missing or blank
/// entries fall back to the palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeColors {
    pub background: Option<String>,
    pub line: Option<String>,
    pub black_stone: Option<String>,
    pub black_stroke: Option<String>,
    pub white_stone: Option<String>,
    pub white_stroke: Option<String>,
    pub hoshi: Option<String>,
    pub text: Option<String>,
}

impl ColorResolver for ThemeColors {
    fn resolve(&self, role: ColorRole) -> Option<&str> {
        let color = match role {
            ColorRole::Background => &self.background,
            ColorRole::Line => &self.line,
            ColorRole::BlackStone => &self.black_stone,
            ColorRole::BlackStroke => &self.black_stroke,
            ColorRole::WhiteStone => &self.white_stone,
            ColorRole::WhiteStroke => &self.white_stroke,
            ColorRole::Hoshi => &self.hoshi,
            ColorRole::Text => &self.text,
        };
        color.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Tries `primary` first and falls back to a full palette.
pub struct Layered<'a> {
    primary: &'a dyn ColorResolver,
    fallback: &'a Palette,
}

impl<'a> Layered<'a> {
    pub fn new(primary: &'a dyn ColorResolver, fallback: &'a Palette) -> Self {
        Self { primary, fallback }
    }

    pub fn color(&self, role: ColorRole) -> &str {
        self.primary
            .resolve(role)
            .unwrap_or_else(|| self.fallback.get(role))
    }
}

impl ColorResolver for Layered<'_> {
    fn resolve(&self, role: ColorRole) -> Option<&str> {
        Some(self.color(role))
    }
}
