//! Settings supplied by the host.
//!
//! The host hands over a plain object (camelCase keys, every field optional).
//! [`Settings`] keeps the legacy `showCoordinates` flag next to the canonical
//! `coordinateSides` list; [`Settings::parse_defaults`] folds them into one
//! [`CoordinateSides`] so nothing past this module sees the legacy form.

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;

use crate::error::SettingsError;
use crate::parser::{MAX_BOARD_DIMENSION, ParseDefaults};
use crate::render::RenderParams;
use crate::theme::{ColorResolver, Layered, Palette, ThemeColors};
use crate::types::{BoardSize, CoordinateSides};

/// Settings used when the host passes none.
pub static DEFAULT_SETTINGS: Lazy<Settings> = Lazy::new(Settings::default);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub default_board_size: BoardSize,
    pub show_hoshi: bool,
    pub coordinate_sides: Option<CoordinateSides>,
    /// Legacy form of `coordinate_sides`: `true` means all four sides.
    pub show_coordinates: Option<bool>,
    pub stone_size_ratio: f64,
    pub line_width: f64,
    pub coordinate_font_size: f64,
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub min_cell_size: f64,
    pub use_theme_colors: bool,
    pub theme_colors: ThemeColors,
    pub colors: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        let params = RenderParams::default();
        Self {
            default_board_size: BoardSize::default(),
            show_hoshi: true,
            coordinate_sides: None,
            show_coordinates: None,
            stone_size_ratio: params.stone_size_ratio,
            line_width: params.line_width,
            coordinate_font_size: params.coordinate_font_size,
            width: params.width,
            height: params.height,
            margin: params.margin,
            min_cell_size: params.min_cell_size,
            use_theme_colors: false,
            theme_colors: ThemeColors::default(),
            colors: Palette::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.stone_size_ratio > 0.0 && self.stone_size_ratio <= 1.0) {
            return Err(SettingsError::InvalidRatio(self.stone_size_ratio));
        }
        if !(self.line_width > 0.0 && self.line_width.is_finite()) {
            return Err(SettingsError::InvalidLineWidth(self.line_width));
        }
        if !(self.coordinate_font_size > 0.0 && self.coordinate_font_size.is_finite()) {
            return Err(SettingsError::InvalidFontSize(self.coordinate_font_size));
        }
        if !(self.min_cell_size > 0.0 && self.min_cell_size.is_finite()) {
            return Err(SettingsError::InvalidMinCellSize(self.min_cell_size));
        }
        let usable_w = self.width - 2.0 * self.margin;
        let usable_h = self.height - 2.0 * self.margin;
        if !(self.margin >= 0.0 && usable_w > 0.0 && usable_h > 0.0)
            || !(self.width.is_finite() && self.height.is_finite())
        {
            return Err(SettingsError::InvalidCanvas {
                width: self.width,
                height: self.height,
                margin: self.margin,
            });
        }
        let size = self.default_board_size;
        if !(1..=MAX_BOARD_DIMENSION).contains(&size.width)
            || !(1..=MAX_BOARD_DIMENSION).contains(&size.height)
        {
            return Err(SettingsError::InvalidBoardSize {
                width: size.width,
                height: size.height,
                max: MAX_BOARD_DIMENSION,
            });
        }
        Ok(())
    }

    /// Canonical coordinate sides. `coordinateSides` wins over the legacy
    /// `showCoordinates` flag when both are present.
    pub fn coordinate_sides(&self) -> CoordinateSides {
        match (self.coordinate_sides, self.show_coordinates) {
            (Some(sides), legacy) => {
                if legacy.is_some() {
                    warn!("both coordinateSides and showCoordinates set; ignoring showCoordinates");
                }
                sides
            }
            (None, Some(show)) => CoordinateSides::from_flag(show),
            (None, None) => CoordinateSides::NONE,
        }
    }

    pub fn parse_defaults(&self) -> ParseDefaults {
        ParseDefaults {
            board_size: self.default_board_size,
            show_hoshi: self.show_hoshi,
            coordinate_sides: self.coordinate_sides(),
        }
    }

    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            width: self.width,
            height: self.height,
            margin: self.margin,
            stone_size_ratio: self.stone_size_ratio,
            line_width: self.line_width,
            coordinate_font_size: self.coordinate_font_size,
            min_cell_size: self.min_cell_size,
        }
    }

    /// Theme colors layered over the palette when `useThemeColors` is set,
    /// otherwise the palette alone.
    pub fn colors(&self) -> Layered<'_> {
        let primary: &dyn ColorResolver = if self.use_theme_colors {
            &self.theme_colors
        } else {
            &self.colors
        };
        Layered::new(primary, &self.colors)
    }
}
