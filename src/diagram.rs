use serde::Serialize;
use tracing::{debug, instrument};

use crate::board::Board;
use crate::coord;
use crate::error::{EditError, SettingsError};
use crate::parser::{self, ParseDefaults};
use crate::render::{self, RenderParams, SvgDocument};
use crate::settings::Settings;
use crate::theme::ColorResolver;
use crate::types::{BoardSize, Color, Coord, ParseError, ParseResult};

/// Parsed diagram together with the board built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    result: ParseResult,
    board: Board,
}

impl Diagram {
    pub fn parse(source: &str, defaults: &ParseDefaults) -> Self {
        let result = parser::parse(source, defaults);
        let board = Board::from_parse(&result);
        Self { result, board }
    }

    pub fn result(&self) -> &ParseResult {
        &self.result
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.result.errors
    }

    pub fn render(&self, params: &RenderParams, colors: &dyn ColorResolver) -> SvgDocument {
        render::render(&self.board, params, colors)
    }

    pub fn to_state(&self, svg: &SvgDocument) -> DiagramState {
        let (black_count, white_count) = self.board.count();
        DiagramState {
            svg: svg.to_svg_string(),
            width: svg.width,
            height: svg.height,
            board_size: self.board.size(),
            black_count,
            white_count,
            errors: self.result.errors.clone(),
        }
    }
}

/// What the host receives for one render.
/// Contract:
/// - `svg` is always a complete document, even when `errors` is non-empty.
/// - `width`/`height` may exceed the requested canvas on large boards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramState {
    pub svg: String,
    pub width: f64,
    pub height: f64,
    pub board_size: BoardSize,
    pub black_count: usize,
    pub white_count: usize,
    pub errors: Vec<ParseError>,
}

/// Runs text through parse, map and render with the given settings.
#[instrument(level = "trace", skip_all)]
pub fn render_source(source: &str, settings: &Settings) -> Result<DiagramState, SettingsError> {
    settings.validate()?;

    let diagram = Diagram::parse(source, &settings.parse_defaults());
    let svg = diagram.render(&settings.render_params(), &settings.colors());
    let state = diagram.to_state(&svg);

    debug!(
        errors = state.errors.len(),
        black = state.black_count,
        white = state.white_count,
        "rendered diagram"
    );
    Ok(state)
}

/// Rewrites `source` so that `(x, y)` holds `color`, or no single-point
/// placement when `color` is `None`.
///
/// Existing single-point tokens for that intersection are removed from every
/// `B`/`W` line (lines left without tokens are dropped), then a new line such
/// as `W D4` is appended. Intervals covering the intersection are left alone.
pub fn place_stone(
    source: &str,
    defaults: &ParseDefaults,
    x: usize,
    y: usize,
    color: Option<Color>,
) -> Result<String, EditError> {
    let size = parser::parse(source, defaults).board_size;
    let target = Coord::new(x, y);
    let out_of_range = || EditError::OutOfRange {
        x,
        y,
        width: size.width,
        height: size.height,
    };
    if !size.contains(target) {
        return Err(out_of_range());
    }
    let label = coord::encode_coord(target).ok_or_else(out_of_range)?;

    let mut lines: Vec<String> = Vec::new();
    for raw in source.lines() {
        let Some((line_color, rest)) = parser::split_placement(raw.trim()) else {
            lines.push(raw.to_string());
            continue;
        };

        let tokens: Vec<&str> = rest
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        let kept: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|token| coord::decode(token) != Some(target))
            .collect();

        if kept.len() == tokens.len() {
            lines.push(raw.to_string());
        } else if !kept.is_empty() {
            lines.push(format!("{} {}", line_color.keyword(), kept.join(", ")));
        }
    }

    if let Some(color) = color {
        lines.push(format!("{} {label}", color.keyword()));
    }

    let mut out = lines.join("\n");
    if source.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
