//! Line-oriented parser for the diagram notation.
//!
//! ```text
//! size 9x9
//! coordinates top,left
//! hoshi off
//! viewport A1-H9
//! B A1, C3-E5
//! W J9
//! ```
//!
//! Every non-blank line is one statement. Statements may appear in any order;
//! for `size`, `coordinates`, `hoshi` and `viewport` the last valid one wins.
//! Lines starting with `#` or `//` are comments. Problems are collected as
//! [`ParseError`]s tagged with the 1-based line number and parsing carries on
//! with the next line, so the caller always gets a usable result.

use tracing::{debug, trace};

use crate::coord;
use crate::types::{
    BoardSize, Color, CoordinateSides, Instruction, ParseError, ParseResult, Position, Side,
    Viewport,
};

/// Largest accepted board dimension. Matches the number of column letters.
pub const MAX_BOARD_DIMENSION: usize = coord::MAX_COLUMNS;

/// Values used for statements the text leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDefaults {
    pub board_size: BoardSize,
    pub show_hoshi: bool,
    pub coordinate_sides: CoordinateSides,
}

impl Default for ParseDefaults {
    fn default() -> Self {
        Self {
            board_size: BoardSize::default(),
            show_hoshi: true,
            coordinate_sides: CoordinateSides::NONE,
        }
    }
}

/// Parses diagram text. Never fails: malformed lines end up in
/// [`ParseResult::errors`] and everything else is still applied.
///
/// A bad position token inside a `B`/`W` line is reported and skipped; the
/// remaining tokens of that line are kept.
pub fn parse(input: &str, defaults: &ParseDefaults) -> ParseResult {
    let mut state = ParseState::new(defaults);

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        state.parse_line(idx + 1, line);
    }

    let result = state.finish();
    debug!(
        lines = input.lines().count(),
        instructions = result.instructions.len(),
        errors = result.errors.len(),
        width = result.board_size.width,
        height = result.board_size.height,
        "parsed diagram"
    );
    result
}

struct ParseState {
    instructions: Vec<Instruction>,
    board_size: BoardSize,
    coordinate_sides: CoordinateSides,
    show_hoshi: bool,
    viewport: Option<Viewport>,
    errors: Vec<ParseError>,
}

impl ParseState {
    fn new(defaults: &ParseDefaults) -> Self {
        Self {
            instructions: Vec::new(),
            board_size: defaults.board_size,
            coordinate_sides: defaults.coordinate_sides,
            show_hoshi: defaults.show_hoshi,
            viewport: None,
            errors: Vec::new(),
        }
    }

    fn parse_line(&mut self, line_no: usize, line: &str) {
        if let Some(rest) = strip_keyword(line, "size") {
            trace!(line_no, "size statement");
            match parse_size(rest) {
                Ok(size) => self.board_size = size,
                Err(message) => self.error(line_no, message),
            }
            return;
        }

        if let Some(rest) = strip_keyword(line, "coordinates") {
            trace!(line_no, "coordinates statement");
            match parse_sides(rest) {
                Ok(sides) => self.coordinate_sides = sides,
                Err(message) => self.error(line_no, message),
            }
            return;
        }

        if let Some(rest) = strip_keyword(line, "hoshi") {
            trace!(line_no, "hoshi statement");
            match parse_switch(rest) {
                Some(show) => self.show_hoshi = show,
                None => self.error(
                    line_no,
                    format!("Invalid hoshi value: {rest:?} (expected on or off)"),
                ),
            }
            return;
        }

        if let Some(rest) = strip_keyword(line, "viewport") {
            trace!(line_no, "viewport statement");
            match parse_viewport(rest) {
                Ok(viewport) => self.viewport = Some(viewport),
                Err(message) => self.error(line_no, message),
            }
            return;
        }

        if let Some((color, rest)) = split_placement(line) {
            trace!(line_no, ?color, "placement statement");
            self.parse_placement(line_no, color, rest);
            return;
        }

        self.error(line_no, format!("Unrecognized line: {line}"));
    }

    fn parse_placement(&mut self, line_no: usize, color: Color, rest: &str) {
        if rest.is_empty() {
            self.error(line_no, format!("Missing positions after {}", color.keyword()));
            return;
        }

        let mut positions = Vec::new();
        for token in rest.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match parse_position(token) {
                Ok(position) => positions.push(position),
                Err(message) => self.error(line_no, message),
            }
        }

        if !positions.is_empty() {
            self.instructions.push(Instruction { color, positions });
        }
    }

    fn error(&mut self, line: usize, message: impl Into<String>) {
        self.errors.push(ParseError::new(line, message));
    }

    fn finish(self) -> ParseResult {
        ParseResult {
            instructions: self.instructions,
            board_size: self.board_size,
            coordinate_sides: self.coordinate_sides,
            show_hoshi: self.show_hoshi,
            viewport: self.viewport,
            errors: self.errors,
        }
    }
}

/// Returns the rest of `line` when its first word is `keyword` (any case).
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    head.eq_ignore_ascii_case(keyword).then(|| rest.trim())
}

/// Splits a trimmed `B ...` / `W ...` line into its color and position list.
pub(crate) fn split_placement(line: &str) -> Option<(Color, &str)> {
    [Color::Black, Color::White].into_iter().find_map(|color| {
        strip_keyword(line, color.keyword()).map(|rest| (color, rest))
    })
}

fn parse_size(text: &str) -> Result<BoardSize, String> {
    let invalid = || format!("Invalid board size: {text:?} (expected WIDTHxHEIGHT)");

    let (width, height) = match text.split_once(['x', 'X']) {
        Some((w, h)) => (w.trim(), h.trim()),
        None => (text, text),
    };
    let width: usize = width.parse().map_err(|_| invalid())?;
    let height: usize = height.parse().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }
    if width > MAX_BOARD_DIMENSION || height > MAX_BOARD_DIMENSION {
        return Err(format!(
            "Board size too large: {width}x{height} (maximum {MAX_BOARD_DIMENSION}x{MAX_BOARD_DIMENSION})"
        ));
    }

    Ok(BoardSize::new(width, height))
}

fn parse_switch(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Accepts `on`/`off`, `all`/`none`, or a list of sides separated by commas
/// or whitespace.
fn parse_sides(text: &str) -> Result<CoordinateSides, String> {
    if let Some(show) = parse_switch(text) {
        return Ok(CoordinateSides::from_flag(show));
    }

    match text.to_ascii_lowercase().as_str() {
        "all" => return Ok(CoordinateSides::ALL),
        "none" => return Ok(CoordinateSides::NONE),
        _ => {}
    }

    let names: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return Err("Missing coordinates value (expected on, off or a list of sides)".to_string());
    }

    let mut sides = CoordinateSides::NONE;
    for name in names {
        let side = Side::from_name(name).ok_or_else(|| {
            format!("Invalid coordinates side: {name:?} (expected top, bottom, left or right)")
        })?;
        sides.insert(side);
    }
    Ok(sides)
}

fn parse_viewport(text: &str) -> Result<Viewport, String> {
    let parts: Vec<&str> = text.split('-').map(str::trim).collect();
    let [start, end] = parts.as_slice() else {
        return Err(format!("Invalid viewport: {text:?} (expected COORD-COORD)"));
    };

    let start = coord::decode(start)
        .ok_or_else(|| format!("Invalid coordinate in viewport: {start}"))?;
    let end = coord::decode(end).ok_or_else(|| format!("Invalid coordinate in viewport: {end}"))?;

    Ok(Viewport { start, end })
}

fn parse_position(token: &str) -> Result<Position, String> {
    if !token.contains('-') {
        return coord::decode(token)
            .map(Position::Single)
            .ok_or_else(|| format!("Invalid coordinate: {token}"));
    }

    let parts: Vec<&str> = token.split('-').map(str::trim).collect();
    let [start, end] = parts.as_slice() else {
        return Err(format!("Invalid interval: {token}"));
    };

    let start = coord::decode(start).ok_or_else(|| format!("Invalid coordinate: {start}"))?;
    let end = coord::decode(end).ok_or_else(|| format!("Invalid coordinate: {end}"))?;
    Ok(Position::Interval { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    fn parse_default(input: &str) -> ParseResult {
        parse(input, &ParseDefaults::default())
    }

    #[test]
    fn size_and_single_black_stone() {
        let result = parse_default("size 9x9\nB A1");

        assert!(result.is_ok());
        assert_eq!(result.board_size, BoardSize::square(9));
        assert_eq!(
            result.instructions,
            vec![Instruction {
                color: Color::Black,
                positions: vec![Position::Single(Coord::new(0, 0))],
            }]
        );
    }

    #[test]
    fn white_j9_skips_letter_i() {
        let result = parse_default("size 9x9\nW J9");

        assert_eq!(result.instructions[0].color, Color::White);
        assert_eq!(
            result.instructions[0].positions,
            vec![Position::Single(Coord::new(8, 8))]
        );
    }

    #[test]
    fn interval_and_multiple_tokens_share_one_instruction() {
        let result = parse_default("b A1, C3-E5 ,d4");

        assert!(result.is_ok());
        assert_eq!(result.instructions.len(), 1);
        assert_eq!(
            result.instructions[0].positions,
            vec![
                Position::Single(Coord::new(0, 0)),
                Position::Interval {
                    start: Coord::new(2, 2),
                    end: Coord::new(4, 4),
                },
                Position::Single(Coord::new(3, 3)),
            ]
        );
    }

    #[test]
    fn empty_input_yields_defaults_without_errors() {
        let defaults = ParseDefaults {
            board_size: BoardSize::square(13),
            show_hoshi: false,
            coordinate_sides: CoordinateSides::ALL,
        };

        for input in ["", "   \n\t\n  "] {
            let result = parse(input, &defaults);
            assert!(result.is_ok());
            assert_eq!(result.board_size, BoardSize::square(13));
            assert!(result.instructions.is_empty());
            assert!(!result.show_hoshi);
            assert_eq!(result.coordinate_sides, CoordinateSides::ALL);
            assert_eq!(result.viewport, None);
        }
    }

    #[test]
    fn invalid_coordinate_is_reported_and_size_kept() {
        let result = parse_default("size 9x9\nB XX99");

        assert_eq!(result.board_size, BoardSize::square(9));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 2);
        assert!(result.errors[0].message.contains("Invalid coordinate"));
        assert!(result.instructions.is_empty());
    }

    #[test]
    fn bad_token_is_skipped_and_valid_tokens_kept() {
        let result = parse_default("W A1, I3, B2-C3-D4, C3");

        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].message.contains("Invalid coordinate: I3"));
        assert!(result.errors[1].message.contains("Invalid interval"));
        assert_eq!(
            result.instructions[0].positions,
            vec![
                Position::Single(Coord::new(0, 0)),
                Position::Single(Coord::new(2, 2)),
            ]
        );
    }

    #[test]
    fn errors_accumulate_per_line() {
        let input = "size 9x9\nfoo bar\nB A1\nsize 0x9\nW Q\nhoshi maybe";
        let result = parse_default(input);

        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 4, 5, 6]);
        assert!(result.errors[0].message.starts_with("Unrecognized line"));
        assert_eq!(result.board_size, BoardSize::square(9));
        assert_eq!(result.instructions.len(), 1);
    }

    #[test]
    fn last_size_wins_and_square_shorthand_is_accepted() {
        assert_eq!(parse_default("size 9x9\nSIZE 13").board_size, BoardSize::square(13));
        assert_eq!(parse_default("size 7 X 5").board_size, BoardSize::new(7, 5));
    }

    #[test]
    fn oversized_board_is_an_error() {
        let result = parse_default("size 30x30");

        assert_eq!(result.board_size, BoardSize::default());
        assert!(result.errors[0].message.contains("too large"));
    }

    #[test]
    fn coordinates_accepts_flags_and_side_lists() {
        assert_eq!(parse_default("coordinates on").coordinate_sides, CoordinateSides::ALL);
        assert_eq!(parse_default("Coordinates OFF").coordinate_sides, CoordinateSides::NONE);

        let sides = parse_default("coordinates top, left").coordinate_sides;
        assert!(sides.top && sides.left && !sides.bottom && !sides.right);

        let result = parse_default("coordinates top,middle");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("middle"));
    }

    #[test]
    fn hoshi_toggle() {
        assert!(!parse_default("hoshi off").show_hoshi);
        assert!(parse_default("hoshi off\nhoshi ON").show_hoshi);
    }

    #[test]
    fn viewport_parses_two_coordinates() {
        let result = parse_default("viewport A1-h9");

        assert_eq!(
            result.viewport,
            Some(Viewport {
                start: Coord::new(0, 0),
                end: Coord::new(7, 8),
            })
        );
    }

    #[test]
    fn malformed_viewport_is_reported_and_left_unset() {
        for input in ["viewport A1", "viewport A1-B2-C3", "viewport A1-I9", "viewport"] {
            let result = parse_default(input);
            assert_eq!(result.viewport, None, "{input}");
            assert_eq!(result.errors.len(), 1, "{input}");
        }
    }

    #[test]
    fn comments_are_ignored() {
        let result = parse_default("# opening\n// joseki\nB D4");

        assert!(result.is_ok());
        assert_eq!(result.instructions.len(), 1);
    }

    #[test]
    fn placement_without_positions_is_an_error() {
        let result = parse_default("B\nW  ,  ");

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 1);
        assert!(result.instructions.is_empty());
    }
}
