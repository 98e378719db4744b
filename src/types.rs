use serde::{Deserialize, Serialize};

/// Board dimensions in intersections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: usize,
    pub height: usize,
}

impl BoardSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::square(19)
    }
}

/// A zero-based grid intersection: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Where an instruction places stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Position {
    Single(Coord),
    /// Every intersection of the axis-aligned rectangle spanned by the two
    /// corners, in either order.
    Interval { start: Coord, end: Coord },
}

/// Stone color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Notation keyword that starts a placement line.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Black => "B",
            Self::White => "W",
        }
    }
}

/// One `B ...` / `W ...` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub color: Color,
    pub positions: Vec<Position>,
}

/// A problem found on one line of the diagram text. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Sub-rectangle of the board to draw instead of the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub start: Coord,
    pub end: Coord,
}

impl Viewport {
    /// Orders the corners and clips them to `size`.
    /// Returns `None` when the viewport lies entirely outside the board.
    pub fn clip(&self, size: BoardSize) -> Option<Bounds> {
        Bounds::spanning(self.start, self.end).clip(size)
    }
}

/// Inclusive, normalized rectangle of intersections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub min: Coord,
    pub max: Coord,
}

impl Bounds {
    /// Rectangle with `a` and `b` as opposite corners, in either order.
    pub fn spanning(a: Coord, b: Coord) -> Self {
        Self {
            min: Coord::new(a.x.min(b.x), a.y.min(b.y)),
            max: Coord::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Intersection with the board, or `None` when they do not overlap.
    pub fn clip(&self, size: BoardSize) -> Option<Self> {
        if self.min.x >= size.width || self.min.y >= size.height {
            return None;
        }
        Some(Self {
            min: self.min,
            max: Coord::new(
                self.max.x.min(size.width - 1),
                self.max.y.min(size.height - 1),
            ),
        })
    }

    pub fn full(size: BoardSize) -> Self {
        Self {
            min: Coord::new(0, 0),
            max: Coord::new(size.width.saturating_sub(1), size.height.saturating_sub(1)),
        }
    }

    pub fn columns(&self) -> usize {
        self.max.x - self.min.x + 1
    }

    pub fn rows(&self) -> usize {
        self.max.y - self.min.y + 1
    }

    pub fn contains(&self, coord: Coord) -> bool {
        (self.min.x..=self.max.x).contains(&coord.x)
            && (self.min.y..=self.max.y).contains(&coord.y)
    }
}

/// Edge of the board along which coordinate labels are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Set of sides showing coordinate labels. Crosses the host boundary as a
/// list such as `["top", "left"]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Side>", into = "Vec<Side>")]
pub struct CoordinateSides {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl CoordinateSides {
    pub const NONE: Self = Self {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    pub const ALL: Self = Self {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    /// Legacy `showCoordinates` boolean.
    pub fn from_flag(show: bool) -> Self {
        if show { Self::ALL } else { Self::NONE }
    }

    pub fn insert(&mut self, side: Side) {
        match side {
            Side::Top => self.top = true,
            Side::Bottom => self.bottom = true,
            Side::Left => self.left = true,
            Side::Right => self.right = true,
        }
    }

    pub fn contains(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl From<Vec<Side>> for CoordinateSides {
    fn from(sides: Vec<Side>) -> Self {
        let mut out = Self::NONE;
        for side in sides {
            out.insert(side);
        }
        out
    }
}

impl From<CoordinateSides> for Vec<Side> {
    fn from(sides: CoordinateSides) -> Self {
        Side::ALL
            .into_iter()
            .filter(|side| sides.contains(*side))
            .collect()
    }
}

/// Output of [`crate::parser::parse`]. `errors` is empty on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub instructions: Vec<Instruction>,
    pub board_size: BoardSize,
    pub coordinate_sides: CoordinateSides,
    pub show_hoshi: bool,
    pub viewport: Option<Viewport>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// State of one intersection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointContent {
    #[default]
    Empty,
    Black,
    White,
}

impl From<Color> for PointContent {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Self::Black,
            Color::White => Self::White,
        }
    }
}

/// One intersection of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub content: PointContent,
    pub has_hoshi: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_clip_orders_corners_and_clamps_to_board() {
        let viewport = Viewport {
            start: Coord::new(12, 3),
            end: Coord::new(2, 30),
        };

        let bounds = viewport.clip(BoardSize::square(9)).unwrap();

        assert_eq!(bounds.min, Coord::new(2, 3));
        assert_eq!(bounds.max, Coord::new(8, 8));
        assert_eq!(bounds.columns(), 7);
        assert_eq!(bounds.rows(), 6);
    }

    #[test]
    fn viewport_outside_board_clips_to_none() {
        let viewport = Viewport {
            start: Coord::new(10, 10),
            end: Coord::new(12, 12),
        };

        assert_eq!(viewport.clip(BoardSize::square(9)), None);
    }

    #[test]
    fn coordinate_sides_convert_through_side_list() {
        let sides = CoordinateSides::from(vec![Side::Left, Side::Top, Side::Left]);

        assert!(sides.top && sides.left);
        assert!(!sides.bottom && !sides.right);
        assert_eq!(Vec::<Side>::from(sides), vec![Side::Top, Side::Left]);
        assert_eq!(CoordinateSides::from_flag(true), CoordinateSides::ALL);
        assert!(CoordinateSides::from_flag(false).is_empty());
    }
}
