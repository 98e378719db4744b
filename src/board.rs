use serde::Serialize;

use crate::error::BoardError;
use crate::types::{
    BoardSize, Bounds, Coord, CoordinateSides, ParseResult, Point, PointContent, Position,
};

const HOSHI_19: [usize; 3] = [3, 9, 15];
const HOSHI_13: [usize; 3] = [3, 6, 9];
const HOSHI_9: [(usize, usize); 5] = [(2, 2), (6, 2), (4, 4), (2, 6), (6, 6)];

/// A diagram board: one [`Point`] per intersection, stored row-major as
/// `points[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    points: Vec<Vec<Point>>,
    coordinate_sides: CoordinateSides,
    boundaries: Bounds,
}

impl Board {
    /// Builds the board described by a parse result.
    ///
    /// Placements are applied in instruction order, then position order, so
    /// later placements overwrite earlier ones. Anything outside the board is
    /// ignored. Star-point flags are set from [`star_points`] when the result
    /// shows hoshi and survive stone placement.
    pub fn from_parse(result: &ParseResult) -> Self {
        let size = result.board_size;
        let mut points = vec![vec![Point::default(); size.width]; size.height];

        if result.show_hoshi {
            for coord in star_points(size) {
                points[coord.y][coord.x].has_hoshi = true;
            }
        }

        for instruction in &result.instructions {
            let content = PointContent::from(instruction.color);
            for position in &instruction.positions {
                paint(&mut points, size, *position, content);
            }
        }

        let boundaries = result
            .viewport
            .and_then(|viewport| viewport.clip(size))
            .unwrap_or_else(|| Bounds::full(size));

        Self {
            points,
            coordinate_sides: result.coordinate_sides,
            boundaries,
        }
    }

    /// Builds a board from an explicit grid.
    /// `boundaries` defaults to the whole board and is clipped to it.
    pub fn from_points(
        points: Vec<Vec<Point>>,
        coordinate_sides: CoordinateSides,
        boundaries: Option<Bounds>,
    ) -> Result<Self, BoardError> {
        let width = points.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(BoardError::Empty);
        }
        if let Some((row, cells)) = points
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width)
        {
            return Err(BoardError::RaggedRow {
                row,
                expected: width,
                found: cells.len(),
            });
        }

        let size = BoardSize::new(width, points.len());
        let boundaries = boundaries
            .and_then(|b| Bounds::spanning(b.min, b.max).clip(size))
            .unwrap_or_else(|| Bounds::full(size));

        Ok(Self {
            points,
            coordinate_sides,
            boundaries,
        })
    }

    pub fn size(&self) -> BoardSize {
        BoardSize::new(self.points.first().map_or(0, Vec::len), self.points.len())
    }

    pub fn points(&self) -> &[Vec<Point>] {
        &self.points
    }

    pub fn point(&self, x: usize, y: usize) -> Option<&Point> {
        self.points.get(y).and_then(|row| row.get(x))
    }

    pub fn coordinate_sides(&self) -> CoordinateSides {
        self.coordinate_sides
    }

    /// Region to draw: the viewport clipped to the board, or the whole board.
    pub fn boundaries(&self) -> Bounds {
        self.boundaries
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (usize, usize) {
        self.points
            .iter()
            .flatten()
            .fold((0, 0), |(black, white), point| match point.content {
                PointContent::Black => (black + 1, white),
                PointContent::White => (black, white + 1),
                PointContent::Empty => (black, white),
            })
    }
}

/// Traditional star points for 9x9, 13x13 and 19x19 boards; empty otherwise.
pub fn star_points(size: BoardSize) -> Vec<Coord> {
    let lines: &[usize] = match (size.width, size.height) {
        (19, 19) => &HOSHI_19,
        (13, 13) => &HOSHI_13,
        (9, 9) => {
            return HOSHI_9.iter().map(|&(x, y)| Coord::new(x, y)).collect();
        }
        _ => return Vec::new(),
    };

    lines
        .iter()
        .flat_map(|&y| lines.iter().map(move |&x| Coord::new(x, y)))
        .collect()
}

fn paint(points: &mut [Vec<Point>], size: BoardSize, position: Position, content: PointContent) {
    match position {
        Position::Single(coord) => {
            if size.contains(coord) {
                points[coord.y][coord.x].content = content;
            }
        }
        Position::Interval { start, end } => {
            let Some(rect) = Bounds::spanning(start, end).clip(size) else {
                return;
            };
            for row in &mut points[rect.min.y..=rect.max.y] {
                for point in &mut row[rect.min.x..=rect.max.x] {
                    point.content = content;
                }
            }
        }
    }
}
