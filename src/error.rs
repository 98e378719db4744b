//! Contract errors. Malformed diagram text is never reported here; the parser
//! records it as [`crate::types::ParseError`] data instead.

/// Raised when a [`crate::board::Board`] is assembled from an invalid grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The grid has no rows or its first row has no cells.
    #[error("board grid must have at least one row and one column")]
    Empty,
    /// A row does not have the same number of cells as the first row.
    #[error("ragged board grid: row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Raised by [`crate::settings::Settings::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("stone size ratio must be in (0, 1], got {0}")]
    InvalidRatio(f64),
    #[error("line width must be positive, got {0}")]
    InvalidLineWidth(f64),
    #[error("coordinate font size must be positive, got {0}")]
    InvalidFontSize(f64),
    #[error("minimum cell size must be positive, got {0}")]
    InvalidMinCellSize(f64),
    #[error("canvas size must be positive, got {width}x{height} with margin {margin}")]
    InvalidCanvas { width: f64, height: f64, margin: f64 },
    #[error("default board size must be between 1x1 and {max}x{max}, got {width}x{height}")]
    InvalidBoardSize {
        width: usize,
        height: usize,
        max: usize,
    },
}

/// Raised by the source edit helper in [`crate::diagram`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("position ({x}, {y}) is outside the {width}x{height} board")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}
