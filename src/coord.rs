//! Text coordinates such as `A1` or `K10`.
//!
//! Columns use the traditional Go lettering, which skips `I`: `A`..`H` are
//! columns 0..7, `J` is column 8 and `Z` is column 24. Rows are 1-based
//! numbers, so `A1` is `Coord { x: 0, y: 0 }`. Letters are case-insensitive;
//! `I` is always rejected.

use crate::types::Coord;

const COLUMN_LETTERS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Number of columns that have a letter.
pub const MAX_COLUMNS: usize = COLUMN_LETTERS.len();

/// Returns the letter for a zero-based column index, or `None` past `Z`.
pub fn column_letter(x: usize) -> Option<char> {
    COLUMN_LETTERS.get(x).map(|&b| b as char)
}

/// Returns the 1-based row label for a zero-based row index.
pub fn row_label(y: usize) -> String {
    (y + 1).to_string()
}

/// Encodes a grid position, e.g. `(8, 8)` becomes `J9`.
/// Returns `None` when `x` has no column letter.
pub fn encode(x: usize, y: usize) -> Option<String> {
    column_letter(x).map(|letter| format!("{letter}{}", row_label(y)))
}

pub fn encode_coord(coord: Coord) -> Option<String> {
    encode(coord.x, coord.y)
}

/// Decodes text such as `j9` into a grid position.
/// Returns `None` for anything that is not one column letter followed by a
/// row number of at least 1.
pub fn decode(text: &str) -> Option<Coord> {
    let text = text.trim();
    let mut chars = text.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let digits = chars.as_str();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let x = COLUMN_LETTERS
        .iter()
        .position(|&candidate| candidate as char == letter)?;
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }

    Some(Coord::new(x, row - 1))
}
