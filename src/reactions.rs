//! Reaction vocabulary: which symbol selects which row or column.

use crate::board::Position;
use crate::constants::{COLUMN_SYMBOLS, ROW_SYMBOLS};

/// Which half of a coordinate a selection carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

/// Map a reaction symbol to a 0-based index on `axis`.
///
/// Accepts the emoji buttons, and for console use the plain shorthand
/// `1`..`9` for rows and `a`..`i` (any case) for columns. Symbols outside
/// the vocabulary, or past `limit`, yield `None`.
pub fn parse_reaction(axis: Axis, symbol: &str, limit: usize) -> Option<usize> {
    let symbol = symbol.trim();
    let symbols = match axis {
        Axis::Row => &ROW_SYMBOLS,
        Axis::Column => &COLUMN_SYMBOLS,
    };
    let index = symbols
        .iter()
        .position(|&s| s == symbol)
        .or_else(|| parse_shorthand(axis, symbol))?;
    (index < limit).then_some(index)
}

fn parse_shorthand(axis: Axis, symbol: &str) -> Option<usize> {
    let &[b] = symbol.as_bytes() else {
        return None;
    };
    match axis {
        Axis::Row if (b'1'..=b'9').contains(&b) => Some((b - b'1') as usize),
        Axis::Column if b.to_ascii_lowercase().is_ascii_lowercase() => {
            let i = (b.to_ascii_lowercase() - b'a') as usize;
            (i < COLUMN_SYMBOLS.len()).then_some(i)
        }
        _ => None,
    }
}

/// The button symbol for `index` on `axis`.
pub fn symbol(axis: Axis, index: usize) -> Option<&'static str> {
    match axis {
        Axis::Row => ROW_SYMBOLS.get(index).copied(),
        Axis::Column => COLUMN_SYMBOLS.get(index).copied(),
    }
}

/// Row label, 1-based.
pub fn row_label(row: usize) -> String {
    (row + 1).to_string()
}

/// Column label, a letter. Columns past `Z` fall back to their 1-based number.
pub fn col_label(col: usize) -> String {
    match u8::try_from(col) {
        Ok(c) if c < 26 => char::from(b'A' + c).to_string(),
        _ => (col + 1).to_string(),
    }
}

/// Human label for a point, e.g. `"5 E"` for (4, 4).
pub fn label(pos: Position) -> String {
    format!("{} {}", row_label(pos.row), col_label(pos.col))
}
