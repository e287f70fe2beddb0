//! Utilities for parsing A1-style cell references and merge ranges.
//!
//! Grid definitions describe merges the way spreadsheet users write them
//! (`"A1:B2"`); these helpers turn them into [`Location`]s and [`Span`]s.

use crate::error::{Result, SheetGridError};
use crate::types::{Location, Span};

/// Parse a cell reference like "A1" into a 0-indexed [`Location`].
///
/// `$` markers are ignored. Returns `None` when the column letters or the row
/// digits are missing, when they are out of order, or on overflow.
pub fn parse_cell_ref(cell_ref: &str) -> Option<Location> {
    let mut column: usize = 0;
    let mut row: usize = 0;
    let mut saw_column = false;
    let mut saw_row = false;

    for b in cell_ref.trim().bytes() {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = b.to_ascii_uppercase();
            column = column
                .checked_mul(26)?
                .checked_add(usize::from(upper - b'A') + 1)?;
            saw_column = true;
        } else if b.is_ascii_digit() {
            row = row.checked_mul(10)?.checked_add(usize::from(b - b'0'))?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_column || !saw_row || row == 0 {
        return None;
    }

    Some(Location::new(row - 1, column - 1))
}

/// Parse a range like "A1:B10" (or a single "A1") into a [`Span`].
///
/// The corners may be given in any order; the span is normalized so the
/// anchor is top-left.
pub fn parse_cell_range(range: &str) -> Option<Span> {
    let (start, end) = match range.split_once(':') {
        Some((start, end)) => (parse_cell_ref(start)?, parse_cell_ref(end)?),
        None => {
            let single = parse_cell_ref(range)?;
            (single, single)
        }
    };
    Some(Span::from_bounds(
        start.row.min(end.row),
        start.column.min(end.column),
        start.row.max(end.row),
        start.column.max(end.column),
    ))
}

/// Parse a whitespace-separated list of ranges ("A1:B2 D4:E6").
///
/// # Errors
/// Returns [`SheetGridError::CellRef`] naming the first range that fails to parse.
pub fn parse_ranges(ranges: &str) -> Result<Vec<Span>> {
    ranges
        .split_whitespace()
        .map(|part| parse_cell_range(part).ok_or_else(|| SheetGridError::CellRef(part.to_string())))
        .collect()
}

/// Convert a 0-based column index to column letters (A, B, ..., Z, AA, AB, ...).
pub fn column_letters(column: usize) -> String {
    let mut letters = Vec::new();
    let mut n = column + 1;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + u8::try_from(n % 26).unwrap_or(0));
        n /= 26;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

/// Format a [`Location`] as "A1".
pub fn format_cell_ref(location: Location) -> String {
    format!("{}{}", column_letters(location.column), location.row + 1)
}
