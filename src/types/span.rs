use serde::{Deserialize, Serialize};
use std::fmt;

use super::Location;

/// A merged-cell rectangle, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Top-left cell.
    pub anchor: Location,
    /// Bottom-right cell.
    pub extent: Location,
}

impl Span {
    pub const fn new(anchor: Location, extent: Location) -> Self {
        Self { anchor, extent }
    }

    /// Span from `(start_row, start_col)` to `(end_row, end_col)`.
    pub const fn from_bounds(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self::new(
            Location::new(start_row, start_col),
            Location::new(end_row, end_col),
        )
    }

    /// Anchor is not after extent on either axis.
    pub fn is_well_formed(&self) -> bool {
        self.anchor.row <= self.extent.row && self.anchor.column <= self.extent.column
    }

    pub fn row_count(&self) -> usize {
        self.extent.row.saturating_sub(self.anchor.row) + 1
    }

    pub fn column_count(&self) -> usize {
        self.extent.column.saturating_sub(self.anchor.column) + 1
    }

    pub fn contains(&self, location: Location) -> bool {
        (self.anchor.row..=self.extent.row).contains(&location.row)
            && (self.anchor.column..=self.extent.column).contains(&location.column)
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        self.contains(other.anchor) && self.contains(other.extent)
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.anchor.row <= other.extent.row
            && other.anchor.row <= self.extent.row
            && self.anchor.column <= other.extent.column
            && other.anchor.column <= self.extent.column
    }

    /// Every location covered, row-major.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (self.anchor.row..=self.extent.row).flat_map(move |row| {
            (self.anchor.column..=self.extent.column).map(move |column| Location::new(row, column))
        })
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.anchor, self.extent)
    }
}
