use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Grid axis, used in error reports and per-axis configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Rows,
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => f.write_str("rows"),
            Self::Columns => f.write_str("columns"),
        }
    }
}

/// Logical grid coordinate (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub column: usize,
}

impl Location {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

impl From<Address> for Location {
    fn from(address: Address) -> Self {
        Self::new(address.row, address.column)
    }
}

/// On-screen occurrence of a logical cell.
///
/// `row`/`column` are logical; `row_index`/`column_index` are the extended
/// indices that tell repeated occurrences apart under circular scrolling.
/// Equality and hashing only look at the extended indices.
#[derive(Debug, Clone, Copy)]
pub struct Address {
    pub row: usize,
    pub column: usize,
    pub row_index: usize,
    pub column_index: usize,
}

impl Address {
    /// Build an address from extended indices, resolving the logical location
    /// through each axis cycle.
    pub fn from_extended(row_index: usize, column_index: usize, rows: AxisCycle, columns: AxisCycle) -> Self {
        Self {
            row: rows.logical(row_index),
            column: columns.logical(column_index),
            row_index,
            column_index,
        }
    }

    /// Address of a logical location that is not repeated.
    pub const fn logical(location: Location) -> Self {
        Self {
            row: location.row,
            column: location.column,
            row_index: location.row,
            column_index: location.column,
        }
    }

    pub fn location(self) -> Location {
        Location::from(self)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.row_index == other.row_index && self.column_index == other.column_index
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row_index.hash(state);
        self.column_index.hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})@[{}, {}]",
            self.row, self.column, self.row_index, self.column_index
        )
    }
}

/// Maps extended indices on one axis back to logical indices.
///
/// Indices below `start` are never repeated. From `start` on, the `len`
/// logical indices `start..start + len` repeat with period `len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisCycle {
    pub start: usize,
    pub len: usize,
}

impl AxisCycle {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Logical index of an extended index.
    pub fn logical(self, extended: usize) -> usize {
        if extended < self.start || self.len == 0 {
            return extended;
        }
        self.start + (extended - self.start) % self.len
    }

    /// Which repetition an extended index falls into (0 for the first).
    pub fn repetition(self, extended: usize) -> usize {
        if extended < self.start || self.len == 0 {
            return 0;
        }
        (extended - self.start) / self.len
    }
}
