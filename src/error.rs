//! Structured error types for sheetgrid.
//!
//! Configuration problems (bad counts, bad merges, bad options) are reported
//! here instead of aborting; a [`crate::GridView`] refuses to lay anything out
//! until a reload has succeeded.

use crate::types::{Axis, Location, Span};

/// All errors that can occur while validating and laying out a grid.
#[derive(Debug, thiserror::Error)]
pub enum SheetGridError {
    /// More frozen rows/columns than the axis has.
    #[error("{frozen} frozen {axis} exceed the {total} available")]
    FrozenOverflow {
        axis: Axis,
        frozen: usize,
        total: usize,
    },

    /// Left- and right-frozen columns together exceed the column count.
    #[error("{left} left-frozen and {right} right-frozen columns exceed the {total} available")]
    FrozenColumnsOverlap {
        left: usize,
        right: usize,
        total: usize,
    },

    /// A column width or row height is negative or not finite.
    #[error("invalid size {size} for {axis} {index}")]
    InvalidSize { axis: Axis, index: usize, size: f64 },

    /// A merge whose anchor is after its extent.
    #[error("invalid span {0}: anchor must not be after extent")]
    InvalidSpan(Span),

    /// A merge that reaches past the last row or column.
    #[error("span {span} is outside the {rows}x{columns} grid")]
    SpanOutOfBounds {
        span: Span,
        rows: usize,
        columns: usize,
    },

    /// A merge that crosses a frozen/scrollable boundary.
    #[error("span {span} crosses the frozen {axis} boundary")]
    SpanStraddlesFrozen { span: Span, axis: Axis },

    /// Two merges that overlap without one containing the other.
    #[error("span {span} overlaps existing span {existing}")]
    SpanOverlap { span: Span, existing: Span },

    /// Invalid A1-style cell reference.
    #[error("invalid cell reference: {0}")]
    CellRef(String),

    /// A location outside the loaded grid.
    #[error("location {location} is outside the {rows}x{columns} grid")]
    LocationOutOfRange {
        location: Location,
        rows: usize,
        columns: usize,
    },

    /// The view has no valid layout snapshot yet.
    #[error("grid has not been loaded")]
    NotLoaded,

    /// Options that cannot be honoured.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// JSON (de)serialization of options or grid definitions.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetGridError>;
