//! Pre-computed layout data for a grid.
//!
//! Built once per reload from a [`DataSource`]: validated counts and frozen
//! configuration, per-index sizes, cumulative positions (with inter-cell
//! spacing), and the resolved span table. Read-only for every layout pass
//! until the next reload replaces it wholesale.

use crate::error::{Result, SheetGridError};
use crate::layout::span_table::{MergeOutcome, SpanTable};
use crate::source::DataSource;
use crate::types::{Axis, AxisCycle, Location, Point, Rect, Size, Span};

/// Immutable per-reload snapshot.
#[derive(Debug, Clone, Default)]
pub struct LayoutProperties {
    pub number_of_columns: usize,
    pub number_of_rows: usize,
    pub frozen_columns: usize,
    pub frozen_columns_right: usize,
    pub frozen_rows: usize,
    /// Inter-cell spacing baked into the positions
    pub spacing: Size,
    /// Reload generation this snapshot belongs to
    pub generation: u64,
    column_widths: Vec<f64>,
    row_heights: Vec<f64>,
    /// `column_positions[i]` = x of column i's left edge; one trailing entry
    column_positions: Vec<f64>,
    /// `row_positions[i]` = y of row i's top edge; one trailing entry
    row_positions: Vec<f64>,
    spans: SpanTable,
}

impl LayoutProperties {
    /// Validate a data source and build its layout snapshot.
    ///
    /// Columns are accumulated left-frozen, scrollable, then right-frozen,
    /// which is plain index order; rows likewise.
    ///
    /// # Errors
    /// - [`SheetGridError::FrozenOverflow`] / [`SheetGridError::FrozenColumnsOverlap`]
    ///   for frozen counts the grid can't hold
    /// - [`SheetGridError::InvalidSize`] for negative or non-finite sizes
    /// - [`SheetGridError::InvalidSpan`], [`SheetGridError::SpanOutOfBounds`],
    ///   [`SheetGridError::SpanStraddlesFrozen`], [`SheetGridError::SpanOverlap`]
    ///   for merges that can't be honoured
    pub fn build<D: DataSource + ?Sized>(source: &D, spacing: Size, generation: u64) -> Result<Self> {
        let number_of_columns = source.number_of_columns();
        let number_of_rows = source.number_of_rows();
        let frozen_columns = source.frozen_columns();
        let frozen_columns_right = source.frozen_columns_right();
        let frozen_rows = source.frozen_rows();

        if frozen_columns > number_of_columns {
            return Err(SheetGridError::FrozenOverflow {
                axis: Axis::Columns,
                frozen: frozen_columns,
                total: number_of_columns,
            });
        }
        if frozen_columns_right > number_of_columns {
            return Err(SheetGridError::FrozenOverflow {
                axis: Axis::Columns,
                frozen: frozen_columns_right,
                total: number_of_columns,
            });
        }
        if frozen_columns + frozen_columns_right > number_of_columns {
            return Err(SheetGridError::FrozenColumnsOverlap {
                left: frozen_columns,
                right: frozen_columns_right,
                total: number_of_columns,
            });
        }
        if frozen_rows > number_of_rows {
            return Err(SheetGridError::FrozenOverflow {
                axis: Axis::Rows,
                frozen: frozen_rows,
                total: number_of_rows,
            });
        }

        let (column_widths, column_positions) = accumulate(Axis::Columns, number_of_columns, spacing.width, |c| {
            source.column_width(c)
        })?;
        let (row_heights, row_positions) =
            accumulate(Axis::Rows, number_of_rows, spacing.height, |r| source.row_height(r))?;

        let mut properties = Self {
            number_of_columns,
            number_of_rows,
            frozen_columns,
            frozen_columns_right,
            frozen_rows,
            spacing,
            generation,
            column_widths,
            row_heights,
            column_positions,
            row_positions,
            spans: SpanTable::new(),
        };

        for span in source.merged_spans() {
            properties.validate_span(&span)?;
            if let MergeOutcome::Contained { by } = properties.spans.insert(span)? {
                tracing::debug!(span = %span, by = %by, "merge already covered by a larger span");
            }
        }

        tracing::debug!(
            generation,
            rows = number_of_rows,
            columns = number_of_columns,
            frozen_rows,
            frozen_columns,
            frozen_columns_right,
            spans = properties.spans.len(),
            "layout properties built"
        );
        Ok(properties)
    }

    /// Bounds and frozen-boundary checks for one merge request.
    fn validate_span(&self, span: &Span) -> Result<()> {
        if !span.is_well_formed() {
            return Err(SheetGridError::InvalidSpan(*span));
        }
        if span.extent.row >= self.number_of_rows || span.extent.column >= self.number_of_columns {
            return Err(SheetGridError::SpanOutOfBounds {
                span: *span,
                rows: self.number_of_rows,
                columns: self.number_of_columns,
            });
        }
        let crosses = |start: usize, end: usize, boundary: usize| start < boundary && end >= boundary;
        if crosses(span.anchor.row, span.extent.row, self.frozen_rows) {
            return Err(SheetGridError::SpanStraddlesFrozen {
                span: *span,
                axis: Axis::Rows,
            });
        }
        let right_boundary = self.number_of_columns - self.frozen_columns_right;
        if crosses(span.anchor.column, span.extent.column, self.frozen_columns)
            || crosses(span.anchor.column, span.extent.column, right_boundary)
        {
            return Err(SheetGridError::SpanStraddlesFrozen {
                span: *span,
                axis: Axis::Columns,
            });
        }
        Ok(())
    }

    pub fn spans(&self) -> &SpanTable {
        &self.spans
    }

    pub fn span_at(&self, location: Location) -> Option<&Span> {
        self.spans.span_at(location)
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_rows == 0 || self.number_of_columns == 0
    }

    pub fn contains(&self, location: Location) -> bool {
        location.row < self.number_of_rows && location.column < self.number_of_columns
    }

    /// Get column width at index (0 outside the grid)
    pub fn column_width(&self, column: usize) -> f64 {
        self.column_widths.get(column).copied().unwrap_or(0.0)
    }

    /// Get row height at index (0 outside the grid)
    pub fn row_height(&self, row: usize) -> f64 {
        self.row_heights.get(row).copied().unwrap_or(0.0)
    }

    /// Left edge of `column`; `column == number_of_columns` gives the total width.
    pub fn column_position(&self, column: usize) -> f64 {
        self.column_positions.get(column).copied().unwrap_or_else(|| self.total_width())
    }

    /// Top edge of `row`; `row == number_of_rows` gives the total height.
    pub fn row_position(&self, row: usize) -> f64 {
        self.row_positions.get(row).copied().unwrap_or_else(|| self.total_height())
    }

    /// Get total width of the grid (including trailing spacing)
    pub fn total_width(&self) -> f64 {
        self.column_positions.last().copied().unwrap_or(0.0)
    }

    /// Get total height of the grid (including trailing spacing)
    pub fn total_height(&self) -> f64 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    /// Width of the left-frozen columns (0 if none)
    pub fn frozen_columns_width(&self) -> f64 {
        self.column_position(self.frozen_columns)
    }

    /// Width of the right-frozen columns (0 if none)
    pub fn frozen_columns_right_width(&self) -> f64 {
        self.total_width() - self.column_position(self.first_right_frozen_column())
    }

    /// Height of the frozen rows (0 if none)
    pub fn frozen_rows_height(&self) -> f64 {
        self.row_position(self.frozen_rows)
    }

    pub fn first_right_frozen_column(&self) -> usize {
        self.number_of_columns - self.frozen_columns_right
    }

    /// Width of one cycle of scrollable columns.
    pub fn scrollable_width(&self) -> f64 {
        self.column_position(self.first_right_frozen_column()) - self.frozen_columns_width()
    }

    /// Height of one cycle of scrollable rows.
    pub fn scrollable_height(&self) -> f64 {
        self.total_height() - self.frozen_rows_height()
    }

    pub fn scrollable_columns(&self) -> AxisCycle {
        AxisCycle::new(
            self.frozen_columns,
            self.first_right_frozen_column() - self.frozen_columns,
        )
    }

    pub fn scrollable_rows(&self) -> AxisCycle {
        AxisCycle::new(self.frozen_rows, self.number_of_rows - self.frozen_rows)
    }

    /// Pixel size of a span: covered sizes plus the spacing between them.
    pub fn span_size(&self, span: &Span) -> Size {
        Size::new(
            self.column_position(span.extent.column + 1)
                - self.column_position(span.anchor.column)
                - self.spacing.width,
            self.row_position(span.extent.row + 1) - self.row_position(span.anchor.row) - self.spacing.height,
        )
    }

    /// Cell bounds in whole-grid coordinates, expanded to the governing span.
    pub fn cell_rect(&self, location: Location) -> Rect {
        if let Some(span) = self.spans.span_at(location) {
            let origin = Point::new(
                self.column_position(span.anchor.column),
                self.row_position(span.anchor.row),
            );
            return Rect::from_origin_size(origin, self.span_size(span));
        }
        Rect::new(
            self.column_position(location.column),
            self.row_position(location.row),
            self.column_width(location.column),
            self.row_height(location.row),
        )
    }

    /// Find column at x position (binary search)
    pub fn column_at(&self, x: f64) -> Option<usize> {
        position_index(&self.column_positions, self.number_of_columns, x)
    }

    /// Find row at y position (binary search)
    pub fn row_at(&self, y: f64) -> Option<usize> {
        position_index(&self.row_positions, self.number_of_rows, y)
    }
}

/// Sizes and cumulative positions for one axis.
fn accumulate(
    axis: Axis,
    count: usize,
    spacing: f64,
    size_of: impl Fn(usize) -> f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut sizes = Vec::with_capacity(count);
    let mut positions = Vec::with_capacity(count + 1);
    let mut cursor = 0.0;
    for index in 0..count {
        let size = size_of(index);
        if !size.is_finite() || size < 0.0 {
            return Err(SheetGridError::InvalidSize { axis, index, size });
        }
        positions.push(cursor);
        sizes.push(size);
        cursor += size + spacing;
    }
    positions.push(cursor); // Final edge
    Ok((sizes, positions))
}

fn position_index(positions: &[f64], count: usize, at: f64) -> Option<usize> {
    let total = positions.last().copied()?;
    if count == 0 || at < 0.0 || at >= total {
        return None;
    }
    Some(super::records::start_index(positions, at).min(count - 1))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::source::{StaticDataSource, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};

    fn build(source: &StaticDataSource) -> Result<LayoutProperties> {
        LayoutProperties::build(source, Size::ZERO, 0)
    }

    #[test]
    fn test_basic_layout() {
        let layout = build(&StaticDataSource::new(11, 6)).unwrap();

        assert_eq!(layout.number_of_rows, 11);
        assert_eq!(layout.number_of_columns, 6);
        assert_eq!(layout.total_width(), DEFAULT_COLUMN_WIDTH * 6.0);
        assert_eq!(layout.total_height(), DEFAULT_ROW_HEIGHT * 11.0);
    }

    #[test]
    fn test_cell_rect() {
        let layout = build(&StaticDataSource::new(11, 6)).unwrap();

        let rect = layout.cell_rect(Location::new(0, 0));
        assert_eq!(rect, Rect::new(0.0, 0.0, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT));

        let rect = layout.cell_rect(Location::new(1, 2));
        assert_eq!(rect.x, DEFAULT_COLUMN_WIDTH * 2.0);
        assert_eq!(rect.y, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_merged_cells() {
        // Merge A1:B2 (rows 0-1, cols 0-1)
        let source = StaticDataSource::new(11, 6).with_merge(Span::from_bounds(0, 0, 1, 1));
        let layout = build(&source).unwrap();

        // Every covered cell resolves to the anchor's full frame
        let expected = Rect::new(0.0, 0.0, DEFAULT_COLUMN_WIDTH * 2.0, DEFAULT_ROW_HEIGHT * 2.0);
        assert_eq!(layout.cell_rect(Location::new(0, 0)), expected);
        assert_eq!(layout.cell_rect(Location::new(1, 1)), expected);
        assert_eq!(layout.spans().len(), 1);
    }

    #[test]
    fn test_span_size_includes_spacing() {
        let source = StaticDataSource::new(4, 4)
            .with_uniform_size(100.0, 50.0)
            .with_merge(Span::from_bounds(0, 0, 2, 1));
        let layout = LayoutProperties::build(&source, Size::new(2.0, 1.0), 0).unwrap();
        let span = *layout.span_at(Location::new(2, 1)).unwrap();
        assert_eq!(layout.span_size(&span), Size::new(202.0, 152.0));
        assert_eq!(layout.total_width(), 408.0);
        assert_eq!(layout.column_position(1), 102.0);
    }

    #[test]
    fn test_frozen_extents() {
        let source = StaticDataSource::new(10, 8)
            .with_uniform_size(10.0, 5.0)
            .with_frozen(2, 1)
            .with_frozen_columns_right(2);
        let layout = build(&source).unwrap();
        assert_eq!(layout.frozen_columns_width(), 10.0);
        assert_eq!(layout.frozen_columns_right_width(), 20.0);
        assert_eq!(layout.frozen_rows_height(), 10.0);
        assert_eq!(layout.scrollable_width(), 50.0);
        assert_eq!(layout.scrollable_height(), 40.0);
        assert_eq!(layout.scrollable_columns(), AxisCycle::new(1, 5));
        assert_eq!(layout.scrollable_rows(), AxisCycle::new(2, 8));
    }

    #[test]
    fn test_row_and_column_at() {
        let layout = build(&StaticDataSource::new(11, 6)).unwrap();

        assert_eq!(layout.row_at(0.0), Some(0));
        assert_eq!(layout.row_at(10.0), Some(0));
        assert_eq!(layout.row_at(DEFAULT_ROW_HEIGHT), Some(1));
        assert_eq!(layout.row_at(DEFAULT_ROW_HEIGHT * 2.5), Some(2));
        assert_eq!(layout.row_at(-1.0), None);
        assert_eq!(layout.row_at(DEFAULT_ROW_HEIGHT * 11.0), None);
        assert_eq!(layout.column_at(32.0), Some(0));
        assert_eq!(layout.column_at(DEFAULT_COLUMN_WIDTH * 2.5), Some(2));
    }

    #[test]
    fn test_frozen_overflow() {
        let err = build(&StaticDataSource::new(3, 3).with_frozen(4, 0)).unwrap_err();
        assert!(matches!(
            err,
            SheetGridError::FrozenOverflow {
                axis: Axis::Rows,
                frozen: 4,
                total: 3
            }
        ));
        let err = build(&StaticDataSource::new(3, 3).with_frozen(0, 2).with_frozen_columns_right(2)).unwrap_err();
        assert!(matches!(err, SheetGridError::FrozenColumnsOverlap { .. }));
    }

    #[test]
    fn test_merge_straddling_frozen_boundary() {
        let source = StaticDataSource::new(5, 5)
            .with_frozen(1, 0)
            .with_merge(Span::from_bounds(0, 0, 1, 0));
        assert!(matches!(
            build(&source).unwrap_err(),
            SheetGridError::SpanStraddlesFrozen { axis: Axis::Rows, .. }
        ));

        let source = StaticDataSource::new(5, 5)
            .with_frozen_columns_right(1)
            .with_merge(Span::from_bounds(2, 3, 2, 4));
        assert!(matches!(
            build(&source).unwrap_err(),
            SheetGridError::SpanStraddlesFrozen { axis: Axis::Columns, .. }
        ));

        // Entirely inside the frozen region is fine
        let source = StaticDataSource::new(5, 5)
            .with_frozen(2, 2)
            .with_merge(Span::from_bounds(0, 0, 1, 1));
        assert!(build(&source).is_ok());
    }

    #[test]
    fn test_merge_out_of_bounds_and_overlap() {
        let source = StaticDataSource::new(2, 2).with_merge(Span::from_bounds(0, 0, 2, 0));
        assert!(matches!(build(&source).unwrap_err(), SheetGridError::SpanOutOfBounds { .. }));

        let source = StaticDataSource::new(5, 5)
            .with_merge(Span::from_bounds(0, 0, 1, 1))
            .with_merge(Span::from_bounds(1, 1, 2, 2));
        assert!(matches!(build(&source).unwrap_err(), SheetGridError::SpanOverlap { .. }));
    }

    #[test]
    fn test_invalid_size() {
        let source = StaticDataSource::new(2, 2).with_column_width(1, -5.0);
        assert!(matches!(
            build(&source).unwrap_err(),
            SheetGridError::InvalidSize {
                axis: Axis::Columns,
                index: 1,
                ..
            }
        ));
        let source = StaticDataSource::new(2, 2).with_row_height(0, f64::NAN);
        assert!(matches!(
            build(&source).unwrap_err(),
            SheetGridError::InvalidSize { axis: Axis::Rows, .. }
        ));
    }

    #[test]
    fn test_empty_grid() {
        let layout = build(&StaticDataSource::new(0, 0)).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.total_width(), 0.0);
        assert_eq!(layout.column_at(0.0), None);
    }
}
