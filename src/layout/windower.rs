//! Scroll region windowing.
//!
//! Given a pane and the part of its content currently shown, find exactly the
//! cells (or span anchors) whose frames intersect it. The walk starts from a
//! binary search on each axis and stops as soon as it passes the far edges,
//! so its cost tracks the number of visible cells rather than the grid size.

use std::collections::HashSet;

use crate::layout::pane::Pane;
use crate::layout::properties::LayoutProperties;
use crate::layout::size_cache::SpanSizeCache;
use crate::types::{Address, Location, Rect, Span};

/// One visible cell or span anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleCell {
    /// Extended address of the cell, or of the span's anchor
    pub address: Address,
    /// The span this cell anchors, if merged
    pub span: Option<Span>,
    /// Frame in pane content coordinates
    pub frame: Rect,
}

impl VisibleCell {
    pub fn location(&self) -> Location {
        self.address.location()
    }

    pub fn row_span(&self) -> usize {
        self.span.map_or(1, |span| span.row_count())
    }

    pub fn column_span(&self) -> usize {
        self.span.map_or(1, |span| span.column_count())
    }
}

/// Visible cells of `pane` for the content rectangle `visible`, in row-major
/// order of their top-left corners as first reached by the walk.
///
/// Empty panes and empty rectangles produce nothing.
pub fn visible_cells(
    pane: &Pane,
    properties: &LayoutProperties,
    span_sizes: &mut SpanSizeCache,
    visible: Rect,
) -> Vec<VisibleCell> {
    let columns = &pane.columns().records;
    let rows = &pane.rows().records;
    if visible.is_empty() || columns.is_empty() || rows.is_empty() {
        return Vec::new();
    }
    let (Some(first_row), Some(first_column)) = (rows.index_at(visible.y), columns.index_at(visible.x)) else {
        return Vec::new();
    };

    let mut cells = Vec::new();
    let mut placed_spans: HashSet<Address> = HashSet::new();

    for row_index in first_row..rows.end() {
        let (Some(y), Some(height)) = (rows.offset_of(row_index), rows.size_of(row_index)) else {
            break;
        };
        if y >= visible.max_y() {
            break;
        }

        let mut column_index = first_column;
        while column_index < columns.end() {
            let (Some(x), Some(width)) = (columns.offset_of(column_index), columns.size_of(column_index)) else {
                break;
            };
            if x >= visible.max_x() {
                break;
            }

            let address = pane.address(row_index, column_index);
            if let Some(span) = properties.span_at(address.location()).copied() {
                // Back out to the anchor's extended indices in this repetition
                let anchor_row = row_index - (address.row - span.anchor.row);
                let anchor_column = column_index - (address.column - span.anchor.column);
                column_index = anchor_column + span.column_count();

                let anchor = pane.address(anchor_row, anchor_column);
                if !placed_spans.insert(anchor) {
                    continue;
                }
                let (Some(anchor_x), Some(anchor_y)) = (columns.offset_of(anchor_column), rows.offset_of(anchor_row))
                else {
                    continue;
                };
                let size = span_sizes.get_or_insert_with(span.anchor, || properties.span_size(&span));
                let frame = Rect::new(anchor_x, anchor_y, size.width, size.height);
                if frame.intersects(&visible) {
                    cells.push(VisibleCell {
                        address: anchor,
                        span: Some(span),
                        frame,
                    });
                }
                continue;
            }

            let frame = Rect::new(x, y, width, height);
            // Cells wholly left of or above the window are skipped, not reported
            if frame.intersects(&visible) {
                cells.push(VisibleCell {
                    address,
                    span: None,
                    frame,
                });
            }
            column_index += 1;
        }
    }

    tracing::trace!(role = ?pane.role(), visible = cells.len(), "pane windowed");
    cells
}

/// Cell under a point in pane content coordinates, resolved to its span's
/// anchor. Points in the spacing between cells hit nothing.
pub fn cell_at(pane: &Pane, properties: &LayoutProperties, x: f64, y: f64) -> Option<Address> {
    let columns = &pane.columns().records;
    let rows = &pane.rows().records;
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let column_index = columns.index_at(x)?;
    let row_index = rows.index_at(y)?;
    if x >= columns.end_of(column_index)? || y >= rows.end_of(row_index)? {
        return None;
    }
    let address = pane.address(row_index, column_index);
    match properties.span_at(address.location()) {
        Some(span) => Some(pane.address(
            row_index - (address.row - span.anchor.row),
            column_index - (address.column - span.anchor.column),
        )),
        None => Some(address),
    }
}
