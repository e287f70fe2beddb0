//! Common test utilities and assertion helpers.
//!
//! Builders for views over [`StaticDataSource`] grids, a brute-force
//! reference for visibility, and placement extraction helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::{BTreeMap, BTreeSet};

use sheetgrid::layout::{LayoutProperties, PaneMetrics, Repetition};
use sheetgrid::{
    GridOptions, GridView, LayoutFrame, Location, PaneRole, Placement, Point, Rect, Size, StaticDataSource,
};

/// Install a test subscriber once; `RUST_LOG=sheetgrid=trace` shows pass logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A `rows` x `columns` grid of uniform cells.
pub fn uniform_source(rows: usize, columns: usize, width: f64, height: f64) -> StaticDataSource {
    StaticDataSource::new(rows, columns).with_uniform_size(width, height)
}

/// A loaded view over `source` with default options.
pub fn loaded_view(source: StaticDataSource, size: Size) -> GridView<StaticDataSource> {
    loaded_view_with(source, GridOptions::default(), size)
}

/// A loaded view over `source` with the given options.
pub fn loaded_view_with(source: StaticDataSource, options: GridOptions, size: Size) -> GridView<StaticDataSource> {
    init_tracing();
    let mut view = GridView::new(source, options).expect("valid options");
    view.resize(size);
    view.reload().expect("valid grid");
    view
}

/// Logical locations placed in one pane, in walk order.
pub fn pane_locations<T>(frame: &LayoutFrame<T>, role: PaneRole) -> Vec<(usize, usize)> {
    frame
        .pane(role)
        .map(|pane| pane.cells.iter().map(|c| (c.location.row, c.location.column)).collect())
        .unwrap_or_default()
}

/// Placement of a logical location in one pane.
pub fn placement_at<T>(frame: &LayoutFrame<T>, role: PaneRole, row: usize, column: usize) -> &Placement<T> {
    frame
        .pane(role)
        .and_then(|pane| pane.cells.iter().find(|c| c.location == Location::new(row, column)))
        .unwrap_or_else(|| panic!("({row}, {column}) not placed in {role:?}"))
}

/// Reference answer for a grid without frozen panes or repetition: every
/// cell or span anchor whose whole-grid frame intersects `visible`.
pub fn brute_force_visible(properties: &LayoutProperties, visible: Rect) -> BTreeSet<Location> {
    let mut expected = BTreeSet::new();
    for row in 0..properties.number_of_rows {
        for column in 0..properties.number_of_columns {
            let location = Location::new(row, column);
            let anchor = properties.span_at(location).map_or(location, |span| span.anchor);
            if properties.cell_rect(location).intersects(&visible) {
                expected.insert(anchor);
            }
        }
    }
    expected
}

/// One extended index of a pane band with its band-local geometry.
#[derive(Debug, Clone, Copy)]
struct Slot {
    logical: usize,
    offset: f64,
    size: f64,
}

/// Extended indices `first..first + count` of one band. Indices at or past
/// `cycle_start` wrap every `cycle_len` indices.
#[derive(Debug)]
struct Band {
    first: usize,
    slots: Vec<Slot>,
}

impl Band {
    fn build(
        first: usize,
        count: usize,
        cycle: Option<(usize, usize)>,
        spacing: f64,
        size_of: impl Fn(usize) -> f64,
    ) -> Self {
        let mut cursor = 0.0;
        let slots = (first..first + count)
            .map(|extended| {
                let logical = match cycle {
                    Some((start, len)) if len > 0 && extended >= start => start + (extended - start) % len,
                    _ => extended,
                };
                let size = size_of(logical);
                let slot = Slot {
                    logical,
                    offset: cursor,
                    size,
                };
                cursor += size + spacing;
                slot
            })
            .collect();
        Self { first, slots }
    }

    fn slot(&self, extended: usize) -> Slot {
        extended
            .checked_sub(self.first)
            .and_then(|i| self.slots.get(i))
            .copied()
            .unwrap_or_else(|| panic!("extended index {extended} outside its band"))
    }

    fn extended(&self) -> impl Iterator<Item = (usize, Slot)> + '_ {
        self.slots.iter().enumerate().map(|(i, slot)| (self.first + i, *slot))
    }
}

fn column_band(properties: &LayoutProperties, role: PaneRole, factor: usize) -> Band {
    let width = |column| properties.column_width(column);
    let spacing = properties.spacing.width;
    let scrollable = properties.scrollable_columns();
    match role {
        PaneRole::Corner | PaneRole::RowHeader => Band::build(0, properties.frozen_columns, None, spacing, width),
        PaneRole::ColumnHeader | PaneRole::Table => Band::build(
            scrollable.start,
            scrollable.len * factor,
            Some((scrollable.start, scrollable.len)),
            spacing,
            width,
        ),
        PaneRole::CornerRight | PaneRole::RowHeaderRight => Band::build(
            properties.first_right_frozen_column(),
            properties.frozen_columns_right,
            None,
            spacing,
            width,
        ),
    }
}

fn row_band(properties: &LayoutProperties, role: PaneRole, factor: usize) -> Band {
    let height = |row| properties.row_height(row);
    let spacing = properties.spacing.height;
    let scrollable = properties.scrollable_rows();
    if role.scrolls_vertically() {
        Band::build(
            scrollable.start,
            scrollable.len * factor,
            Some((scrollable.start, scrollable.len)),
            spacing,
            height,
        )
    } else {
        Band::build(0, properties.frozen_rows, None, spacing, height)
    }
}

/// Reference answer for one pane, frozen panes and repetition included.
///
/// Scans every extended cell of the pane's bands, backs covered cells out to
/// their anchor, and keeps each anchor whose band-local frame intersects the
/// pane's visible rectangle. Keys are extended `(row_index, column_index)`;
/// values are the anchor's logical location and its band-local frame.
pub fn brute_force_pane(
    properties: &LayoutProperties,
    view_size: Size,
    repetition: Repetition,
    role: PaneRole,
    content_offset: Point,
) -> BTreeMap<(usize, usize), (Location, Rect)> {
    let frame = PaneMetrics::new(properties, view_size, repetition).frame(role);
    let visible = Rect::new(
        if role.scrolls_horizontally() { content_offset.x } else { 0.0 },
        if role.scrolls_vertically() { content_offset.y } else { 0.0 },
        frame.width,
        frame.height,
    );
    let rows = row_band(properties, role, repetition.rows);
    let columns = column_band(properties, role, repetition.columns);

    let mut expected = BTreeMap::new();
    for (row_index, row) in rows.extended() {
        for (column_index, column) in columns.extended() {
            let location = Location::new(row.logical, column.logical);
            let span = properties.span_at(location).copied();
            let anchor = span.map_or(location, |span| span.anchor);
            let extent = span.map_or(location, |span| span.extent);

            let first_row = row_index - (location.row - anchor.row);
            let last_row = row_index + (extent.row - location.row);
            let first_column = column_index - (location.column - anchor.column);
            let last_column = column_index + (extent.column - location.column);
            let (top, bottom) = (rows.slot(first_row), rows.slot(last_row));
            let (left, right) = (columns.slot(first_column), columns.slot(last_column));
            let rect = Rect::new(
                left.offset,
                top.offset,
                right.offset + right.size - left.offset,
                bottom.offset + bottom.size - top.offset,
            );
            if rect.intersects(&visible) {
                expected.insert((first_row, first_column), (anchor, rect));
            }
        }
    }
    expected
}

/// Placed cells of one pane keyed like [`brute_force_pane`].
pub fn placed_pane<T>(frame: &LayoutFrame<T>, role: PaneRole) -> BTreeMap<(usize, usize), (Location, Rect)> {
    frame
        .pane(role)
        .map(|pane| {
            pane.cells
                .iter()
                .map(|c| ((c.address.row_index, c.address.column_index), (c.location, c.frame)))
                .collect()
        })
        .unwrap_or_default()
}
