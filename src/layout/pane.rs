//! Rendering panes.
//!
//! A view is split into up to six panes that share one windowing routine and
//! differ only in which index ranges they show and which axes scroll:
//!
//! ```text
//! +--------+----------------+-------------+
//! | Corner |  ColumnHeader  | CornerRight |
//! +--------+----------------+-------------+
//! | Row    |     Table      | RowHeader   |
//! | Header |                | Right       |
//! +--------+----------------+-------------+
//! ```

use crate::layout::properties::LayoutProperties;
use crate::layout::records::OffsetRecords;
use crate::types::{Address, AxisCycle, Point, Rect, Size};

/// Role of a pane within the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaneRole {
    /// Frozen rows x left-frozen columns; never scrolls
    Corner,
    /// Frozen rows x scrollable columns; scrolls horizontally
    ColumnHeader,
    /// Scrollable rows x left-frozen columns; scrolls vertically
    RowHeader,
    /// Scrollable rows x scrollable columns
    Table,
    /// Frozen rows x right-frozen columns; never scrolls
    CornerRight,
    /// Scrollable rows x right-frozen columns; scrolls vertically
    RowHeaderRight,
}

impl PaneRole {
    /// Every role, in layout order.
    pub const ALL: [PaneRole; 6] = [
        Self::Corner,
        Self::ColumnHeader,
        Self::RowHeader,
        Self::Table,
        Self::CornerRight,
        Self::RowHeaderRight,
    ];

    pub fn scrolls_horizontally(self) -> bool {
        matches!(self, Self::ColumnHeader | Self::Table)
    }

    pub fn scrolls_vertically(self) -> bool {
        matches!(self, Self::RowHeader | Self::Table | Self::RowHeaderRight)
    }

    fn column_band(self) -> Band {
        match self {
            Self::Corner | Self::RowHeader => Band::Leading,
            Self::ColumnHeader | Self::Table => Band::Scrollable,
            Self::CornerRight | Self::RowHeaderRight => Band::Trailing,
        }
    }

    fn row_band(self) -> Band {
        match self {
            Self::Corner | Self::ColumnHeader | Self::CornerRight => Band::Leading,
            Self::RowHeader | Self::Table | Self::RowHeaderRight => Band::Scrollable,
        }
    }
}

/// Which slice of an axis a pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    /// Frozen at the leading edge
    Leading,
    /// The scrollable middle, repeated when circular
    Scrollable,
    /// Frozen at the trailing edge (columns only)
    Trailing,
}

/// How many times each axis's scrollable range is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repetition {
    pub columns: usize,
    pub rows: usize,
}

impl Default for Repetition {
    fn default() -> Self {
        Self { columns: 1, rows: 1 }
    }
}

/// Where the panes sit inside a view of a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneMetrics {
    pub leading_width: f64,
    pub trailing_width: f64,
    pub header_height: f64,
    /// Width available to the scrollable columns
    pub middle_width: f64,
    /// Height available to the scrollable rows
    pub body_height: f64,
    /// Width of the scrollable content as laid out (all repetitions)
    pub content_width: f64,
    /// Height of the scrollable content as laid out (all repetitions)
    pub content_height: f64,
}

impl PaneMetrics {
    pub fn new(properties: &LayoutProperties, view: Size, repetition: Repetition) -> Self {
        let view_width = view.width.max(0.0);
        let view_height = view.height.max(0.0);
        let leading_width = properties.frozen_columns_width().min(view_width);
        let trailing_width = properties
            .frozen_columns_right_width()
            .min(view_width - leading_width);
        let header_height = properties.frozen_rows_height().min(view_height);
        let content_width = properties.scrollable_width() * repetition.columns as f64;
        let content_height = properties.scrollable_height() * repetition.rows as f64;
        let available_width = (view_width - leading_width - trailing_width).max(0.0);

        Self {
            leading_width,
            trailing_width,
            header_height,
            // Right-frozen panes pin to the end of the content when it is narrower than the view
            middle_width: available_width.min(content_width),
            body_height: (view_height - header_height).max(0.0),
            content_width,
            content_height,
        }
    }

    /// Scrollable area of the view beyond the frozen panes.
    pub fn scroll_viewport(&self) -> Size {
        Size::new(self.middle_width, self.body_height)
    }

    /// Largest content offset that still fills the scroll viewport.
    pub fn max_offset(&self) -> Point {
        Point::new(
            (self.content_width - self.middle_width).max(0.0),
            (self.content_height - self.body_height).max(0.0),
        )
    }

    pub fn frame(&self, role: PaneRole) -> Rect {
        let x = match role.column_band() {
            Band::Leading => 0.0,
            Band::Scrollable => self.leading_width,
            Band::Trailing => self.leading_width + self.middle_width,
        };
        let width = match role.column_band() {
            Band::Leading => self.leading_width,
            Band::Scrollable => self.middle_width,
            Band::Trailing => self.trailing_width,
        };
        let (y, height) = match role.row_band() {
            Band::Leading | Band::Trailing => (0.0, self.header_height),
            Band::Scrollable => (self.header_height, self.body_height),
        };
        Rect::new(x, y, width, height)
    }
}

/// Offset records and index mapping for one axis of one pane.
#[derive(Debug, Clone, Default)]
pub struct PaneAxis {
    pub records: OffsetRecords,
    pub cycle: AxisCycle,
}

impl PaneAxis {
    /// Records for one band of an axis.
    ///
    /// `scrollable` is the axis's scrollable cycle out of `total` indices;
    /// leading-frozen indices sit before it and trailing-frozen ones after it.
    fn build(
        band: Band,
        scrollable: AxisCycle,
        total: usize,
        factor: usize,
        spacing: f64,
        size_of: impl Fn(usize) -> f64,
    ) -> Self {
        let trailing_start = scrollable.start + scrollable.len;
        let (first, count, cycle) = match band {
            Band::Leading => (0, scrollable.start, AxisCycle::default()),
            Band::Scrollable => (scrollable.start, scrollable.len * factor, scrollable),
            Band::Trailing => (
                trailing_start,
                total.saturating_sub(trailing_start),
                AxisCycle::default(),
            ),
        };
        Self {
            records: OffsetRecords::build(first, count, cycle, spacing, size_of),
            cycle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RecordsKey {
    generation: u64,
    repetition: Repetition,
}

/// Persistent state of one pane between passes.
#[derive(Debug, Clone)]
pub struct Pane {
    role: PaneRole,
    frame: Rect,
    columns: PaneAxis,
    rows: PaneAxis,
    built_for: Option<RecordsKey>,
}

impl Pane {
    pub fn new(role: PaneRole) -> Self {
        Self {
            role,
            frame: Rect::default(),
            columns: PaneAxis::default(),
            rows: PaneAxis::default(),
            built_for: None,
        }
    }

    pub fn role(&self) -> PaneRole {
        self.role
    }

    /// Frame in view coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn columns(&self) -> &PaneAxis {
        &self.columns
    }

    pub fn rows(&self) -> &PaneAxis {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.columns.records.is_empty() || self.rows.records.is_empty() || self.frame.is_empty()
    }

    /// Refresh the frame, rebuilding records only when the content changed.
    pub fn update(&mut self, properties: &LayoutProperties, metrics: &PaneMetrics, repetition: Repetition) {
        self.frame = metrics.frame(self.role);

        let key = RecordsKey {
            generation: properties.generation,
            repetition,
        };
        if self.built_for == Some(key) {
            return;
        }
        self.columns = PaneAxis::build(
            self.role.column_band(),
            properties.scrollable_columns(),
            properties.number_of_columns,
            repetition.columns,
            properties.spacing.width,
            |column| properties.column_width(column),
        );
        self.rows = PaneAxis::build(
            self.role.row_band(),
            properties.scrollable_rows(),
            properties.number_of_rows,
            repetition.rows,
            properties.spacing.height,
            |row| properties.row_height(row),
        );
        self.built_for = Some(key);
        tracing::trace!(
            role = ?self.role,
            columns = self.columns.records.len(),
            rows = self.rows.records.len(),
            "pane records rebuilt"
        );
    }

    /// Forget cached records so the next update rebuilds them.
    pub fn invalidate(&mut self) {
        self.built_for = None;
    }

    /// Part of the pane's content shown for a given scroll offset.
    pub fn visible_rect(&self, content_offset: Point) -> Rect {
        let x = if self.role.scrolls_horizontally() { content_offset.x } else { 0.0 };
        let y = if self.role.scrolls_vertically() { content_offset.y } else { 0.0 };
        Rect::new(x, y, self.frame.width, self.frame.height)
    }

    /// Convert a rectangle in pane content coordinates to view coordinates.
    pub fn to_view(&self, rect: Rect, content_offset: Point) -> Rect {
        let visible = self.visible_rect(content_offset);
        rect.offset(self.frame.x - visible.x, self.frame.y - visible.y)
    }

    /// Convert a view point to pane content coordinates.
    pub fn to_content(&self, point: Point, content_offset: Point) -> Point {
        let visible = self.visible_rect(content_offset);
        Point::new(point.x - self.frame.x + visible.x, point.y - self.frame.y + visible.y)
    }

    pub fn address(&self, row_index: usize, column_index: usize) -> Address {
        Address::from_extended(row_index, column_index, self.rows.cycle, self.columns.cycle)
    }
}
