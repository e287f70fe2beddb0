//! Gridline and border resolution for one pane pass.
//!
//! Every laid-out cell claims the four edges around it. Two adjacent cells
//! share an edge, so an edge can be claimed twice; the claim with the higher
//! [`GridStyle::priority`] wins and ties keep the first claim. Cells are fed
//! in row-major walk order, which makes the result deterministic.
//!
//! Horizontal edges are keyed by the address of the cell below them and
//! vertical edges by the address of the cell to their right, so the bottom
//! edge of one cell and the top edge of the next resolve to the same key.

use std::collections::HashMap;

use crate::layout::{OffsetRecords, PaneAxis};
use crate::types::{Address, Borders, Color, GridStyle, Gridlines, Point, Rect, Size};

/// Which side of its cell a segment was claimed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// One resolved gridline segment, in pane content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Line thickness; 0 means the edge resolved to no line.
    pub width: f64,
    pub color: Color,
    /// Start of the segment's center line
    pub origin: Point,
    pub length: f64,
    pub edge: Edge,
    pub priority: u32,
}

impl GridLayout {
    /// Bounding rectangle of the stroked segment.
    pub fn frame(&self) -> Rect {
        let half = self.width / 2.0;
        if self.edge.is_horizontal() {
            Rect::new(self.origin.x, self.origin.y - half, self.length, self.width)
        } else {
            Rect::new(self.origin.x - half, self.origin.y, self.width, self.length)
        }
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

/// A cell whose border object should be placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderRequest {
    pub address: Address,
    pub frame: Rect,
    pub borders: Borders,
}

/// Claims collected in first-seen order.
#[derive(Debug, Default)]
struct Claims {
    order: Vec<(Address, GridLayout)>,
    index: HashMap<Address, usize>,
}

impl Claims {
    fn claim(&mut self, key: Address, layout: GridLayout) {
        if let Some(&slot) = self.index.get(&key) {
            if let Some((_, existing)) = self.order.get_mut(slot) {
                if layout.priority > existing.priority {
                    *existing = layout;
                }
            }
            return;
        }
        self.index.insert(key, self.order.len());
        self.order.push((key, layout));
    }

    fn into_visible(self) -> Vec<(Address, GridLayout)> {
        self.order.into_iter().filter(|(_, layout)| layout.is_visible()).collect()
    }
}

/// Per-pass resolver for one pane.
#[derive(Debug)]
pub struct GridlineResolver<'a> {
    default_style: GridStyle,
    spacing: Size,
    rows: &'a PaneAxis,
    columns: &'a PaneAxis,
    horizontal: Claims,
    vertical: Claims,
    borders: Vec<BorderRequest>,
}

/// Output of a resolved pass.
#[derive(Debug, Default)]
pub struct ResolvedLines {
    pub horizontal: Vec<(Address, GridLayout)>,
    pub vertical: Vec<(Address, GridLayout)>,
    pub borders: Vec<BorderRequest>,
}

impl<'a> GridlineResolver<'a> {
    /// `rows`/`columns` are the pane's axes. Their records give each edge
    /// piece its geometry and their cycles map extended indices back to
    /// logical ones for the edge keys.
    pub fn new(
        default_style: GridStyle,
        spacing: Size,
        rows: &'a PaneAxis,
        columns: &'a PaneAxis,
    ) -> Self {
        Self {
            default_style,
            spacing,
            rows,
            columns,
            horizontal: Claims::default(),
            vertical: Claims::default(),
            borders: Vec::new(),
        }
    }

    /// Claim the edges of one laid-out cell.
    ///
    /// `row_span`/`column_span` are the cell's extent in cells (1 unless
    /// merged); `frame` is its final frame in pane content coordinates.
    ///
    /// Edges are claimed one cell wide. A merged cell claims a piece of its
    /// top and bottom edge per covered column and a piece of its left and
    /// right edge per covered row, so each piece competes with the claim of
    /// the single cell on the other side.
    pub fn add_cell(
        &mut self,
        address: Address,
        row_span: usize,
        column_span: usize,
        frame: Rect,
        gridlines: &Gridlines,
        borders: &Borders,
    ) {
        let half_w = self.spacing.width / 2.0;
        let half_h = self.spacing.height / 2.0;
        let top = frame.y - half_h;
        let bottom = frame.max_y() + half_h;
        let left = frame.x - half_w;
        let right = frame.max_x() + half_w;
        let below = address.row_index + row_span;
        let after = address.column_index + column_span;

        let columns = pieces(
            &self.columns.records,
            address.column_index,
            column_span,
            self.spacing.width,
        );
        for (column, x, length) in columns {
            let top_line = self.layout(&gridlines.top, Edge::Top, Point::new(x, top), length);
            let top_key = self.key(address.row_index, column);
            self.horizontal.claim(top_key, top_line);
            let bottom_line = self.layout(&gridlines.bottom, Edge::Bottom, Point::new(x, bottom), length);
            let bottom_key = self.key(below, column);
            self.horizontal.claim(bottom_key, bottom_line);
        }

        let rows = pieces(&self.rows.records, address.row_index, row_span, self.spacing.height);
        for (row, y, length) in rows {
            let left_line = self.layout(&gridlines.left, Edge::Left, Point::new(left, y), length);
            let left_key = self.key(row, address.column_index);
            self.vertical.claim(left_key, left_line);
            let right_line = self.layout(&gridlines.right, Edge::Right, Point::new(right, y), length);
            let right_key = self.key(row, after);
            self.vertical.claim(right_key, right_line);
        }

        if borders.has_border() {
            self.borders.push(BorderRequest {
                address,
                frame,
                borders: *borders,
            });
        }
    }

    pub fn finish(self) -> ResolvedLines {
        ResolvedLines {
            horizontal: self.horizontal.into_visible(),
            vertical: self.vertical.into_visible(),
            borders: self.borders,
        }
    }

    fn key(&self, row_index: usize, column_index: usize) -> Address {
        Address::from_extended(row_index, column_index, self.rows.cycle, self.columns.cycle)
    }

    fn layout(&self, style: &GridStyle, edge: Edge, origin: Point, length: f64) -> GridLayout {
        let (width, color) = style.resolve(&self.default_style);
        GridLayout {
            width,
            color,
            origin,
            length,
            edge,
            priority: style.priority(),
        }
    }
}

/// One-cell pieces of an edge running along `count` indices from `first`:
/// `(extended index, start, length)`, each centred in the spacing.
fn pieces(
    records: &OffsetRecords,
    first: usize,
    count: usize,
    spacing: f64,
) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
    let half = spacing / 2.0;
    (first..first + count).filter_map(move |index| {
        let start = records.offset_of(index)?;
        let size = records.size_of(index)?;
        Some((index, start - half, size + spacing))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{AxisCycle, BorderStyle, Location};

    const RED: Color = Color::rgb(255, 0, 0);

    /// `count` uniform indices starting at 0.
    fn axis(count: usize, size: f64, spacing: f64) -> PaneAxis {
        PaneAxis {
            records: OffsetRecords::build(0, count, AxisCycle::default(), spacing, |_| size),
            cycle: AxisCycle::default(),
        }
    }

    /// Resolver over a square grid of 100px cells.
    fn resolver(grid: &PaneAxis) -> GridlineResolver<'_> {
        GridlineResolver::new(GridStyle::solid(1.0, Color::GRID_LINE), Size::ZERO, grid, grid)
    }

    fn addr(row: usize, column: usize) -> Address {
        Address::logical(Location::new(row, column))
    }

    fn cell_frame(row: usize, column: usize) -> Rect {
        Rect::new(column as f64 * 100.0, row as f64 * 100.0, 100.0, 100.0)
    }

    fn vertical_at(lines: &ResolvedLines, key: Address) -> Option<GridLayout> {
        lines.vertical.iter().find(|(a, _)| *a == key).map(|(_, l)| *l)
    }

    #[test]
    fn test_solid_beats_none() {
        let grid = axis(4, 100.0, 0.0);
        let mut r = resolver(&grid);
        let none_right = Gridlines {
            right: GridStyle::None,
            ..Gridlines::default()
        };
        let solid_left = Gridlines {
            left: GridStyle::solid(2.0, RED),
            ..Gridlines::default()
        };
        r.add_cell(addr(0, 0), 1, 1, cell_frame(0, 0), &none_right, &Borders::default());
        r.add_cell(addr(0, 1), 1, 1, cell_frame(0, 1), &solid_left, &Borders::default());
        let lines = r.finish();

        let shared = vertical_at(&lines, addr(0, 1)).unwrap();
        assert_eq!(shared.width, 2.0);
        assert_eq!(shared.color, RED);
        assert_eq!(shared.priority, GridStyle::PRIORITY_SOLID);
    }

    #[test]
    fn test_none_beats_default() {
        let none_left = Gridlines {
            left: GridStyle::None,
            ..Gridlines::default()
        };
        let none_right = Gridlines {
            right: GridStyle::None,
            ..Gridlines::default()
        };
        let grid = axis(4, 100.0, 0.0);

        // Default claimed first, explicit none second
        let mut r = resolver(&grid);
        r.add_cell(addr(0, 0), 1, 1, cell_frame(0, 0), &Gridlines::default(), &Borders::default());
        r.add_cell(addr(0, 1), 1, 1, cell_frame(0, 1), &none_left, &Borders::default());
        assert!(vertical_at(&r.finish(), addr(0, 1)).is_none());

        // Explicit none claimed first, default second
        let mut r = resolver(&grid);
        r.add_cell(addr(0, 0), 1, 1, cell_frame(0, 0), &none_right, &Borders::default());
        r.add_cell(addr(0, 1), 1, 1, cell_frame(0, 1), &Gridlines::default(), &Borders::default());
        let lines = r.finish();
        assert!(vertical_at(&lines, addr(0, 1)).is_none());
        // Untouched edges still fall back to the default style
        assert_eq!(vertical_at(&lines, addr(0, 0)).unwrap().width, 1.0);
    }

    #[test]
    fn test_ties_keep_first_claim() {
        let grid = axis(4, 100.0, 0.0);
        let mut r = resolver(&grid);
        let blue = Color::rgb(0, 0, 255);
        let a = Gridlines {
            bottom: GridStyle::solid(1.0, RED),
            ..Gridlines::default()
        };
        let b = Gridlines {
            top: GridStyle::solid(3.0, blue),
            ..Gridlines::default()
        };
        r.add_cell(addr(0, 0), 1, 1, cell_frame(0, 0), &a, &Borders::default());
        r.add_cell(addr(1, 0), 1, 1, cell_frame(1, 0), &b, &Borders::default());
        let lines = r.finish();
        let shared = lines.horizontal.iter().find(|(k, _)| *k == addr(1, 0)).unwrap().1;
        assert_eq!(shared.color, RED);
        assert_eq!(shared.edge, Edge::Bottom);
        assert_eq!(shared.origin, Point::new(0.0, 100.0));
        assert_eq!(shared.length, 100.0);
    }

    #[test]
    fn test_segments_centred_in_spacing() {
        let rows = axis(2, 50.0, 6.0);
        let columns = axis(2, 100.0, 4.0);
        let mut r = GridlineResolver::new(GridStyle::solid(2.0, RED), Size::new(4.0, 6.0), &rows, &columns);
        r.add_cell(
            addr(0, 0),
            1,
            1,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            &Gridlines::default(),
            &Borders::default(),
        );
        let lines = r.finish();
        let right = vertical_at(&lines, addr(0, 1)).unwrap();
        assert_eq!(right.origin, Point::new(102.0, -3.0));
        assert_eq!(right.length, 56.0);
        assert_eq!(right.frame(), Rect::new(101.0, -3.0, 2.0, 56.0));
    }

    #[test]
    fn test_span_edges_claimed_per_covered_cell() {
        let grid = axis(4, 100.0, 0.0);
        let mut r = resolver(&grid);
        r.add_cell(
            addr(0, 0),
            2,
            2,
            Rect::new(0.0, 0.0, 200.0, 200.0),
            &Gridlines::default(),
            &Borders::default(),
        );
        let lines = r.finish();
        let keys: Vec<Address> = lines.vertical.iter().map(|(a, _)| *a).collect();
        assert_eq!(keys, vec![addr(0, 0), addr(0, 2), addr(1, 0), addr(1, 2)]);
        assert!(lines.vertical.iter().all(|(_, l)| l.length == 100.0));

        let first = lines.horizontal.iter().find(|(a, _)| *a == addr(2, 0)).unwrap().1;
        assert_eq!(first.origin, Point::new(0.0, 200.0));
        assert_eq!(first.length, 100.0);
        let second = lines.horizontal.iter().find(|(a, _)| *a == addr(2, 1)).unwrap().1;
        assert_eq!(second.origin, Point::new(100.0, 200.0));
        assert_eq!(second.length, 100.0);
        // Interior edges are never claimed
        assert!(lines.horizontal.iter().all(|(a, _)| a.row_index != 1));
    }

    #[test]
    fn test_span_none_edge_beats_default_neighbours() {
        let grid = axis(3, 100.0, 0.0);
        let mut r = resolver(&grid);
        let none_outer = Gridlines {
            bottom: GridStyle::None,
            right: GridStyle::None,
            ..Gridlines::default()
        };
        r.add_cell(addr(0, 0), 2, 2, Rect::new(0.0, 0.0, 200.0, 200.0), &none_outer, &Borders::default());
        r.add_cell(addr(0, 2), 1, 1, cell_frame(0, 2), &Gridlines::default(), &Borders::default());
        r.add_cell(addr(1, 2), 1, 1, cell_frame(1, 2), &Gridlines::default(), &Borders::default());
        r.add_cell(addr(2, 0), 1, 1, cell_frame(2, 0), &Gridlines::default(), &Borders::default());
        r.add_cell(addr(2, 1), 1, 1, cell_frame(2, 1), &Gridlines::default(), &Borders::default());
        let lines = r.finish();

        for column in 0..2 {
            assert!(lines.horizontal.iter().all(|(a, _)| *a != addr(2, column)));
        }
        for row in 0..2 {
            assert!(vertical_at(&lines, addr(row, 2)).is_none());
        }
    }

    #[test]
    fn test_span_solid_edge_not_overdrawn() {
        let grid = axis(3, 100.0, 0.0);
        let mut r = resolver(&grid);
        let solid_bottom = Gridlines {
            bottom: GridStyle::solid(3.0, RED),
            ..Gridlines::default()
        };
        r.add_cell(addr(0, 0), 2, 2, Rect::new(0.0, 0.0, 200.0, 200.0), &solid_bottom, &Borders::default());
        r.add_cell(addr(2, 0), 1, 1, cell_frame(2, 0), &Gridlines::default(), &Borders::default());
        r.add_cell(addr(2, 1), 1, 1, cell_frame(2, 1), &Gridlines::default(), &Borders::default());
        let lines = r.finish();

        let at_bottom: Vec<GridLayout> = lines
            .horizontal
            .iter()
            .filter(|(_, l)| l.origin.y == 200.0)
            .map(|(_, l)| *l)
            .collect();
        assert_eq!(at_bottom.len(), 2);
        assert!(at_bottom.iter().all(|l| l.width == 3.0 && l.color == RED));
        assert_eq!(at_bottom[0].origin.x, 0.0);
        assert_eq!(at_bottom[1].origin.x, 100.0);
    }

    #[test]
    fn test_borders_queued_only_when_present() {
        let grid = axis(4, 100.0, 0.0);
        let mut r = resolver(&grid);
        let bordered = Borders {
            left: BorderStyle::Solid {
                width: 1.0,
                color: Color::BLACK,
            },
            ..Borders::default()
        };
        r.add_cell(addr(0, 0), 1, 1, cell_frame(0, 0), &Gridlines::default(), &Borders::default());
        r.add_cell(addr(0, 1), 1, 1, cell_frame(0, 1), &Gridlines::default(), &bordered);
        let lines = r.finish();
        assert_eq!(lines.borders.len(), 1);
        assert_eq!(lines.borders[0].address, addr(0, 1));
        assert_eq!(lines.borders[0].frame, cell_frame(0, 1));
    }

    #[test]
    fn test_default_style_none_hides_default_edges() {
        let grid = axis(1, 100.0, 0.0);
        let mut r = GridlineResolver::new(GridStyle::None, Size::ZERO, &grid, &grid);
        r.add_cell(addr(0, 0), 1, 1, cell_frame(0, 0), &Gridlines::default(), &Borders::default());
        let lines = r.finish();
        assert!(lines.horizontal.is_empty());
        assert!(lines.vertical.is_empty());
    }
}
