//! Grid view: reload, scroll, resize, and the per-pass layout.
//!
//! A [`GridView`] owns the data source, the per-reload
//! [`LayoutProperties`], the panes with their live object maps, and the
//! shared reuse pools. Every layout pass is a synchronous function of the
//! current viewport, the data source, and the previous pass's live maps.

use crate::error::{Result, SheetGridError};
use crate::gridlines::{GridLayout, GridlineResolver};
use crate::layout::{
    cell_at, center_offset, recenter, repetition_factor, visible_cells, LayoutProperties, Pane,
    PaneMetrics, PaneRole, Repetition, SpanSizeCache, Viewport, VisibleCell,
};
use crate::options::GridOptions;
use crate::reuse::{LiveMap, ObjectId, Reuse, ReusePools};
use crate::source::{CellContent, DataSource, BLANK_REUSE_IDENTIFIER};
use crate::types::{Address, Borders, GridStyle, Gridlines, Location, Point, Rect, Size, Span};

const GRIDLINE_REUSE_IDENTIFIER: &str = "gridline";
const BORDER_REUSE_IDENTIFIER: &str = "border";

/// Where [`GridView::scroll_to_item`] puts the target cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPosition {
    /// Leading edge of the cell at the leading edge of the scroll area
    Start,
    Center,
    /// Trailing edge of the cell at the trailing edge of the scroll area
    End,
    /// Scroll as little as possible to bring the cell into view
    #[default]
    Nearest,
}

/// A visible cell with its object.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<T> {
    pub address: Address,
    /// Logical location (the span anchor for merged cells)
    pub location: Location,
    pub span: Option<Span>,
    /// Frame in pane content coordinates
    pub frame: Rect,
    /// Frame in view coordinates
    pub view_frame: Rect,
    pub object: ObjectId,
    pub reuse: Reuse,
    pub reuse_identifier: String,
    /// Data source payload; `None` for blank cells
    pub template: Option<T>,
}

/// A resolved gridline segment with its object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePlacement {
    /// Address of the cell below (horizontal) or right of (vertical) the line
    pub address: Address,
    pub layout: GridLayout,
    pub frame: Rect,
    pub view_frame: Rect,
    pub object: ObjectId,
    pub reuse: Reuse,
}

/// A cell border with its object, matching the cell's final frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderPlacement {
    pub address: Address,
    pub borders: Borders,
    pub frame: Rect,
    pub view_frame: Rect,
    pub object: ObjectId,
    pub reuse: Reuse,
}

/// Output of one pass for one pane.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneFrame<T> {
    pub role: PaneRole,
    /// Pane frame in view coordinates
    pub frame: Rect,
    /// Origin of the visible part of the pane's content
    pub content_offset: Point,
    pub cells: Vec<Placement<T>>,
    pub horizontal_gridlines: Vec<LinePlacement>,
    pub vertical_gridlines: Vec<LinePlacement>,
    pub borders: Vec<BorderPlacement>,
    /// Objects returned to their pools this pass
    pub removed: Vec<ObjectId>,
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutFrame<T> {
    pub panes: Vec<PaneFrame<T>>,
}

impl<T> LayoutFrame<T> {
    pub fn pane(&self, role: PaneRole) -> Option<&PaneFrame<T>> {
        self.panes.iter().find(|pane| pane.role == role)
    }

    /// Every cell placement across panes.
    pub fn cells(&self) -> impl Iterator<Item = &Placement<T>> {
        self.panes.iter().flat_map(|pane| pane.cells.iter())
    }

    /// Every object released this pass.
    pub fn removed(&self) -> impl Iterator<Item = &ObjectId> {
        self.panes.iter().flat_map(|pane| pane.removed.iter())
    }

    /// Total live objects of every kind after this pass.
    pub fn object_count(&self) -> usize {
        self.panes
            .iter()
            .map(|pane| {
                pane.cells.len() + pane.horizontal_gridlines.len() + pane.vertical_gridlines.len() + pane.borders.len()
            })
            .sum()
    }
}

/// A pane plus its live attachments.
#[derive(Debug)]
struct PaneState {
    pane: Pane,
    cells: LiveMap,
    horizontal_gridlines: LiveMap,
    vertical_gridlines: LiveMap,
    borders: LiveMap,
}

impl PaneState {
    fn new(role: PaneRole) -> Self {
        Self {
            pane: Pane::new(role),
            cells: LiveMap::new(),
            horizontal_gridlines: LiveMap::new(),
            vertical_gridlines: LiveMap::new(),
            borders: LiveMap::new(),
        }
    }
}

/// Shared, read-only inputs of one pass plus the pools it draws from.
struct PassContext<'a, D: DataSource> {
    properties: &'a LayoutProperties,
    source: &'a D,
    grid_style: GridStyle,
    pools: &'a mut ReusePools,
    span_sizes: &'a mut SpanSizeCache,
    offset: Point,
}

impl<D: DataSource> PassContext<'_, D> {
    fn lay_out(&mut self, state: &mut PaneState) -> PaneFrame<D::Template> {
        let pane = &state.pane;
        let visible = pane.visible_rect(self.offset);
        let found = visible_cells(pane, self.properties, self.span_sizes, visible);

        let mut resolver = GridlineResolver::new(
            self.grid_style,
            self.properties.spacing,
            pane.rows(),
            pane.columns(),
        );
        let mut contents: Vec<Option<CellContent<D::Template>>> = Vec::with_capacity(found.len());
        for cell in &found {
            let content = self.source.cell(cell.location());
            let (gridlines, borders) = content
                .as_ref()
                .map_or((Gridlines::default(), Borders::default()), |c| (c.gridlines, c.borders));
            resolver.add_cell(
                cell.address,
                cell.row_span(),
                cell.column_span(),
                cell.frame,
                &gridlines,
                &borders,
            );
            contents.push(content);
        }
        let lines = resolver.finish();

        let identifiers: Vec<String> = contents
            .iter()
            .map(|content| {
                content
                    .as_ref()
                    .map_or_else(|| BLANK_REUSE_IDENTIFIER.to_string(), |c| c.reuse_identifier.clone())
            })
            .collect();
        let cell_keys: Vec<(Address, &str)> = found
            .iter()
            .zip(&identifiers)
            .map(|(cell, identifier)| (cell.address, identifier.as_str()))
            .collect();
        let cell_objects = state.cells.reconcile(&mut self.pools.cells, &cell_keys);

        let horizontal_keys: Vec<(Address, &str)> = lines
            .horizontal
            .iter()
            .map(|(address, _)| (*address, GRIDLINE_REUSE_IDENTIFIER))
            .collect();
        let horizontal_objects = state
            .horizontal_gridlines
            .reconcile(&mut self.pools.horizontal_gridlines, &horizontal_keys);
        let vertical_keys: Vec<(Address, &str)> = lines
            .vertical
            .iter()
            .map(|(address, _)| (*address, GRIDLINE_REUSE_IDENTIFIER))
            .collect();
        let vertical_objects = state
            .vertical_gridlines
            .reconcile(&mut self.pools.vertical_gridlines, &vertical_keys);
        let border_keys: Vec<(Address, &str)> = lines
            .borders
            .iter()
            .map(|request| (request.address, BORDER_REUSE_IDENTIFIER))
            .collect();
        let border_objects = state.borders.reconcile(&mut self.pools.borders, &border_keys);

        let pane = &state.pane;
        let offset = self.offset;
        let cells: Vec<Placement<D::Template>> = found
            .into_iter()
            .zip(contents)
            .zip(identifiers)
            .zip(cell_objects.assigned)
            .map(|(((cell, content), reuse_identifier), (object, reuse))| {
                placement(pane, offset, cell, content, reuse_identifier, object, reuse)
            })
            .collect();
        let line_placements = |lines: Vec<(Address, GridLayout)>, objects: Vec<(ObjectId, Reuse)>| {
            lines
                .into_iter()
                .zip(objects)
                .map(|((address, layout), (object, reuse))| {
                    let frame = layout.frame();
                    LinePlacement {
                        address,
                        layout,
                        frame,
                        view_frame: pane.to_view(frame, offset),
                        object,
                        reuse,
                    }
                })
                .collect::<Vec<_>>()
        };
        let horizontal_gridlines = line_placements(lines.horizontal, horizontal_objects.assigned);
        let vertical_gridlines = line_placements(lines.vertical, vertical_objects.assigned);
        let borders: Vec<BorderPlacement> = lines
            .borders
            .into_iter()
            .zip(border_objects.assigned)
            .map(|(request, (object, reuse))| BorderPlacement {
                address: request.address,
                borders: request.borders,
                frame: request.frame,
                view_frame: pane.to_view(request.frame, offset),
                object,
                reuse,
            })
            .collect();

        let mut removed = cell_objects.removed;
        removed.extend(horizontal_objects.removed);
        removed.extend(vertical_objects.removed);
        removed.extend(border_objects.removed);

        tracing::trace!(
            role = ?pane.role(),
            cells = cells.len(),
            horizontal = horizontal_gridlines.len(),
            vertical = vertical_gridlines.len(),
            borders = borders.len(),
            removed = removed.len(),
            "pane laid out"
        );

        PaneFrame {
            role: pane.role(),
            frame: pane.frame(),
            content_offset: visible.origin(),
            cells,
            horizontal_gridlines,
            vertical_gridlines,
            borders,
            removed,
        }
    }
}

fn placement<T>(
    pane: &Pane,
    offset: Point,
    cell: VisibleCell,
    content: Option<CellContent<T>>,
    reuse_identifier: String,
    object: ObjectId,
    reuse: Reuse,
) -> Placement<T> {
    Placement {
        address: cell.address,
        location: cell.location(),
        span: cell.span,
        frame: cell.frame,
        view_frame: pane.to_view(cell.frame, offset),
        object,
        reuse,
        reuse_identifier,
        template: content.map(|c| c.template),
    }
}

/// A virtualized grid over a [`DataSource`].
pub struct GridView<D: DataSource> {
    source: D,
    options: GridOptions,
    properties: Option<LayoutProperties>,
    generation: u64,
    viewport: Viewport,
    repetition: Repetition,
    /// Circular center offset per axis (0 on non-circular axes)
    center: Point,
    panes: Vec<PaneState>,
    pools: ReusePools,
    span_sizes: SpanSizeCache,
}

impl<D: DataSource> GridView<D> {
    /// Create a view; nothing is laid out until [`reload`](Self::reload)
    /// succeeds.
    ///
    /// # Errors
    /// [`SheetGridError::InvalidOptions`] if `options` fail validation.
    pub fn new(source: D, options: GridOptions) -> Result<Self> {
        options.validate()?;
        let span_sizes = SpanSizeCache::new(options.span_cache_capacity);
        Ok(Self {
            source,
            options,
            properties: None,
            generation: 0,
            viewport: Viewport::default(),
            repetition: Repetition::default(),
            center: Point::default(),
            panes: PaneRole::ALL.into_iter().map(PaneState::new).collect(),
            pools: ReusePools::default(),
            span_sizes,
        })
    }

    pub fn data_source(&self) -> &D {
        &self.source
    }

    /// Mutable access to the data source. Call [`reload`](Self::reload)
    /// afterwards for structural changes to take effect.
    pub fn data_source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// The current layout snapshot, if a reload has succeeded.
    pub fn properties(&self) -> Option<&LayoutProperties> {
        self.properties.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    pub fn pools(&self) -> &ReusePools {
        &self.pools
    }

    /// Re-read the data source and rebuild the layout snapshot.
    ///
    /// Circular axes are scrolled to their center; other axes keep their
    /// offset, clamped to the new content.
    ///
    /// # Errors
    /// Any configuration error from [`LayoutProperties::build`]. The view
    /// then stays unloaded until a later reload succeeds.
    pub fn reload(&mut self) -> Result<()> {
        self.generation += 1;
        self.properties = None;
        let properties = LayoutProperties::build(&self.source, self.options.intercell_spacing, self.generation)?;
        self.properties = Some(properties);
        self.span_sizes.reset(self.generation);
        for state in &mut self.panes {
            state.pane.invalidate();
        }
        self.update_repetition(false);
        tracing::debug!(
            generation = self.generation,
            column_repetition = self.repetition.columns,
            row_repetition = self.repetition.rows,
            "grid reloaded"
        );
        Ok(())
    }

    /// Resize the view, keeping the visible content where it is.
    pub fn resize(&mut self, size: Size) {
        self.viewport.resize(size.width, size.height);
        self.update_repetition(true);
    }

    pub fn content_offset(&self) -> Point {
        self.viewport.content_offset()
    }

    /// Scroll to an absolute offset into the scrollable content.
    ///
    /// The offset is clamped to the content, and circular axes are
    /// recentered if it drifted too far from the middle.
    pub fn set_content_offset(&mut self, offset: Point) {
        let max = self.max_offset();
        self.viewport.set_scroll(offset.x, offset.y, max);
        self.recenter_circular_axes();
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        let max = self.max_offset();
        self.viewport.scroll_by(dx, dy, max);
        self.recenter_circular_axes();
    }

    /// Run one layout pass over every pane.
    ///
    /// # Errors
    /// [`SheetGridError::NotLoaded`] if no reload has succeeded.
    pub fn layout(&mut self) -> Result<LayoutFrame<D::Template>> {
        self.sync_panes()?;
        let properties = self.properties.as_ref().ok_or(SheetGridError::NotLoaded)?;
        let mut context = PassContext {
            properties,
            source: &self.source,
            grid_style: self.options.grid_style,
            pools: &mut self.pools,
            span_sizes: &mut self.span_sizes,
            offset: self.viewport.content_offset(),
        };
        let panes: Vec<PaneFrame<D::Template>> = self.panes.iter_mut().map(|state| context.lay_out(state)).collect();

        tracing::trace!(
            generation = self.generation,
            created = self.pools.created(),
            "layout pass complete"
        );
        Ok(LayoutFrame { panes })
    }

    /// Frame of a cell (or of the span covering it) in whole-grid content
    /// coordinates, frozen regions included.
    ///
    /// # Errors
    /// [`SheetGridError::NotLoaded`] or [`SheetGridError::LocationOutOfRange`].
    pub fn cell_rect(&self, location: Location) -> Result<Rect> {
        let properties = self.loaded_location(location)?;
        Ok(properties.cell_rect(location))
    }

    /// Logical location under a point in view coordinates, resolved to the
    /// span anchor for merged cells.
    pub fn location_at(&mut self, point: Point) -> Option<Location> {
        self.sync_panes().ok()?;
        let properties = self.properties.as_ref()?;
        let offset = self.viewport.content_offset();
        let state = self.panes.iter().find(|state| state.pane.frame().contains(point))?;
        let content = state.pane.to_content(point, offset);
        cell_at(&state.pane, properties, content.x, content.y).map(Address::location)
    }

    /// Logical locations (span anchors for merged cells) visible in any
    /// pane, sorted and without repeats.
    ///
    /// # Errors
    /// [`SheetGridError::NotLoaded`] if no reload has succeeded.
    pub fn visible_locations(&mut self) -> Result<Vec<Location>> {
        self.sync_panes()?;
        let properties = self.properties.as_ref().ok_or(SheetGridError::NotLoaded)?;
        let offset = self.viewport.content_offset();
        let mut locations: Vec<Location> = Vec::new();
        for state in &self.panes {
            let visible = state.pane.visible_rect(offset);
            locations.extend(
                visible_cells(&state.pane, properties, &mut self.span_sizes, visible)
                    .iter()
                    .map(VisibleCell::location),
            );
        }
        locations.sort_unstable();
        locations.dedup();
        Ok(locations)
    }

    /// Scroll so that `location` (or its span) is shown at `position`.
    ///
    /// Axes on which the location is frozen don't move.
    ///
    /// # Errors
    /// [`SheetGridError::NotLoaded`] or [`SheetGridError::LocationOutOfRange`].
    pub fn scroll_to_item(&mut self, location: Location, position: ScrollPosition) -> Result<()> {
        let properties = self.loaded_location(location)?;
        let rect = properties.cell_rect(location);
        let metrics = PaneMetrics::new(properties, self.viewport.size(), self.repetition);
        let extent = metrics.scroll_viewport();
        let current = self.viewport.content_offset();
        let circular = self.options.circular;

        let columns = properties.scrollable_columns();
        let mut target = current;
        if (columns.start..columns.start + columns.len).contains(&location.column) {
            let cycle = circular.horizontal.then_some(properties.scrollable_width());
            target.x = scroll_target(
                rect.x - properties.frozen_columns_width(),
                rect.width,
                current.x,
                extent.width,
                position,
                cycle,
            );
        }
        if location.row >= properties.frozen_rows {
            let cycle = circular.vertical.then_some(properties.scrollable_height());
            target.y = scroll_target(
                rect.y - properties.frozen_rows_height(),
                rect.height,
                current.y,
                extent.height,
                position,
                cycle,
            );
        }
        self.set_content_offset(target);
        Ok(())
    }

    fn loaded_location(&self, location: Location) -> Result<&LayoutProperties> {
        let properties = self.properties.as_ref().ok_or(SheetGridError::NotLoaded)?;
        if !properties.contains(location) {
            return Err(SheetGridError::LocationOutOfRange {
                location,
                rows: properties.number_of_rows,
                columns: properties.number_of_columns,
            });
        }
        Ok(properties)
    }

    fn sync_panes(&mut self) -> Result<()> {
        let properties = self.properties.as_ref().ok_or(SheetGridError::NotLoaded)?;
        let metrics = PaneMetrics::new(properties, self.viewport.size(), self.repetition);
        for state in &mut self.panes {
            state.pane.update(properties, &metrics, self.repetition);
        }
        Ok(())
    }

    fn max_offset(&self) -> Point {
        self.properties.as_ref().map_or_else(Point::default, |properties| {
            PaneMetrics::new(properties, self.viewport.size(), self.repetition).max_offset()
        })
    }

    /// Recompute repetition factors and centers for the current size.
    ///
    /// With `keep_position` the visible content stays put when a factor
    /// changes; otherwise circular axes jump to their center.
    fn update_repetition(&mut self, keep_position: bool) {
        let Some(properties) = self.properties.as_ref() else {
            return;
        };
        let circular = self.options.circular;
        let step = circular.repetition_step;
        let size = self.viewport.size();
        let available_width =
            (size.width - properties.frozen_columns_width() - properties.frozen_columns_right_width()).max(0.0);
        let available_height = (size.height - properties.frozen_rows_height()).max(0.0);
        let cycle = Size::new(properties.scrollable_width(), properties.scrollable_height());

        let repetition = Repetition {
            columns: if circular.horizontal {
                repetition_factor(cycle.width, available_width, step)
            } else {
                1
            },
            rows: if circular.vertical {
                repetition_factor(cycle.height, available_height, step)
            } else {
                1
            },
        };
        let center = Point::new(
            if circular.horizontal {
                center_offset(cycle.width, repetition.columns, step)
            } else {
                0.0
            },
            if circular.vertical {
                center_offset(cycle.height, repetition.rows, step)
            } else {
                0.0
            },
        );

        let old = self.viewport.content_offset();
        let reposition = |enabled: bool, old_offset: f64, old_center: f64, new_center: f64, cycle: f64| {
            if !enabled {
                return old_offset;
            }
            if keep_position && cycle > 0.0 {
                new_center + (old_offset - old_center).rem_euclid(cycle)
            } else {
                new_center
            }
        };
        let changed = repetition != self.repetition || !keep_position;
        let target = if changed {
            Point::new(
                reposition(circular.horizontal, old.x, self.center.x, center.x, cycle.width),
                reposition(circular.vertical, old.y, self.center.y, center.y, cycle.height),
            )
        } else {
            old
        };

        if repetition != self.repetition {
            tracing::debug!(
                columns = repetition.columns,
                rows = repetition.rows,
                "circular repetition changed"
            );
        }
        self.repetition = repetition;
        self.center = center;
        let max = self.max_offset();
        self.viewport.set_scroll(target.x, target.y, max);
        self.recenter_circular_axes();
    }

    /// Pull circular axes back toward their center.
    fn recenter_circular_axes(&mut self) {
        let Some(properties) = self.properties.as_ref() else {
            return;
        };
        let circular = self.options.circular;
        let fraction = circular.recenter_fraction;
        let mut offset = self.viewport.content_offset();
        let mut moved = false;
        if circular.horizontal {
            let total = properties.scrollable_width() * self.repetition.columns as f64;
            if let Some(x) = recenter(offset.x, self.center.x, total, fraction) {
                offset.x = x;
                moved = true;
            }
        }
        if circular.vertical {
            let total = properties.scrollable_height() * self.repetition.rows as f64;
            if let Some(y) = recenter(offset.y, self.center.y, total, fraction) {
                offset.y = y;
                moved = true;
            }
        }
        if moved {
            let max = self.max_offset();
            self.viewport.set_scroll(offset.x, offset.y, max);
        }
    }
}

/// Offset along one axis that shows `[start, start + length)` at `position`
/// within a scroll area of `extent`.
///
/// On a circular axis (`cycle` set) the occurrence nearest to `current` is
/// targeted.
fn scroll_target(
    start: f64,
    length: f64,
    current: f64,
    extent: f64,
    position: ScrollPosition,
    cycle: Option<f64>,
) -> f64 {
    let start = match cycle {
        Some(cycle) if cycle > 0.0 => start + ((current - start) / cycle).round().max(0.0) * cycle,
        _ => start,
    };
    match position {
        ScrollPosition::Start => start,
        ScrollPosition::Center => start + length / 2.0 - extent / 2.0,
        ScrollPosition::End => start + length - extent,
        ScrollPosition::Nearest => {
            if start < current {
                start
            } else if start + length > current + extent {
                start.min(start + length - extent)
            } else {
                current
            }
        }
    }
}
