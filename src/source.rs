//! Data source contract and a static, JSON-describable implementation.
//!
//! The engine never owns grid data. It asks a [`DataSource`] for counts,
//! sizes, frozen counts, merges, and per-cell content, once per reload for
//! the structural questions and once per visible cell per pass for content.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cell_ref::{parse_cell_ref, parse_ranges};
use crate::error::{Result, SheetGridError};
use crate::types::{Borders, Gridlines, Location, Span};

/// Reuse identifier for locations whose data source returns no content.
pub const BLANK_REUSE_IDENTIFIER: &str = "blank";

/// Default column width in pixels (spreadsheet default ~64px at 100% zoom)
pub const DEFAULT_COLUMN_WIDTH: f64 = 64.0;

/// Default row height in pixels (spreadsheet default ~20px at 100% zoom)
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// What a data source supplies for one visible cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellContent<T> {
    /// Opaque payload handed back to the compositor with the placement.
    pub template: T,
    /// Pool key: objects are only reused between cells sharing it.
    pub reuse_identifier: String,
    pub gridlines: Gridlines,
    pub borders: Borders,
}

impl<T> CellContent<T> {
    pub fn new(reuse_identifier: impl Into<String>, template: T) -> Self {
        Self {
            template,
            reuse_identifier: reuse_identifier.into(),
            gridlines: Gridlines::default(),
            borders: Borders::default(),
        }
    }

    #[must_use]
    pub fn with_gridlines(mut self, gridlines: Gridlines) -> Self {
        self.gridlines = gridlines;
        self
    }

    #[must_use]
    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }
}

/// Everything the layout engine needs to know about a grid.
pub trait DataSource {
    /// Opaque per-cell payload.
    type Template;

    fn number_of_columns(&self) -> usize;

    fn number_of_rows(&self) -> usize;

    fn column_width(&self, column: usize) -> f64;

    fn row_height(&self, row: usize) -> f64;

    /// Columns frozen at the leading edge.
    fn frozen_columns(&self) -> usize {
        0
    }

    /// Columns frozen at the trailing edge.
    fn frozen_columns_right(&self) -> usize {
        0
    }

    /// Rows frozen at the top.
    fn frozen_rows(&self) -> usize {
        0
    }

    fn merged_spans(&self) -> Vec<Span> {
        Vec::new()
    }

    /// Content for a logical location; `None` lays out a blank cell.
    fn cell(&self, location: Location) -> Option<CellContent<Self::Template>>;
}

/// Serializable description of a whole grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridDefinition {
    pub rows: usize,
    pub columns: usize,
    pub default_column_width: f64,
    pub default_row_height: f64,
    /// Column index -> width
    pub column_widths: HashMap<usize, f64>,
    /// Row index -> height
    pub row_heights: HashMap<usize, f64>,
    pub frozen_columns: usize,
    pub frozen_columns_right: usize,
    pub frozen_rows: usize,
    /// Merge ranges in A1 notation ("A1:B2")
    pub merges: Vec<String>,
    /// A1 reference -> cell
    pub cells: HashMap<String, CellDefinition>,
}

impl Default for GridDefinition {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            column_widths: HashMap::new(),
            row_heights: HashMap::new(),
            frozen_columns: 0,
            frozen_columns_right: 0,
            frozen_rows: 0,
            merges: Vec::new(),
            cells: HashMap::new(),
        }
    }
}

/// One cell of a [`GridDefinition`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellDefinition {
    pub text: String,
    pub reuse_identifier: Option<String>,
    pub gridlines: Gridlines,
    pub borders: Borders,
}

/// Reuse identifier for cells of a [`StaticDataSource`] that don't name one.
pub const TEXT_REUSE_IDENTIFIER: &str = "text";

/// In-memory data source whose templates are the cell text.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticDataSource {
    rows: usize,
    columns: usize,
    default_column_width: f64,
    default_row_height: f64,
    column_widths: HashMap<usize, f64>,
    row_heights: HashMap<usize, f64>,
    frozen_columns: usize,
    frozen_columns_right: usize,
    frozen_rows: usize,
    merges: Vec<Span>,
    cells: HashMap<Location, CellContent<String>>,
}

impl StaticDataSource {
    /// A `rows` x `columns` grid with default sizes and no content.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            column_widths: HashMap::new(),
            row_heights: HashMap::new(),
            frozen_columns: 0,
            frozen_columns_right: 0,
            frozen_rows: 0,
            merges: Vec::new(),
            cells: HashMap::new(),
        }
    }

    /// Build from a parsed [`GridDefinition`].
    ///
    /// # Errors
    /// Returns [`SheetGridError::CellRef`] for a merge range or cell key that
    /// is not valid A1 notation.
    pub fn from_definition(definition: GridDefinition) -> Result<Self> {
        let merges = parse_ranges(&definition.merges.join(" "))?;
        let mut cells = HashMap::with_capacity(definition.cells.len());
        for (reference, cell) in definition.cells {
            let location =
                parse_cell_ref(&reference).ok_or_else(|| SheetGridError::CellRef(reference.clone()))?;
            let reuse_identifier = cell
                .reuse_identifier
                .unwrap_or_else(|| TEXT_REUSE_IDENTIFIER.to_string());
            let content = CellContent::new(reuse_identifier, cell.text)
                .with_gridlines(cell.gridlines)
                .with_borders(cell.borders);
            cells.insert(location, content);
        }

        Ok(Self {
            rows: definition.rows,
            columns: definition.columns,
            default_column_width: definition.default_column_width,
            default_row_height: definition.default_row_height,
            column_widths: definition.column_widths,
            row_heights: definition.row_heights,
            frozen_columns: definition.frozen_columns,
            frozen_columns_right: definition.frozen_columns_right,
            frozen_rows: definition.frozen_rows,
            merges,
            cells,
        })
    }

    /// Parse a JSON [`GridDefinition`].
    ///
    /// # Errors
    /// [`SheetGridError::Json`] for malformed JSON (including negative
    /// counts), [`SheetGridError::CellRef`] for bad A1 references.
    pub fn from_json(json: &str) -> Result<Self> {
        let definition: GridDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    #[must_use]
    pub fn with_uniform_size(mut self, column_width: f64, row_height: f64) -> Self {
        self.default_column_width = column_width;
        self.default_row_height = row_height;
        self.column_widths.clear();
        self.row_heights.clear();
        self
    }

    #[must_use]
    pub fn with_column_width(mut self, column: usize, width: f64) -> Self {
        self.column_widths.insert(column, width);
        self
    }

    #[must_use]
    pub fn with_row_height(mut self, row: usize, height: f64) -> Self {
        self.row_heights.insert(row, height);
        self
    }

    #[must_use]
    pub fn with_frozen(mut self, rows: usize, columns: usize) -> Self {
        self.frozen_rows = rows;
        self.frozen_columns = columns;
        self
    }

    #[must_use]
    pub fn with_frozen_columns_right(mut self, columns: usize) -> Self {
        self.frozen_columns_right = columns;
        self
    }

    #[must_use]
    pub fn with_merge(mut self, span: Span) -> Self {
        self.merges.push(span);
        self
    }

    #[must_use]
    pub fn with_cell(mut self, location: Location, content: CellContent<String>) -> Self {
        self.cells.insert(location, content);
        self
    }

    pub fn set_size(&mut self, rows: usize, columns: usize) {
        self.rows = rows;
        self.columns = columns;
    }

    pub fn set_frozen(&mut self, rows: usize, columns: usize, columns_right: usize) {
        self.frozen_rows = rows;
        self.frozen_columns = columns;
        self.frozen_columns_right = columns_right;
    }

    pub fn merge(&mut self, span: Span) {
        self.merges.push(span);
    }

    /// Drop every merge request that covers `location`.
    pub fn unmerge(&mut self, location: Location) {
        self.merges.retain(|span| !span.contains(location));
    }

    pub fn set_cell(&mut self, location: Location, content: CellContent<String>) {
        self.cells.insert(location, content);
    }
}

impl DataSource for StaticDataSource {
    type Template = String;

    fn number_of_columns(&self) -> usize {
        self.columns
    }

    fn number_of_rows(&self) -> usize {
        self.rows
    }

    fn column_width(&self, column: usize) -> f64 {
        self.column_widths
            .get(&column)
            .copied()
            .unwrap_or(self.default_column_width)
    }

    fn row_height(&self, row: usize) -> f64 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    fn frozen_columns(&self) -> usize {
        self.frozen_columns
    }

    fn frozen_columns_right(&self) -> usize {
        self.frozen_columns_right
    }

    fn frozen_rows(&self) -> usize {
        self.frozen_rows
    }

    fn merged_spans(&self) -> Vec<Span> {
        self.merges.clone()
    }

    fn cell(&self, location: Location) -> Option<CellContent<String>> {
        self.cells.get(&location).cloned()
    }
}
