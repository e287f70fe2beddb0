//! sheetgrid - virtualized grid layout engine
//!
//! Lays out very large grids inside a finite viewport, computing only the
//! visible subset on every scroll or resize:
//! - Frozen header rows and left/right frozen columns
//! - Merged cells, with containment and overlap checks
//! - Per-edge gridlines resolved by priority, plus cell borders
//! - Object reuse pools reconciled against each pass
//! - Optional circular (wraparound) scrolling on either axis
//!
//! The engine never draws. Each [`GridView::layout`] pass returns placements
//! (address, frame, object handle, data source template) for a compositor.
//!
//! # Usage
//!
//! ```
//! use sheetgrid::{GridOptions, GridView, Location, PaneRole, Size, StaticDataSource};
//!
//! # fn main() -> sheetgrid::Result<()> {
//! let source = StaticDataSource::new(1_000, 50).with_uniform_size(100.0, 24.0);
//! let mut view = GridView::new(source, GridOptions::default())?;
//! view.resize(Size::new(800.0, 600.0));
//! view.reload()?;
//!
//! let frame = view.layout()?;
//! let table = frame.pane(PaneRole::Table).expect("table pane");
//! assert_eq!(table.cells[0].location, Location::new(0, 0));
//! # Ok(())
//! # }
//! ```

pub mod cell_ref;
pub mod error;
pub mod gridlines;
pub mod layout;
pub mod options;
pub mod reuse;
pub mod source;
pub mod types;
pub mod view;

pub use error::{Result, SheetGridError};
pub use gridlines::{Edge, GridLayout};
pub use layout::{LayoutProperties, PaneRole};
pub use options::{CircularOptions, GridOptions};
pub use reuse::{ObjectId, ObjectKind, Reuse};
pub use source::{CellContent, DataSource, GridDefinition, StaticDataSource};
pub use types::*;
pub use view::{BorderPlacement, GridView, LayoutFrame, LinePlacement, PaneFrame, Placement, ScrollPosition};

/// Get version information
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
