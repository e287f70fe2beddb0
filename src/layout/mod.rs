//! Layout engine for computing cell positions and viewport management.
//!
//! This module handles:
//! - Pre-computing per-reload layout properties (sizes, positions, spans)
//! - Per-pane offset records and binary search for the first visible index
//! - Windowed enumeration of visible cells and span anchors
//! - Circular scrolling repetition and recentering
//! - Managing viewport state (scroll position, view size)

mod circular;
mod pane;
mod properties;
mod records;
mod size_cache;
mod span_table;
mod viewport;
mod windower;

pub use circular::{center_offset, recenter, repetition_factor};
pub use pane::{Pane, PaneAxis, PaneMetrics, PaneRole, Repetition};
pub use properties::LayoutProperties;
pub use records::{start_index, OffsetRecords};
pub use size_cache::SpanSizeCache;
pub use span_table::{MergeOutcome, SpanTable};
pub use viewport::Viewport;
pub use windower::{cell_at, visible_cells, VisibleCell};
