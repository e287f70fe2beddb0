//! Object reuse across layout passes

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::collections::{HashMap, HashSet};

use common::{loaded_view, placement_at, uniform_source};
use proptest::prelude::*;
use sheetgrid::{Address, CellContent, Location, ObjectId, ObjectKind, PaneRole, Reuse, Size};

fn count(frame: &sheetgrid::LayoutFrame<String>, reuse: Reuse) -> usize {
    frame.cells().filter(|c| c.reuse == reuse).count()
}

#[test]
fn test_scrolling_recycles_cells() {
    let mut view = loaded_view(uniform_source(100, 100, 100.0, 100.0), Size::new(300.0, 300.0));
    let first = view.layout().unwrap();
    assert_eq!(count(&first, Reuse::Created), 9);

    // Half a column further: a fourth column becomes visible
    view.scroll_by(50.0, 0.0);
    let second = view.layout().unwrap();
    assert_eq!(count(&second, Reuse::Retained), 9);
    assert_eq!(count(&second, Reuse::Created), 3);
    assert_eq!(second.removed().count(), 0);

    // Column 0 leaves, column 4 arrives and takes its objects
    view.scroll_by(100.0, 0.0);
    let third = view.layout().unwrap();
    let removed: Vec<ObjectId> = third
        .removed()
        .copied()
        .filter(|id| id.kind == ObjectKind::Cell)
        .collect();
    assert_eq!(removed.len(), 3);
    assert_eq!(count(&third, Reuse::Dequeued), 3);
    assert_eq!(count(&third, Reuse::Created), 0);
    assert_eq!(view.pools().cells.created(), 12);

    let reused: HashSet<ObjectId> = third
        .cells()
        .filter(|c| c.reuse == Reuse::Dequeued)
        .map(|c| c.object)
        .collect();
    assert_eq!(reused, removed.into_iter().collect());
}

#[test]
fn test_retained_cells_keep_their_object() {
    let mut view = loaded_view(uniform_source(50, 50, 40.0, 40.0), Size::new(200.0, 200.0));
    let before = view.layout().unwrap();
    let object = placement_at(&before, PaneRole::Table, 2, 2).object;

    view.scroll_by(30.0, 30.0);
    let after = view.layout().unwrap();
    let moved = placement_at(&after, PaneRole::Table, 2, 2);
    assert_eq!(moved.reuse, Reuse::Retained);
    assert_eq!(moved.object, object);
}

#[test]
fn test_reuse_identifier_change_swaps_object() {
    let mut view = loaded_view(uniform_source(2, 2, 100.0, 100.0), Size::new(200.0, 200.0));
    let before = view.layout().unwrap();
    let blank = placement_at(&before, PaneRole::Table, 0, 0).object;

    view.data_source_mut()
        .set_cell(Location::new(0, 0), CellContent::new("header", "Title".to_string()));
    let after = view.layout().unwrap();
    let header = placement_at(&after, PaneRole::Table, 0, 0);
    assert_eq!(header.reuse_identifier, "header");
    assert_eq!(header.reuse, Reuse::Created);
    assert_ne!(header.object, blank);
    assert!(after.removed().any(|id| *id == blank));
    assert_eq!(view.pools().cells.idle_count(), 1);
}

#[test]
fn test_shrinking_reload_reports_removed() {
    let mut view = loaded_view(uniform_source(3, 3, 100.0, 100.0), Size::new(300.0, 300.0));
    let before = view.layout().unwrap();
    let ids: HashSet<ObjectId> = before.cells().map(|c| c.object).collect();

    view.data_source_mut().set_size(1, 1);
    view.reload().unwrap();
    let after = view.layout().unwrap();
    let removed_cells: HashSet<ObjectId> = after
        .removed()
        .copied()
        .filter(|id| id.kind == ObjectKind::Cell)
        .collect();
    assert_eq!(removed_cells.len(), 8);
    assert!(removed_cells.is_subset(&ids));
    assert_eq!(after.cells().count(), 1);
    assert_eq!(after.cells().next().unwrap().reuse, Reuse::Retained);
}

#[test]
fn test_gridlines_use_their_own_pools() {
    let mut view = loaded_view(uniform_source(2, 2, 100.0, 100.0), Size::new(200.0, 200.0));
    let frame = view.layout().unwrap();
    let table = frame.pane(PaneRole::Table).unwrap();
    assert!(table
        .horizontal_gridlines
        .iter()
        .all(|l| l.object.kind == ObjectKind::HorizontalGridline));
    assert!(table
        .vertical_gridlines
        .iter()
        .all(|l| l.object.kind == ObjectKind::VerticalGridline));
    assert_eq!(view.pools().horizontal_gridlines.created(), table.horizontal_gridlines.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_objects_conserved_across_scrolls(
        steps in prop::collection::vec((-600.0f64..600.0, -600.0f64..600.0), 1..25)
    ) {
        let mut view = loaded_view(uniform_source(200, 80, 90.0, 30.0), Size::new(420.0, 260.0));
        let mut previous: HashMap<Address, ObjectId> = HashMap::new();
        let mut max_visible = 0;

        for (dx, dy) in steps {
            view.scroll_by(dx, dy);
            let frame = view.layout().unwrap();
            let cells: Vec<_> = frame.cells().collect();
            max_visible = max_visible.max(cells.len());

            // One object per address, one address per object
            let objects: HashSet<ObjectId> = cells.iter().map(|c| c.object).collect();
            prop_assert_eq!(objects.len(), cells.len());

            // A reattached object must have been released first
            let removed: HashSet<ObjectId> = frame.removed().copied().collect();
            let previous_objects: HashSet<ObjectId> = previous.values().copied().collect();
            let mut current = HashMap::new();
            for cell in &cells {
                if cell.reuse == Reuse::Retained {
                    prop_assert_eq!(previous.get(&cell.address), Some(&cell.object));
                } else if previous_objects.contains(&cell.object) {
                    prop_assert!(removed.contains(&cell.object));
                }
                current.insert(cell.address, cell.object);
            }
            previous = current;
            prop_assert!(view.pools().cells.created() <= max_visible);
        }
    }
}
