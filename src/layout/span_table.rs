//! Merged-cell lookup.
//!
//! Every location covered by a span maps straight to that span, so "which
//! span governs this cell" is one hash lookup regardless of span size.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SheetGridError};
use crate::types::{Location, Span};

/// What happened to a span handed to [`SpanTable::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The span was added; any spans it fully contained were removed.
    Inserted { replaced: Vec<Span> },
    /// An existing span already contains this one; nothing changed.
    Contained { by: Span },
}

/// Resolved set of non-overlapping spans.
#[derive(Debug, Clone, Default)]
pub struct SpanTable {
    /// Location -> governing span, for every covered location
    covering: HashMap<Location, Span>,
    /// Anchor -> span, ordered for deterministic iteration
    anchors: BTreeMap<Location, Span>,
}

impl SpanTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a span.
    ///
    /// A span that fully contains existing spans replaces them; a span that
    /// is fully contained by an existing span is dropped. Nothing is changed
    /// when an error is returned.
    ///
    /// # Errors
    /// [`SheetGridError::InvalidSpan`] when the anchor is after the extent,
    /// [`SheetGridError::SpanOverlap`] when the span partially overlaps an
    /// existing one.
    pub fn insert(&mut self, span: Span) -> Result<MergeOutcome> {
        if !span.is_well_formed() {
            return Err(SheetGridError::InvalidSpan(span));
        }

        let mut replaced: Vec<Span> = Vec::new();
        for location in span.locations() {
            let Some(existing) = self.covering.get(&location) else {
                continue;
            };
            if replaced.contains(existing) {
                continue;
            }
            if *existing == span || existing.contains_span(&span) {
                return Ok(MergeOutcome::Contained { by: *existing });
            }
            if !span.contains_span(existing) {
                return Err(SheetGridError::SpanOverlap {
                    span,
                    existing: *existing,
                });
            }
            replaced.push(*existing);
        }

        for old in &replaced {
            tracing::debug!(span = %span, replaced = %old, "merge contains existing span");
            self.remove_span(old);
        }
        for location in span.locations() {
            self.covering.insert(location, span);
        }
        self.anchors.insert(span.anchor, span);
        Ok(MergeOutcome::Inserted { replaced })
    }

    /// Remove the span covering `location`, returning it.
    pub fn remove(&mut self, location: Location) -> Option<Span> {
        let span = *self.covering.get(&location)?;
        self.remove_span(&span);
        Some(span)
    }

    fn remove_span(&mut self, span: &Span) {
        for location in span.locations() {
            self.covering.remove(&location);
        }
        self.anchors.remove(&span.anchor);
    }

    /// Span governing `location`, if any.
    pub fn span_at(&self, location: Location) -> Option<&Span> {
        self.covering.get(&location)
    }

    /// Spans ordered by anchor (row-major).
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.anchors.values()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn clear(&mut self) {
        self.covering.clear();
        self.anchors.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_any_covered_location() {
        let mut table = SpanTable::new();
        let span = Span::from_bounds(1, 1, 2, 3);
        table.insert(span).unwrap();

        for location in span.locations() {
            assert_eq!(table.span_at(location), Some(&span));
        }
        assert_eq!(table.span_at(Location::new(0, 0)), None);
        assert_eq!(table.span_at(Location::new(3, 3)), None);
    }

    #[test]
    fn test_larger_span_replaces_contained() {
        let mut table = SpanTable::new();
        let small = Span::from_bounds(1, 1, 1, 2);
        let big = Span::from_bounds(0, 0, 2, 2);
        table.insert(small).unwrap();

        let outcome = table.insert(big).unwrap();
        assert_eq!(outcome, MergeOutcome::Inserted { replaced: vec![small] });
        assert_eq!(table.len(), 1);
        assert_eq!(table.span_at(Location::new(1, 1)), Some(&big));
    }

    #[test]
    fn test_contained_span_is_dropped() {
        let mut table = SpanTable::new();
        let big = Span::from_bounds(0, 0, 3, 3);
        table.insert(big).unwrap();

        let outcome = table.insert(Span::from_bounds(1, 1, 2, 2)).unwrap();
        assert_eq!(outcome, MergeOutcome::Contained { by: big });
        assert_eq!(table.spans().copied().collect::<Vec<_>>(), vec![big]);
    }

    #[test]
    fn test_partial_overlap_is_an_error() {
        let mut table = SpanTable::new();
        table.insert(Span::from_bounds(0, 0, 1, 1)).unwrap();

        let err = table.insert(Span::from_bounds(1, 1, 2, 2)).unwrap_err();
        match err {
            SheetGridError::SpanOverlap { span, existing } => {
                assert_eq!(span, Span::from_bounds(1, 1, 2, 2));
                assert_eq!(existing, Span::from_bounds(0, 0, 1, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Table untouched
        assert_eq!(table.len(), 1);
        assert_eq!(table.span_at(Location::new(2, 2)), None);
    }

    #[test]
    fn test_remove_by_any_location() {
        let mut table = SpanTable::new();
        let span = Span::from_bounds(4, 4, 5, 5);
        table.insert(span).unwrap();

        assert_eq!(table.remove(Location::new(5, 4)), Some(span));
        assert!(table.is_empty());
        assert_eq!(table.span_at(Location::new(4, 4)), None);
        assert_eq!(table.remove(Location::new(4, 4)), None);
    }

    #[test]
    fn test_malformed_span_rejected() {
        let mut table = SpanTable::new();
        assert!(matches!(
            table.insert(Span::from_bounds(3, 0, 1, 0)),
            Err(SheetGridError::InvalidSpan(_))
        ));
    }
}
