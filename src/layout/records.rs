//! Cumulative offset records for one axis of a pane.
//!
//! Records are rebuilt when content size changes (reload, frozen counts,
//! repetition factor) and searched on every scroll, so lookups are O(log n)
//! and never scan the axis.

use crate::types::AxisCycle;

/// Index of the last record that is `<= offset`, clamped to 0.
///
/// `records` must be sorted ascending. This is the starting index for a
/// window whose leading edge is at `offset`.
pub fn start_index(records: &[f64], offset: f64) -> usize {
    records.partition_point(|&r| r <= offset).saturating_sub(1)
}

/// Leading-edge offsets and sizes for a run of extended indices.
#[derive(Debug, Clone, Default)]
pub struct OffsetRecords {
    /// Extended index of the first record
    first: usize,
    /// `offsets[i]` is the leading edge of extended index `first + i`
    offsets: Vec<f64>,
    sizes: Vec<f64>,
    /// Extent of the run, including the trailing spacing
    total: f64,
}

impl OffsetRecords {
    /// Build records for `count` extended indices starting at `first`.
    ///
    /// `size_of` receives logical indices; extended indices are mapped
    /// through `cycle`, so repeated ranges reuse the logical sizes.
    pub fn build(
        first: usize,
        count: usize,
        cycle: AxisCycle,
        spacing: f64,
        size_of: impl Fn(usize) -> f64,
    ) -> Self {
        let mut offsets = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);
        let mut cursor = 0.0;
        for extended in first..first + count {
            let size = size_of(cycle.logical(extended));
            offsets.push(cursor);
            sizes.push(size);
            cursor += size + spacing;
        }
        Self {
            first,
            offsets,
            sizes,
            total: cursor,
        }
    }

    pub fn first(&self) -> usize {
        self.first
    }

    /// One past the last extended index.
    pub fn end(&self) -> usize {
        self.first + self.offsets.len()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn contains(&self, extended: usize) -> bool {
        (self.first..self.end()).contains(&extended)
    }

    /// Extended index whose record is the last one `<= offset`.
    pub fn index_at(&self, offset: f64) -> Option<usize> {
        if self.offsets.is_empty() {
            return None;
        }
        Some(self.first + start_index(&self.offsets, offset))
    }

    pub fn offset_of(&self, extended: usize) -> Option<f64> {
        self.offsets.get(extended.checked_sub(self.first)?).copied()
    }

    pub fn size_of(&self, extended: usize) -> Option<f64> {
        self.sizes.get(extended.checked_sub(self.first)?).copied()
    }

    /// Trailing edge of `extended` (offset + size, without spacing).
    pub fn end_of(&self, extended: usize) -> Option<f64> {
        Some(self.offset_of(extended)? + self.size_of(extended)?)
    }
}
