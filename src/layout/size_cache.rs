//! Span pixel-size cache.
//!
//! Entries are keyed by `(span anchor, reload generation)` so a stale size can
//! never be served after a reload, and the whole cache is dropped when the
//! generation moves on. Eviction is insertion-order: lookups do not promote
//! entries.

use std::collections::{HashMap, VecDeque};

use crate::types::{Location, Size};

type Key = (Location, u64);

#[derive(Debug)]
pub struct SpanSizeCache {
    entries: HashMap<Key, Size>,
    order: VecDeque<Key>,
    capacity: usize,
    generation: u64,
}

impl SpanSizeCache {
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drop every entry and start serving `generation`.
    pub fn reset(&mut self, generation: u64) {
        self.entries.clear();
        self.order.clear();
        self.generation = generation;
    }

    pub fn get(&self, anchor: Location) -> Option<Size> {
        self.entries.get(&(anchor, self.generation)).copied()
    }

    /// Cached size for `anchor`, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, anchor: Location, compute: impl FnOnce() -> Size) -> Size {
        let key = (anchor, self.generation);
        if let Some(size) = self.entries.get(&key) {
            return *size;
        }
        let size = compute();
        if self.capacity > 0 {
            self.entries.insert(key, size);
            self.order.push_back(key);
            self.enforce_cap();
        }
        size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict oldest entries until we're at or below capacity.
    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}
