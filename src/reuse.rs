//! Reusable object pools and per-pane reconciliation.
//!
//! The engine never creates renderable objects itself; it hands out
//! [`ObjectId`] handles that a compositor maps to its own views. An id is
//! either idle (in a [`ReusePool`]) or live (attached to exactly one address
//! in exactly one [`LiveMap`]).

use std::collections::HashMap;
use std::fmt;

use crate::types::Address;

/// Which pool an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Cell,
    HorizontalGridline,
    VerticalGridline,
    Border,
}

/// Handle to a reusable object. Unique within its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub kind: ObjectKind,
    pub serial: u64,
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.kind, self.serial)
    }
}

/// How a placement got its object this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reuse {
    /// Freshly created; the compositor must build a view for it.
    Created,
    /// Taken from the idle pool; the compositor must re-attach it.
    Dequeued,
    /// Already live at this address last pass.
    Retained,
}

/// Idle objects of one kind, grouped by reuse identifier.
#[derive(Debug)]
pub struct ReusePool {
    kind: ObjectKind,
    idle: HashMap<String, Vec<ObjectId>>,
    next_serial: u64,
    created: usize,
}

impl ReusePool {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            idle: HashMap::new(),
            next_serial: 0,
            created: 0,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Take an idle object registered under `key`, or create one.
    pub fn dequeue_or_create(&mut self, key: &str) -> (ObjectId, Reuse) {
        if let Some(id) = self.idle.get_mut(key).and_then(Vec::pop) {
            return (id, Reuse::Dequeued);
        }
        let id = ObjectId {
            kind: self.kind,
            serial: self.next_serial,
        };
        self.next_serial += 1;
        self.created += 1;
        (id, Reuse::Created)
    }

    /// Return a detached object to the pool.
    pub fn enqueue(&mut self, key: &str, id: ObjectId) {
        self.idle.entry(key.to_string()).or_default().push(id);
    }

    /// Total objects ever created by this pool.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn idle_count(&self) -> usize {
        self.idle.values().map(Vec::len).sum()
    }
}

/// The four pools shared by every pane of a view.
#[derive(Debug)]
pub struct ReusePools {
    pub cells: ReusePool,
    pub horizontal_gridlines: ReusePool,
    pub vertical_gridlines: ReusePool,
    pub borders: ReusePool,
}

impl Default for ReusePools {
    fn default() -> Self {
        Self {
            cells: ReusePool::new(ObjectKind::Cell),
            horizontal_gridlines: ReusePool::new(ObjectKind::HorizontalGridline),
            vertical_gridlines: ReusePool::new(ObjectKind::VerticalGridline),
            borders: ReusePool::new(ObjectKind::Border),
        }
    }
}

impl ReusePools {
    pub fn created(&self) -> usize {
        self.cells.created()
            + self.horizontal_gridlines.created()
            + self.vertical_gridlines.created()
            + self.borders.created()
    }
}

#[derive(Debug, Clone)]
struct LiveObject {
    id: ObjectId,
    key: String,
}

/// Result of reconciling one live map against a pass.
#[derive(Debug, Default)]
pub struct Reconciled {
    /// One entry per requested address, in request order
    pub assigned: Vec<(ObjectId, Reuse)>,
    /// Objects detached and returned to the pool
    pub removed: Vec<ObjectId>,
}

/// Address -> object attachments for one object kind in one pane.
#[derive(Debug, Default)]
pub struct LiveMap {
    objects: HashMap<Address, LiveObject>,
}

impl LiveMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, address: &Address) -> Option<ObjectId> {
        self.objects.get(address).map(|live| live.id)
    }

    /// Replace last pass's attachments with `current`.
    ///
    /// Addresses that disappeared (or whose reuse key changed) are released
    /// to `pool` first, so objects for newly visible addresses come from the
    /// pool before anything new is created.
    pub fn reconcile(&mut self, pool: &mut ReusePool, current: &[(Address, &str)]) -> Reconciled {
        let wanted: HashMap<Address, &str> = current.iter().map(|(address, key)| (*address, *key)).collect();

        let mut stale: Vec<Address> = self
            .objects
            .iter()
            .filter(|(address, live)| wanted.get(*address).map_or(true, |key| *key != live.key))
            .map(|(address, _)| *address)
            .collect();
        // Release in a fixed order so pool contents don't depend on hashing
        stale.sort_by_key(|address| (address.row_index, address.column_index));

        let mut removed = Vec::with_capacity(stale.len());
        for address in stale {
            if let Some(live) = self.objects.remove(&address) {
                pool.enqueue(&live.key, live.id);
                removed.push(live.id);
            }
        }

        let mut assigned = Vec::with_capacity(current.len());
        for (address, key) in current {
            if let Some(live) = self.objects.get(address) {
                assigned.push((live.id, Reuse::Retained));
                continue;
            }
            let (id, reuse) = pool.dequeue_or_create(key);
            self.objects.insert(
                *address,
                LiveObject {
                    id,
                    key: (*key).to_string(),
                },
            );
            assigned.push((id, reuse));
        }

        Reconciled { assigned, removed }
    }

    /// Detach everything, returning the released ids.
    pub fn release_all(&mut self, pool: &mut ReusePool) -> Vec<ObjectId> {
        self.reconcile(pool, &[]).removed
    }
}
