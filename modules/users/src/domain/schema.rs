//! In-process view of the users table shape.
//!
//! The cache is a lock-free snapshot: readers never block writers and a stale
//! `Unknown` only costs one introspection round-trip.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::contract::model::{SchemaDescriptor, SchemaShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    shape: Option<SchemaShape>,
    generation: u64,
}

pub struct SchemaState {
    current: ArcSwap<Snapshot>,
}

impl Default for SchemaState {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaState {
    /// Starts `Unknown` at generation 0.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot {
                shape: None,
                generation: 0,
            }),
        }
    }

    /// Cached shape, `None` while unknown.
    pub fn known(&self) -> Option<SchemaShape> {
        self.current.load().shape
    }

    /// Cached descriptor, if the shape is known.
    pub fn descriptor(&self) -> Option<SchemaDescriptor> {
        let snap = self.current.load();
        snap.shape.map(|shape| SchemaDescriptor {
            shape,
            generation: snap.generation,
        })
    }

    /// Record a shape learned from storage or produced by a transition.
    /// The generation moves only when the shape actually changes.
    pub fn observe(&self, shape: SchemaShape) -> SchemaDescriptor {
        let prev = self.current.rcu(|snap| {
            if snap.shape == Some(shape) {
                Arc::clone(snap)
            } else {
                Arc::new(Snapshot {
                    shape: Some(shape),
                    generation: snap.generation + 1,
                })
            }
        });
        let generation = if prev.shape == Some(shape) {
            prev.generation
        } else {
            prev.generation + 1
        };
        SchemaDescriptor { shape, generation }
    }

    /// Force a fresh generation for `shape` even if it equals the cached one.
    /// Used after reset, where the table was recreated.
    pub fn replace(&self, shape: SchemaShape) -> SchemaDescriptor {
        let prev = self.current.rcu(|snap| {
            Arc::new(Snapshot {
                shape: Some(shape),
                generation: snap.generation + 1,
            })
        });
        SchemaDescriptor {
            shape,
            generation: prev.generation + 1,
        }
    }

    /// Forget the cached shape; the next reader introspects storage.
    pub fn invalidate(&self) {
        self.current.rcu(|snap| {
            Arc::new(Snapshot {
                shape: None,
                generation: snap.generation,
            })
        });
    }
}
