//! `EntityPool` — per-kind FIFO free queues of reusable instances.
//!
//! # Data layout
//!
//! ```text
//! free         : IndexMap<PrefabKind, VecDeque<(EntityHandle, T)>>
//! checked_out  : FxHashMap<EntityHandle, PrefabKind>
//! ```
//!
//! Every instance keeps the handle it was created with for its whole life.
//! A handle is in exactly one of the two maps at any time, which is what
//! makes reuse of a checked-out handle impossible.
//!
//! An empty free queue is not an error: the pool creates a fresh instance
//! and logs it, since a pool that keeps falling back is sized too small.

use std::collections::VecDeque;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use cf_core::{EntityHandle, PrefabKind, Vec2};

use crate::{PoolError, PoolResult, Poolable};

/// Creates a new instance of a prefab kind.
pub type Factory<T> = Box<dyn FnMut(PrefabKind) -> T>;

/// Running totals since the pool was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub prewarmed: u64,
    /// Spawns served from a free queue.
    pub recycled:  u64,
    /// Spawns that had to create an instance.
    pub fresh:     u64,
    pub despawned: u64,
}

/// One spawned instance, moved out to the caller.
#[derive(Debug)]
pub struct Spawned<T> {
    pub handle:   EntityHandle,
    pub instance: T,
    /// `true` if the free queue was empty and the instance was just created.
    pub fresh:    bool,
}

pub struct EntityPool<T: Poolable> {
    factory:     Factory<T>,
    free:        IndexMap<PrefabKind, VecDeque<(EntityHandle, T)>>,
    checked_out: FxHashMap<EntityHandle, PrefabKind>,
    next_handle: EntityHandle,
    stats:       PoolStats,
}

impl<T: Poolable> EntityPool<T> {
    pub fn new(factory: impl FnMut(PrefabKind) -> T + 'static) -> Self {
        Self {
            factory:     Box::new(factory),
            free:        IndexMap::new(),
            checked_out: FxHashMap::default(),
            next_handle: EntityHandle(0),
            stats:       PoolStats::default(),
        }
    }

    fn create(&mut self, kind: PrefabKind) -> (EntityHandle, T) {
        let handle = self.next_handle;
        self.next_handle = handle.next();
        (handle, (self.factory)(kind))
    }

    /// Create `count` inactive instances of `kind` ahead of time.
    pub fn prewarm(&mut self, kind: PrefabKind, count: usize) {
        for _ in 0..count {
            let (handle, mut instance) = self.create(kind);
            instance.set_movement_enabled(false);
            instance.set_active(false);
            self.free.entry(kind).or_default().push_back((handle, instance));
        }
        self.stats.prewarmed += count as u64;
        debug!(%kind, count, free = self.free_count(kind), "pool prewarmed");
    }

    /// Check out an instance of `kind` placed at `position` facing `yaw`.
    ///
    /// Recycles the oldest free instance, or creates one if none is free.
    pub fn spawn(&mut self, kind: PrefabKind, position: Vec2, yaw: f32) -> Spawned<T> {
        let recycled = self.free.get_mut(&kind).and_then(VecDeque::pop_front);
        let fresh = recycled.is_none();
        let (handle, mut instance) = match recycled {
            Some(entry) => {
                self.stats.recycled += 1;
                entry
            }
            None => {
                self.stats.fresh += 1;
                let entry = self.create(kind);
                debug!(%kind, handle = %entry.0, total_fresh = self.stats.fresh, "pool empty, created fresh instance");
                entry
            }
        };

        instance.set_movement_enabled(false);
        instance.place(position, yaw);
        instance.set_active(true);
        instance.set_movement_enabled(true);

        self.checked_out.insert(handle, kind);
        Spawned { handle, instance, fresh }
    }

    /// Return a checked-out instance.
    ///
    /// On error the instance is dropped rather than queued, since a handle
    /// that fails these checks cannot be trusted to be unique.
    pub fn despawn(&mut self, kind: PrefabKind, handle: EntityHandle, mut instance: T) -> PoolResult<()> {
        let owner = match self.checked_out.get(&handle) {
            Some(&owner) => owner,
            None => {
                let err = if handle.0 >= self.next_handle.0 {
                    PoolError::UnknownHandle(handle)
                } else {
                    PoolError::NotCheckedOut(handle)
                };
                warn!(%kind, %handle, error = %err, "invalid despawn");
                return Err(err);
            }
        };
        if owner != kind {
            let err = PoolError::KindMismatch { handle, expected: owner, actual: kind };
            warn!(%handle, error = %err, "invalid despawn");
            return Err(err);
        }

        self.checked_out.remove(&handle);
        instance.set_movement_enabled(false);
        instance.set_active(false);
        self.free.entry(kind).or_default().push_back((handle, instance));
        self.stats.despawned += 1;
        Ok(())
    }

    /// Instances of `kind` waiting in the free queue.
    pub fn free_count(&self, kind: PrefabKind) -> usize {
        self.free.get(&kind).map_or(0, VecDeque::len)
    }

    pub fn checked_out_count(&self) -> usize {
        self.checked_out.len()
    }

    pub fn is_checked_out(&self, handle: EntityHandle) -> bool {
        self.checked_out.contains_key(&handle)
    }

    /// Kinds that have ever had a free queue, in first-seen order.
    pub fn kinds(&self) -> impl Iterator<Item = PrefabKind> + '_ {
        self.free.keys().copied()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}
