//! `TickScheduler` — the set of movers the crowd visits each frame.
//!
//! The scheduler only tracks membership and visiting order.  Each mover
//! carries its own [`Cadence`][crate::Cadence] and answers `should_tick`
//! itself, so the scheduler never holds a reference into mover storage.
//!
//! # Order
//!
//! Movers are visited in registration order.  Unregistering uses
//! `swap_remove` to stay O(1), which moves the last-registered mover into
//! the vacated slot; nothing downstream may rely on the visiting order.

use cf_core::MoverId;
use indexmap::IndexSet;
use tracing::trace;

use crate::{ScheduleError, ScheduleResult};

#[derive(Debug, Default)]
pub struct TickScheduler {
    members: IndexSet<MoverId>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`.  Registering an id twice is rejected.
    pub fn register(&mut self, id: MoverId) -> ScheduleResult<()> {
        if !self.members.insert(id) {
            return Err(ScheduleError::AlreadyRegistered(id));
        }
        trace!(mover = %id, members = self.members.len(), "registered");
        Ok(())
    }

    /// Remove `id` in O(1).
    pub fn unregister(&mut self, id: MoverId) -> ScheduleResult<()> {
        if !self.members.swap_remove(&id) {
            return Err(ScheduleError::NotRegistered(id));
        }
        trace!(mover = %id, members = self.members.len(), "unregistered");
        Ok(())
    }

    pub fn contains(&self, id: MoverId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Registered ids in visiting order.
    pub fn iter(&self) -> impl Iterator<Item = MoverId> + '_ {
        self.members.iter().copied()
    }

    /// Copy this frame's visiting order into `buf` (cleared first).
    ///
    /// The crowd iterates the copy so movers can be despawned mid-frame
    /// without invalidating the walk; `buf` is reused across frames to avoid
    /// a per-frame allocation.
    pub fn frame_order(&self, buf: &mut Vec<MoverId>) {
        buf.clear();
        buf.extend(self.members.iter().copied());
    }
}
