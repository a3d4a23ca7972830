//! The `Crowd` struct and its frame loop.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, info, trace};

use cf_core::{CrowdConfig, EntityHandle, FrameClock, MoverId, PrefabKind, Tier, Vec2};
use cf_field::DensityField;
use cf_mover::{Locomotion, Mover, MoverProfile, NegotiationEvent};
use cf_path::{PathRequestQueue, PathSolver};
use cf_pool::{EntityPool, Poolable};
use cf_schedule::TickScheduler;
use cf_space::CrowdSpace;

use crate::{CrowdObserver, FrameReport, SimError, SimResult};

/// Where a pooled mover's body came from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PoolSlot {
    kind:   PrefabKind,
    handle: EntityHandle,
}

/// Every service the movers share, owned in one place and lent out per call.
///
/// `Crowd<L, S>` drives the frame loop described in the
/// [crate docs][crate].  `L` is the movement primitive and `S` the path
/// solver.
///
/// Create via [`CrowdBuilder`][crate::CrowdBuilder].
pub struct Crowd<L: Locomotion + Poolable, S: PathSolver> {
    pub(crate) config:    CrowdConfig,
    pub(crate) clock:     FrameClock,
    pub(crate) field:     DensityField,
    pub(crate) queue:     PathRequestQueue,
    pub(crate) space:     CrowdSpace,
    pub(crate) scheduler: TickScheduler,
    pub(crate) movers:    FxHashMap<MoverId, Mover<L>>,
    pub(crate) pool:      EntityPool<L>,
    pub(crate) pooled:    FxHashMap<MoverId, PoolSlot>,
    pub(crate) profiles:  IndexMap<MoverId, MoverProfile>,
    pub(crate) solver:    S,
    pub(crate) next_id:   MoverId,
    /// Spawns that fell back to a fresh instance since the last frame.
    pub(crate) fallbacks: Vec<(MoverId, PrefabKind)>,
    /// Reused per frame.
    pub(crate) order:     Vec<MoverId>,
}

impl<L: Locomotion + Poolable, S: PathSolver> Crowd<L, S> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &CrowdConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn field(&self) -> &DensityField {
        &self.field
    }

    /// Direct access for external stamps (explosions, blocked doors, …).
    pub fn field_mut(&mut self) -> &mut DensityField {
        &mut self.field
    }

    pub fn queue(&self) -> &PathRequestQueue {
        &self.queue
    }

    pub fn space(&self) -> &CrowdSpace {
        &self.space
    }

    /// Add walls and props.  Movers are re-indexed every frame.
    pub fn space_mut(&mut self) -> &mut CrowdSpace {
        &mut self.space
    }

    pub fn pool(&self) -> &EntityPool<L> {
        &self.pool
    }

    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    pub fn mover(&self, id: MoverId) -> Option<&Mover<L>> {
        self.movers.get(&id)
    }

    pub fn mover_mut(&mut self, id: MoverId) -> Option<&mut Mover<L>> {
        self.movers.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }

    /// Registered ids in scheduler order.
    pub fn ids(&self) -> impl Iterator<Item = MoverId> + '_ {
        self.scheduler.iter()
    }

    /// The loaded profile for `id`, or the default profile.
    pub fn profile_for(&self, id: MoverId) -> MoverProfile {
        self.profiles.get(&id).cloned().unwrap_or_default()
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Register an externally owned body under its loaded profile.
    pub fn register(&mut self, id: MoverId, body: L) -> SimResult<()> {
        let profile = self.profile_for(id);
        self.register_with(id, body, profile)
    }

    /// Register an externally owned body with an explicit profile.
    pub fn register_with(&mut self, id: MoverId, body: L, profile: MoverProfile) -> SimResult<()> {
        if id == MoverId::INVALID {
            return Err(SimError::InvalidId(id));
        }
        self.scheduler.register(id)?;
        let now = self.clock.now();
        let tier = profile.tier;
        self.movers.insert(id, Mover::new(id, body, profile, &self.config, now));
        if id >= self.next_id {
            self.next_id = id.next();
        }
        info!(mover = %id, %tier, total = self.movers.len(), "mover registered");
        Ok(())
    }

    /// Remove a mover and hand its body back.  Its pending query is
    /// cancelled.
    pub fn unregister(&mut self, id: MoverId) -> SimResult<L> {
        if self.pooled.contains_key(&id) {
            return Err(SimError::Pooled(id));
        }
        self.remove(id).map(Mover::into_body)
    }

    /// Take a body of `kind` from the pool, place it, and register it under
    /// the next free id.
    pub fn spawn(&mut self, kind: PrefabKind, position: Vec2, yaw: f32, profile: MoverProfile) -> SimResult<MoverId> {
        let id = self.next_id;
        if id == MoverId::INVALID {
            return Err(SimError::InvalidId(id));
        }
        let spawned = self.pool.spawn(kind, position, yaw);
        if spawned.fresh {
            self.fallbacks.push((id, kind));
        }
        self.register_with(id, spawned.instance, profile)?;
        self.pooled.insert(id, PoolSlot { kind, handle: spawned.handle });
        Ok(id)
    }

    /// Unregister a pooled mover and return its body to the pool.
    pub fn despawn(&mut self, id: MoverId) -> SimResult<()> {
        let slot = *self.pooled.get(&id).ok_or(SimError::NotPooled(id))?;
        let mover = self.remove(id)?;
        self.pooled.remove(&id);
        self.pool.despawn(slot.kind, slot.handle, mover.into_body())?;
        debug!(mover = %id, kind = %slot.kind, "mover despawned");
        Ok(())
    }

    pub fn prewarm(&mut self, kind: PrefabKind, count: usize) {
        self.pool.prewarm(kind, count);
    }

    fn remove(&mut self, id: MoverId) -> SimResult<Mover<L>> {
        self.scheduler.unregister(id)?;
        self.queue.cancel(id);
        self.movers.remove(&id).ok_or(SimError::UnknownMover(id))
    }

    // ── Commands ──────────────────────────────────────────────────────────

    pub fn set_destination(&mut self, id: MoverId, goal: Vec2) -> SimResult<()> {
        self.movers.get_mut(&id).ok_or(SimError::UnknownMover(id))?.set_destination(goal);
        Ok(())
    }

    pub fn clear_destination(&mut self, id: MoverId) -> SimResult<()> {
        self.movers.get_mut(&id).ok_or(SimError::UnknownMover(id))?.clear_destination();
        Ok(())
    }

    /// Move a mover to another update-frequency tier.  A promotion takes
    /// effect within one new interval.
    pub fn set_tier(&mut self, id: MoverId, tier: Tier) -> SimResult<()> {
        let now = self.clock.now();
        let mover = self.movers.get_mut(&id).ok_or(SimError::UnknownMover(id))?;
        mover.set_tier(tier, &self.config.tiers, now);
        Ok(())
    }

    // ── Frame loop ────────────────────────────────────────────────────────

    /// Run `n` frames.
    pub fn run_frames<O: CrowdObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Run enough frames to cover `secs` seconds.
    pub fn run_for_secs<O: CrowdObserver>(&mut self, secs: f64, observer: &mut O) {
        let n = self.clock.frames_for_secs(secs);
        self.run_frames(n, observer);
    }

    /// Advance the crowd by one frame.
    pub fn step<O: CrowdObserver>(&mut self, observer: &mut O) -> FrameReport {
        let now = self.clock.now();
        let dt = self.clock.frame_dt;
        let mut report = FrameReport { frame: self.clock.frame, now, ..FrameReport::default() };

        observer.on_frame_start(report.frame, now);
        for (id, kind) in self.fallbacks.drain(..) {
            observer.on_pool_fallback(id, kind);
        }

        // ── ① decay, ② pump ────────────────────────────────────────────
        self.field.decay_tick(now);
        let pump = self.queue.pump(&mut self.solver, &self.field);
        report.dispatched = pump.dispatched;

        // ── ③ snapshot ────────────────────────────────────────────────
        self.space.rebuild(self.movers.values().map(Mover::snapshot));

        // ── ④ movers ──────────────────────────────────────────────────
        self.scheduler.frame_order(&mut self.order);
        for &id in &self.order {
            let Some(mover) = self.movers.get_mut(&id) else {
                continue;
            };

            if let Some(event) = mover.frame_update(now, dt, &mut self.field, &self.space) {
                report.negotiation += 1;
                observer.on_negotiation(id, &event);
                if let NegotiationEvent::Yielded { peer, retreat_to } = event {
                    debug!(mover = %id, %peer, ?retreat_to, "mover yielded");
                }
            }

            if mover.should_tick(now) {
                report.active += 1;
                let tick = mover.tick(now, &mut self.field, &mut self.queue);
                report.requested += usize::from(tick.requested.is_some());
                report.paths += usize::from(tick.path_applied);
                if let Some(error) = &tick.path_failure {
                    report.failures += 1;
                    observer.on_path_failed(id, error);
                }
                if tick.arrived {
                    report.arrivals += 1;
                    observer.on_arrival(id);
                }
            }
        }

        // ── ⑤ move ────────────────────────────────────────────────────
        let step = self.clock.dt();
        for mover in self.movers.values_mut() {
            mover.body_mut().advance(step);
            if mover.is_negotiating() {
                report.yielding += 1;
            }
        }

        trace!(
            frame = report.frame,
            active = report.active,
            requested = report.requested,
            dispatched = report.dispatched,
            yielding = report.yielding,
            "frame complete"
        );
        observer.on_frame_end(&report);
        self.clock.advance();
        report
    }
}
