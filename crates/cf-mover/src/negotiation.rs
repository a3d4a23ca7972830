//! Corridor negotiation: who backs out when two movers meet head-on.
//!
//! # Phases
//!
//! ```text
//!            head-on in a narrow corridor, and we are the yielder
//!   Idle ─────────────────────────────────────────────► Retreating
//!    ▲                                                      │ arrived / timeout
//!    │                     no retreat target                ▼
//!    │            Idle ──────────────────────────────────► Waiting
//!    │                                                      │ peer cleared / gone / max wait
//!    └──────────────────── Resuming ◄───────────────────────┘
//! ```
//!
//! `Resuming` restores the saved steering on entry and lasts one frame.
//! Every phase carries its own elapsed time, advanced by the frame `dt`;
//! nothing sleeps or spans frames implicitly.
//!
//! # Who yields
//!
//! [`decide_yielder`] is a pure function of both movers' ids and
//! priorities, so each side reaches the same answer without talking to the
//! other.

use std::cmp::Ordering;

use cf_core::geo::{in_forward_cone, left_of};
use cf_core::{MoverId, NegotiationConfig, Vec2};
use cf_path::Path;
use cf_space::{PeerSnapshot, SpaceQuery};
use tracing::{debug, trace};

use crate::{BreadcrumbTrail, Locomotion, SteeringParams};

// ── Yield rule ────────────────────────────────────────────────────────────────

/// The mover that gives way in a head-on conflict.
///
/// The numerically higher priority yields (lower numbers are more
/// important).  On equal priority the higher id yields.  Swapping the
/// arguments never changes the answer.
pub fn decide_yielder(a: MoverId, a_priority: i32, b: MoverId, b_priority: i32) -> MoverId {
    match a_priority.cmp(&b_priority) {
        Ordering::Greater => a,
        Ordering::Less    => b,
        Ordering::Equal   => a.max(b),
    }
}

/// `true` if each mover lies inside the other's forward cone.
pub fn mutual_head_on(pos: Vec2, forward: Vec2, peer: &PeerSnapshot, cone_cos: f32) -> bool {
    in_forward_cone(pos, forward, peer.position, cone_cos)
        && in_forward_cone(peer.position, peer.forward, pos, cone_cos)
}

/// Free width across `forward` at `pos`: left probe plus right probe, each
/// capped at `probe_len`.
pub fn corridor_width<S: SpaceQuery + ?Sized>(space: &S, pos: Vec2, forward: Vec2, probe_len: f32) -> f32 {
    let left = left_of(forward);
    space.probe(pos, left, probe_len) + space.probe(pos, -left, probe_len)
}

// ── Phase and events ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NegotiationPhase {
    Idle,
    /// Backing off towards `target`.
    Retreating { target: Vec2, elapsed: f64 },
    /// Stopped, watching the peer.
    Waiting { elapsed: f64 },
    /// Saved parameters restored this frame; `Idle` next frame.
    Resuming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeReason {
    /// The peer left the mutual cone.
    PeerCleared,
    /// The peer no longer exists.
    PeerGone,
    /// The wait reached its maximum.
    Timeout,
}

/// A phase change worth reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NegotiationEvent {
    /// This mover gives way to `peer`.  `retreat_to` is `None` when no
    /// retreat target was reachable and the mover holds in place instead.
    Yielded { peer: MoverId, retreat_to: Option<Vec2> },
    /// Retreat over (arrived, or `timed_out` before arriving); now waiting.
    Holding { peer: MoverId, timed_out: bool },
    /// Conflict over.  The owner should head for `destination` again.
    Resumed { peer: MoverId, reason: ResumeReason, destination: Option<Vec2> },
}

/// Per-frame inputs the negotiator reads but does not own.
pub struct NegotiationContext<'a, S: SpaceQuery + ?Sized> {
    pub me:          MoverId,
    /// The owner's current goal.  Detection only runs while there is one.
    pub destination: Option<Vec2>,
    pub trail:       &'a BreadcrumbTrail,
    pub space:       &'a S,
    pub now:         f64,
    pub dt:          f64,
}

/// State saved on yielding and restored on resuming.
#[derive(Debug, Clone, Copy)]
struct Held {
    peer:              MoverId,
    /// Heading at detection time; the cone test while waiting uses it since
    /// the retreat turns the body around.
    facing:            Vec2,
    saved_destination: Option<Vec2>,
    saved_steering:    SteeringParams,
}

// ── Negotiator ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Negotiator {
    config:         NegotiationConfig,
    phase:          NegotiationPhase,
    held:           Option<Held>,
    next_poll:      f64,
    cooldown_until: f64,
}

impl Negotiator {
    pub fn new(config: NegotiationConfig) -> Self {
        Self {
            config,
            phase:          NegotiationPhase::Idle,
            held:           None,
            next_poll:      f64::NEG_INFINITY,
            cooldown_until: f64::NEG_INFINITY,
        }
    }

    pub fn phase(&self) -> NegotiationPhase {
        self.phase
    }

    /// `true` while the negotiator, not the mover, controls the body.
    pub fn is_engaged(&self) -> bool {
        !matches!(self.phase, NegotiationPhase::Idle | NegotiationPhase::Resuming)
    }

    /// The mover being yielded to.
    pub fn peer(&self) -> Option<MoverId> {
        self.held.map(|h| h.peer)
    }

    pub fn in_cooldown(&self, now: f64) -> bool {
        now < self.cooldown_until
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Replace the destination that will be re-issued on resume.
    pub fn redirect(&mut self, destination: Option<Vec2>) {
        if let Some(held) = &mut self.held {
            held.saved_destination = destination;
        }
    }

    /// Advance one frame.
    pub fn update<L, S>(&mut self, ctx: &NegotiationContext<'_, S>, body: &mut L) -> Option<NegotiationEvent>
    where
        L: Locomotion + ?Sized,
        S: SpaceQuery + ?Sized,
    {
        match self.phase {
            NegotiationPhase::Idle => {
                if self.in_cooldown(ctx.now) || !self.poll_due(ctx.now) {
                    return None;
                }
                self.detect(ctx, body)
            }
            NegotiationPhase::Retreating { target, elapsed } => self.retreat_step(ctx, body, target, elapsed + ctx.dt),
            NegotiationPhase::Waiting { elapsed } => self.wait_step(ctx, body, elapsed + ctx.dt),
            NegotiationPhase::Resuming => {
                self.phase = NegotiationPhase::Idle;
                None
            }
        }
    }

    fn poll_due(&mut self, now: f64) -> bool {
        if now + 1e-9 < self.next_poll {
            return false;
        }
        self.next_poll = now + self.config.poll_interval();
        true
    }

    // ── Idle ──────────────────────────────────────────────────────────────

    fn detect<L, S>(&mut self, ctx: &NegotiationContext<'_, S>, body: &mut L) -> Option<NegotiationEvent>
    where
        L: Locomotion + ?Sized,
        S: SpaceQuery + ?Sized,
    {
        if ctx.destination.is_none() || !body.has_path() {
            return None;
        }
        let pos = body.position();
        let forward = match body.forward() {
            f if f == Vec2::ZERO => body.desired_direction(),
            f => f,
        };
        if forward == Vec2::ZERO {
            return None;
        }
        if corridor_width(ctx.space, pos, forward, self.config.probe_length_m) > self.config.narrow_threshold_m {
            return None;
        }

        let cone_cos = self.config.cone_cos();
        let peer = ctx
            .space
            .peers_within(pos, self.config.detection_radius_m, ctx.me)
            .into_iter()
            .filter(|p| p.has_destination && !p.yielding && mutual_head_on(pos, forward, p, cone_cos))
            .min_by(|a, b| {
                a.position
                    .distance_squared(pos)
                    .total_cmp(&b.position.distance_squared(pos))
                    .then(a.id.cmp(&b.id))
            })?;

        let mine = body.steering().avoidance_priority;
        if decide_yielder(ctx.me, mine, peer.id, peer.priority) != ctx.me {
            trace!(mover = %ctx.me, peer = %peer.id, "head-on, peer yields");
            return None;
        }
        Some(self.begin_yield(ctx, body, peer.id, forward))
    }

    fn begin_yield<L, S>(
        &mut self,
        ctx:     &NegotiationContext<'_, S>,
        body:    &mut L,
        peer:    MoverId,
        forward: Vec2,
    ) -> NegotiationEvent
    where
        L: Locomotion + ?Sized,
        S: SpaceQuery + ?Sized,
    {
        let saved = body.steering();
        self.held = Some(Held {
            peer,
            facing:            forward,
            saved_destination: ctx.destination,
            saved_steering:    saved,
        });
        body.set_steering(SteeringParams {
            speed:              saved.speed * self.config.retreat_speed_factor,
            radius:             saved.radius * self.config.retreat_radius_scale,
            avoidance_priority: self.config.retreat_priority,
        });

        let pos = body.position();
        let target = self.retreat_target(ctx, pos, forward, body.desired_direction());
        match target {
            Some(t) => {
                body.set_path(&Path::straight(pos, t));
                body.resume();
                self.phase = NegotiationPhase::Retreating { target: t, elapsed: 0.0 };
            }
            None => {
                body.stop();
                self.phase = NegotiationPhase::Waiting { elapsed: 0.0 };
                self.next_poll = ctx.now + self.config.poll_interval();
            }
        }
        debug!(mover = %ctx.me, %peer, ?target, "yielding corridor");
        NegotiationEvent::Yielded { peer, retreat_to: target }
    }

    /// Oldest breadcrumb that is within backoff range, behind, and reachable
    /// in a straight line; else a point straight back along the reverse of
    /// the desired direction.
    fn retreat_target<S: SpaceQuery + ?Sized>(
        &self,
        ctx:     &NegotiationContext<'_, S>,
        pos:     Vec2,
        forward: Vec2,
        desired: Vec2,
    ) -> Option<Vec2> {
        let cfg = &self.config;
        for crumb in ctx.trail.iter() {
            let offset = crumb - pos;
            let dist = offset.length();
            if dist < cfg.min_backoff_m || dist > cfg.max_backoff_m {
                continue;
            }
            if offset.dot(forward) / dist > cfg.behind_cos {
                continue;
            }
            if ctx.space.segment_clear(pos, crumb) {
                trace!(mover = %ctx.me, ?crumb, dist, "retreat target from breadcrumb");
                return Some(crumb);
            }
        }

        let back = if desired == Vec2::ZERO { -forward } else { -desired };
        let fallback = pos + back * cfg.fallback_backoff_m;
        if ctx.space.segment_clear(pos, fallback) {
            trace!(mover = %ctx.me, ?fallback, "retreat target from reverse direction");
            Some(fallback)
        } else {
            None
        }
    }

    // ── Retreating ────────────────────────────────────────────────────────

    fn retreat_step<L, S>(
        &mut self,
        ctx:     &NegotiationContext<'_, S>,
        body:    &mut L,
        target:  Vec2,
        elapsed: f64,
    ) -> Option<NegotiationEvent>
    where
        L: Locomotion + ?Sized,
        S: SpaceQuery + ?Sized,
    {
        let peer = self.held.map(|h| h.peer)?;
        if ctx.space.peer(peer).is_none() {
            return Some(self.resume(ctx, body, ResumeReason::PeerGone));
        }

        let arrived = !body.has_path() || body.position().distance(target) <= self.config.arrive_tolerance_m;
        if arrived || elapsed >= self.config.retreat_timeout_secs {
            body.stop();
            self.phase = NegotiationPhase::Waiting { elapsed: 0.0 };
            self.next_poll = ctx.now;
            return Some(NegotiationEvent::Holding { peer, timed_out: !arrived });
        }

        self.phase = NegotiationPhase::Retreating { target, elapsed };
        None
    }

    // ── Waiting ───────────────────────────────────────────────────────────

    fn wait_step<L, S>(
        &mut self,
        ctx:     &NegotiationContext<'_, S>,
        body:    &mut L,
        elapsed: f64,
    ) -> Option<NegotiationEvent>
    where
        L: Locomotion + ?Sized,
        S: SpaceQuery + ?Sized,
    {
        let held = self.held?;
        self.phase = NegotiationPhase::Waiting { elapsed };
        if elapsed >= self.config.max_wait_secs {
            return Some(self.resume(ctx, body, ResumeReason::Timeout));
        }
        if !self.poll_due(ctx.now) {
            return None;
        }
        match ctx.space.peer(held.peer) {
            None => Some(self.resume(ctx, body, ResumeReason::PeerGone)),
            Some(p) if !mutual_head_on(body.position(), held.facing, &p, self.config.cone_cos()) => {
                Some(self.resume(ctx, body, ResumeReason::PeerCleared))
            }
            Some(_) => None,
        }
    }

    // ── Resuming ──────────────────────────────────────────────────────────

    fn resume<L, S>(&mut self, ctx: &NegotiationContext<'_, S>, body: &mut L, reason: ResumeReason) -> NegotiationEvent
    where
        L: Locomotion + ?Sized,
        S: SpaceQuery + ?Sized,
    {
        self.phase = NegotiationPhase::Resuming;
        self.cooldown_until = ctx.now + self.config.cooldown_secs;
        body.clear_path();
        body.resume();

        let (peer, destination) = match self.held.take() {
            Some(held) => {
                body.set_steering(held.saved_steering);
                (held.peer, held.saved_destination)
            }
            None => (MoverId::INVALID, ctx.destination),
        };
        debug!(mover = %ctx.me, %peer, ?reason, "resuming after yield");
        NegotiationEvent::Resumed { peer, reason, destination }
    }
}
