//! `Mover<L>` — one agent's coordination state around its movement primitive.
//!
//! # Per-frame vs active-tick work
//!
//! ```text
//! every frame   frame_update : breadcrumbs, reservation stamper, negotiation
//! active ticks  tick         : poll_path → arrival → request_path_if_needed
//!                              → apply_steering → stamp_density
//! ```
//!
//! Which frames are active is decided by the mover's [`Cadence`] through
//! [`should_tick`][Mover::should_tick].
//!
//! # Replanning
//!
//! With a destination set, a path is requested when any of these hold:
//!
//! | Trigger               | Condition                                            |
//! |-----------------------|------------------------------------------------------|
//! | new destination       | `set_destination` since the last request             |
//! | no route              | nothing requested or followed yet                    |
//! | stale                 | following a path older than `stale_after_secs`       |
//! | congestion crossing   | field cost at the mover crossed `congestion_threshold` (either way) |
//! | retry                 | last query failed `retry_delay_secs` ago             |
//!
//! A mover never has more than one query in flight; re-requesting simply
//! supersedes the previous one in the queue.

use cf_core::{CrowdConfig, MoverConfig, MoverId, MoverRng, PathQueryId, PlannerHints, Tier, TierRates, Vec2};
use cf_field::DensityField;
use cf_path::{PathError, PathOutcome, PathRequest, PathRequestQueue};
use cf_schedule::Cadence;
use cf_space::{PeerSnapshot, SpaceQuery};
use tracing::{debug, trace};

use crate::{
    BreadcrumbTrail, Locomotion, MoverProfile, NegotiationContext, NegotiationEvent, NegotiationPhase,
    Negotiator, ReservationStamper,
};

/// Where the mover is in the request/follow cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteState {
    Idle,
    Requested { at: f64 },
    Following { since: f64 },
    Failed { at: f64 },
}

/// What one active tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Query enqueued this tick.
    pub requested:    Option<PathQueryId>,
    /// A path was applied to the body.
    pub path_applied: bool,
    /// The awaited query failed.
    pub path_failure: Option<PathError>,
    /// The body finished its route and the destination was cleared.
    pub arrived:      bool,
}

pub struct Mover<L: Locomotion> {
    id:            MoverId,
    body:          L,
    profile:       MoverProfile,
    cadence:       Cadence,
    config:        MoverConfig,
    destination:   Option<Vec2>,
    current_query: Option<PathQueryId>,
    route:         RouteState,
    /// Destination changed since the last request.
    replan:        bool,
    congested:     bool,
    trail:         BreadcrumbTrail,
    stamper:       ReservationStamper,
    negotiator:    Negotiator,
}

impl<L: Locomotion> Mover<L> {
    /// Wrap `body`, applying the profile's steering to it.
    ///
    /// With `config.stagger` the first active tick falls at a deterministic
    /// per-mover offset within one tier interval of `now`.
    pub fn new(id: MoverId, mut body: L, profile: MoverProfile, config: &CrowdConfig, now: f64) -> Self {
        body.set_steering(profile.steering);
        let cadence = if config.stagger {
            Cadence::staggered(profile.tier, &config.tiers, now, &mut MoverRng::new(config.seed, id))
        } else {
            Cadence::new(profile.tier, &config.tiers, now)
        };
        let mut trail = BreadcrumbTrail::new(&config.breadcrumbs);
        trail.record(body.position());

        Self {
            id,
            body,
            profile,
            cadence,
            config:        config.mover.clone(),
            destination:   None,
            current_query: None,
            route:         RouteState::Idle,
            replan:        false,
            congested:     false,
            trail,
            stamper:       ReservationStamper::new(config.reservation.clone(), now),
            negotiator:    Negotiator::new(config.negotiation.clone()),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> MoverId {
        self.id
    }

    pub fn body(&self) -> &L {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut L {
        &mut self.body
    }

    /// Give the body back (despawn).
    pub fn into_body(self) -> L {
        self.body
    }

    pub fn profile(&self) -> &MoverProfile {
        &self.profile
    }

    pub fn tier(&self) -> Tier {
        self.cadence.tier()
    }

    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    pub fn current_query(&self) -> Option<PathQueryId> {
        self.current_query
    }

    pub fn route(&self) -> RouteState {
        self.route
    }

    pub fn is_congested(&self) -> bool {
        self.congested
    }

    pub fn trail(&self) -> &BreadcrumbTrail {
        &self.trail
    }

    pub fn negotiation(&self) -> NegotiationPhase {
        self.negotiator.phase()
    }

    pub fn is_negotiating(&self) -> bool {
        self.negotiator.is_engaged()
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Head for `goal`.  The path is requested on the next active tick.
    ///
    /// While yielding, the new goal replaces the one re-issued on resume.
    pub fn set_destination(&mut self, goal: Vec2) {
        self.destination = Some(goal);
        if self.negotiator.is_engaged() {
            self.negotiator.redirect(Some(goal));
        } else {
            self.replan = true;
        }
    }

    /// Stop heading anywhere.  A query still in the queue is left to be
    /// superseded or dropped on delivery.
    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.current_query = None;
        self.route = RouteState::Idle;
        self.replan = false;
        if self.negotiator.is_engaged() {
            self.negotiator.redirect(None);
        } else {
            self.body.clear_path();
        }
    }

    pub fn set_tier(&mut self, tier: Tier, rates: &TierRates, now: f64) {
        self.profile.tier = tier;
        self.cadence.set_tier(tier, rates, now);
    }

    // ── Active tick ───────────────────────────────────────────────────────

    /// `true` on this mover's active frames.
    pub fn should_tick(&mut self, now: f64) -> bool {
        self.cadence.should_tick(now)
    }

    /// Take a delivered result for this mover's live query and act on it.
    ///
    /// A result for any other query id is dropped.
    pub fn poll_path(&mut self, now: f64, queue: &mut PathRequestQueue) -> Option<PathOutcome> {
        let (id, outcome) = queue.take_result(self.id)?;
        if self.current_query != Some(id) {
            trace!(mover = %self.id, query = id.0, "dropped result for abandoned query");
            return None;
        }
        self.current_query = None;
        match &outcome {
            Ok(path) => {
                self.body.set_path(path);
                self.route = RouteState::Following { since: now };
            }
            Err(e) => {
                self.route = RouteState::Failed { at: now };
                debug!(mover = %self.id, error = %e, "path request failed");
            }
        }
        Some(outcome)
    }

    /// Enqueue a path request if a replan trigger holds.  Returns the new
    /// query id.
    pub fn request_path_if_needed(
        &mut self,
        now:   f64,
        field: &DensityField,
        queue: &mut PathRequestQueue,
    ) -> Option<PathQueryId> {
        if self.negotiator.is_engaged() {
            return None;
        }
        let goal = self.destination?;
        let pos = self.body.position();

        let congested = field.query_cost(pos) >= self.config.congestion_threshold;
        let crossed = congested != self.congested;
        self.congested = congested;

        let due = self.replan
            || match self.route {
                RouteState::Idle                => true,
                RouteState::Requested { .. }    => false,
                RouteState::Following { since } => crossed || now - since >= self.config.stale_after_secs,
                RouteState::Failed { at }       => now - at >= self.config.retry_delay_secs,
            };
        if !due {
            return None;
        }

        let mut hints = self.profile.hints;
        if congested {
            hints |= PlannerHints::AVOID_DENSITY;
        }
        let id = queue.enqueue(PathRequest {
            requester: self.id,
            start:     pos,
            goal,
            hints,
            priority:  self.body.steering().avoidance_priority,
        });
        trace!(mover = %self.id, query = id.0, %hints, "path requested");
        self.current_query = Some(id);
        self.route = RouteState::Requested { at: now };
        self.replan = false;
        Some(id)
    }

    /// Push the profile's steering parameters to the body and resume it.
    /// Skipped while negotiation holds the body.
    pub fn apply_steering(&mut self) {
        if self.negotiator.is_engaged() {
            return;
        }
        self.body.set_steering(self.profile.steering);
        if self.body.is_stopped() {
            self.body.resume();
        }
    }

    /// Stamp personal space at the mover's position.
    pub fn stamp_density(&self, field: &mut DensityField) {
        field.stamp(self.body.position(), self.profile.personal_space_radius, self.config.stamp_weight);
    }

    /// Everything an active frame does, in order.
    pub fn tick(&mut self, now: f64, field: &mut DensityField, queue: &mut PathRequestQueue) -> TickReport {
        let mut report = TickReport::default();

        match self.poll_path(now, queue) {
            Some(Ok(_)) => report.path_applied = true,
            Some(Err(e)) => report.path_failure = Some(e),
            None => {}
        }

        if matches!(self.route, RouteState::Following { .. }) && !self.body.has_path() && !self.replan {
            debug!(mover = %self.id, "arrived");
            self.destination = None;
            self.route = RouteState::Idle;
            report.arrived = true;
        }

        report.requested = self.request_path_if_needed(now, field, queue);
        self.apply_steering();
        self.stamp_density(field);
        report
    }

    // ── Every frame ───────────────────────────────────────────────────────

    /// Tier-independent per-frame work.  Returns the negotiation phase
    /// change, if any.
    pub fn frame_update<S: SpaceQuery + ?Sized>(
        &mut self,
        now:   f64,
        dt:    f64,
        field: &mut DensityField,
        space: &S,
    ) -> Option<NegotiationEvent> {
        self.trail.record(self.body.position());
        self.stamper.update(now, &self.body, field);

        let ctx = NegotiationContext {
            me: self.id,
            destination: self.destination,
            trail: &self.trail,
            space,
            now,
            dt,
        };
        let event = self.negotiator.update(&ctx, &mut self.body);

        match event {
            Some(NegotiationEvent::Yielded { .. }) => {
                // The body now follows the retreat; the old route is void.
                self.current_query = None;
                self.route = RouteState::Idle;
            }
            Some(NegotiationEvent::Resumed { destination, .. }) => {
                self.destination = destination;
                self.replan = destination.is_some();
                self.route = RouteState::Idle;
            }
            _ => {}
        }
        event
    }

    /// What peers see of this mover this frame.
    pub fn snapshot(&self) -> PeerSnapshot {
        let forward = match self.body.forward() {
            f if f == Vec2::ZERO => self.body.desired_direction(),
            f => f,
        };
        let steering = self.body.steering();
        PeerSnapshot {
            id:              self.id,
            position:        self.body.position(),
            forward,
            radius:          steering.radius,
            priority:        steering.avoidance_priority,
            has_destination: self.destination.is_some(),
            yielding:        self.negotiator.is_engaged(),
        }
    }
}
