//! Path reservation: projecting the road ahead onto the density field.
//!
//! A mover's own stamp only marks where it *is*.  Movers heading into the
//! same doorway would not see each other coming until they meet, so every
//! `interval` seconds each mover also stamps a line of light reservations
//! along the next `lookahead` metres of its route.  Solvers that avoid
//! density then route later arrivals around already-claimed corridors.
//!
//! The cadence is independent of the mover's tier: a Low-tier mover walking
//! a route still reserves it four times a second.

use cf_core::{ReservationConfig, Vec2};
use cf_field::DensityField;

use crate::Locomotion;

#[derive(Debug, Clone)]
pub struct ReservationStamper {
    config:    ReservationConfig,
    next_time: f64,
}

impl ReservationStamper {
    /// A stamper whose first pass runs at `now`.
    pub fn new(config: ReservationConfig, now: f64) -> Self {
        Self { config, next_time: now }
    }

    pub fn next_time(&self) -> f64 {
        self.next_time
    }

    /// Stamp the route ahead of `body` if a pass is due.  Returns the number
    /// of stamps written.
    ///
    /// Nothing is stamped when the remaining route is at most
    /// `min_remaining_m`: an arriving mover has nothing left to claim.
    pub fn update<L: Locomotion + ?Sized>(&mut self, now: f64, body: &L, field: &mut DensityField) -> usize {
        if now + 1e-9 < self.next_time {
            return 0;
        }
        self.next_time += self.config.interval_secs;
        if self.next_time <= now {
            self.next_time = now + self.config.interval_secs;
        }

        if !body.has_path() || body.remaining_distance() <= self.config.min_remaining_m {
            return 0;
        }

        let radius = body.steering().radius + self.config.radius_margin_m;
        let samples = sample_route(
            body.position(),
            body.corners(),
            self.config.spacing_m,
            self.config.lookahead_m,
        );
        for &p in &samples {
            field.stamp(p, radius, self.config.weight);
        }
        samples.len()
    }
}

/// Points every `spacing` metres along `from → corners…`, starting one
/// spacing ahead of `from` and stopping at `lookahead` or the route's end.
pub fn sample_route(from: Vec2, corners: &[Vec2], spacing: f32, lookahead: f32) -> Vec<Vec2> {
    let mut out = Vec::new();
    if spacing <= 0.0 || lookahead <= 0.0 {
        return out;
    }

    let mut k = 1u32;
    let mut travelled = 0.0f32;
    let mut prev = from;
    'walk: for &corner in corners {
        let seg = prev.distance(corner);
        loop {
            let at = k as f32 * spacing;
            if at > lookahead + 1e-4 {
                break 'walk;
            }
            if at > travelled + seg + 1e-4 {
                break;
            }
            let t = if seg > 0.0 { ((at - travelled) / seg).clamp(0.0, 1.0) } else { 1.0 };
            out.push(prev.lerp(corner, t));
            k += 1;
        }
        travelled += seg;
        prev = corner;
    }
    out
}
