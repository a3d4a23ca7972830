//! `Cadence` — when a mover's next active tick falls.
//!
//! # Drift
//!
//! On an active frame the deadline advances by exactly one interval from the
//! *previous deadline*, not from `now`.  Frames rarely land on the deadline
//! itself, and re-basing on `now` would lose the overshoot every tick: a
//! 10 Hz mover on a 60 Hz loop would then tick at most ~8.6 times a second.
//! If the loop stalls long enough that the advanced deadline is still in the
//! past, the cadence re-bases on `now` instead of firing a burst of catch-up
//! ticks.

use cf_core::{MoverRng, Tier, TierRates};

/// Absorbs the rounding in `frame * frame_dt` so a deadline that lands
/// exactly on a frame boundary fires on that frame.
const TIME_EPSILON: f64 = 1e-9;

/// Per-mover tick timing.
#[derive(Debug, Clone, PartialEq)]
pub struct Cadence {
    tier:           Tier,
    interval:       f64,
    next_tick_time: f64,
}

impl Cadence {
    /// A cadence whose first active tick is `now`.
    pub fn new(tier: Tier, rates: &TierRates, now: f64) -> Self {
        Self { tier, interval: rates.interval(tier), next_tick_time: now }
    }

    /// A cadence whose first active tick is a deterministic random offset in
    /// `[now, now + interval)`, so movers registered together spread their
    /// work across frames.
    pub fn staggered(tier: Tier, rates: &TierRates, now: f64, rng: &mut MoverRng) -> Self {
        let interval = rates.interval(tier);
        Self { tier, interval, next_tick_time: now + rng.unit() * interval }
    }

    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Seconds between active ticks.
    #[inline]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    #[inline]
    pub fn next_tick_time(&self) -> f64 {
        self.next_tick_time
    }

    /// `true` if `now` is an active tick; advances the deadline when it is.
    pub fn should_tick(&mut self, now: f64) -> bool {
        if now + TIME_EPSILON < self.next_tick_time {
            return false;
        }
        self.next_tick_time += self.interval;
        if self.next_tick_time <= now {
            self.next_tick_time = now + self.interval;
        }
        true
    }

    /// Move to `tier`.  A pending deadline further away than one new
    /// interval is pulled in, so promotion takes effect promptly.
    pub fn set_tier(&mut self, tier: Tier, rates: &TierRates, now: f64) {
        self.tier = tier;
        self.interval = rates.interval(tier);
        self.next_tick_time = self.next_tick_time.min(now + self.interval);
    }
}
