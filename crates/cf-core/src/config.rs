//! Crowd configuration.
//!
//! Typically loaded from a JSON file by the application (enable the `serde`
//! feature) and handed to `cf_sim::CrowdBuilder`.  Every section has a
//! `Default` carrying the tuning values the system was designed around, and
//! with `serde` enabled any omitted field falls back to that default.

use crate::{CoreError, CoreResult, Tier, Vec2};

// ── Tier rates ────────────────────────────────────────────────────────────────

/// Active-tick frequency for each [`Tier`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TierRates {
    pub high_hz:   f64,
    pub medium_hz: f64,
    pub low_hz:    f64,
}

impl Default for TierRates {
    fn default() -> Self {
        Self { high_hz: 10.0, medium_hz: 3.3, low_hz: 0.5 }
    }
}

impl TierRates {
    #[inline]
    pub fn hz(&self, tier: Tier) -> f64 {
        match tier {
            Tier::High   => self.high_hz,
            Tier::Medium => self.medium_hz,
            Tier::Low    => self.low_hz,
        }
    }

    /// Seconds between active ticks for `tier`.
    #[inline]
    pub fn interval(&self, tier: Tier) -> f64 {
        1.0 / self.hz(tier)
    }
}

// ── Density field ─────────────────────────────────────────────────────────────

/// How a stamp's weight falls off with distance from its centre.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Falloff {
    /// Full weight for every cell centre inside the radius.
    #[default]
    Flat,
    /// Weight scales with `1 - d / radius`.
    Linear,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldConfig {
    /// World position of the grid's minimum corner.
    pub origin:         Vec2,
    /// Edge length of one square cell, metres.
    pub cell_size:      f32,
    /// Cells along +X.
    pub width:          u32,
    /// Cells along +Y.
    pub height:         u32,
    /// Time for a cell's weight to halve, seconds.
    pub half_life_secs: f64,
    pub falloff:        Falloff,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            origin:         Vec2::new(-50.0, -50.0),
            cell_size:      1.0,
            width:          100,
            height:         100,
            half_life_secs: 2.0,
            falloff:        Falloff::Flat,
        }
    }
}

// ── Path request queue ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QueueConfig {
    /// Maximum requests handed to the solver per frame (`K`).
    pub dispatch_budget: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { dispatch_budget: 6 }
    }
}

// ── Mover ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MoverConfig {
    /// A resolved path older than this is re-requested.
    pub stale_after_secs:     f64,
    /// Field cost at the mover's position above which it counts as congested.
    pub congestion_threshold: f32,
    /// Wait after a failed query before asking again.
    pub retry_delay_secs:     f64,
    /// Weight of the per-tick personal-space stamp.
    pub stamp_weight:         f32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            stale_after_secs:     5.0,
            congestion_threshold: 3.0,
            retry_delay_secs:     1.0,
            stamp_weight:         1.0,
        }
    }
}

// ── Reservation stamper ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReservationConfig {
    pub interval_secs:   f64,
    pub lookahead_m:     f32,
    pub spacing_m:       f32,
    pub weight:          f32,
    /// Added to the mover's physical radius.
    pub radius_margin_m: f32,
    /// Below this remaining distance the mover is arriving and stamps nothing.
    pub min_remaining_m: f32,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            interval_secs:   0.25,
            lookahead_m:     10.0,
            spacing_m:       0.5,
            weight:          0.5,
            radius_margin_m: 0.25,
            min_remaining_m: 1.0,
        }
    }
}

// ── Corridor negotiation ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NegotiationConfig {
    /// Detection polling rate while idle.
    pub poll_hz:               f64,
    /// Corridors at most this wide count as narrow.
    pub narrow_threshold_m:    f32,
    /// Length of each side probe ray.
    pub probe_length_m:        f32,
    pub detection_radius_m:    f32,
    /// Half-angle of the forward cone used for the mutual head-on test.
    pub cone_half_angle_deg:   f32,
    pub min_backoff_m:         f32,
    pub max_backoff_m:         f32,
    /// A breadcrumb is "behind" when the cosine between forward and the
    /// direction to it is at most this value.
    pub behind_cos:            f32,
    /// Distance of the reverse-direction fallback target.
    pub fallback_backoff_m:    f32,
    pub retreat_speed_factor:  f32,
    pub retreat_radius_scale:  f32,
    /// Priority held while yielding; lower values are more important.
    pub retreat_priority:      i32,
    pub arrive_tolerance_m:    f32,
    pub retreat_timeout_secs:  f64,
    pub max_wait_secs:         f64,
    pub cooldown_secs:         f64,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            poll_hz:              8.0,
            narrow_threshold_m:   2.0,
            probe_length_m:       3.0,
            detection_radius_m:   6.0,
            cone_half_angle_deg:  35.0,
            min_backoff_m:        1.0,
            max_backoff_m:        4.0,
            behind_cos:           -0.3,
            fallback_backoff_m:   2.0,
            retreat_speed_factor: 0.5,
            retreat_radius_scale: 1.25,
            retreat_priority:     0,
            arrive_tolerance_m:   0.3,
            retreat_timeout_secs: 2.5,
            max_wait_secs:        3.0,
            cooldown_secs:        2.0,
        }
    }
}

impl NegotiationConfig {
    #[inline]
    pub fn cone_cos(&self) -> f32 {
        self.cone_half_angle_deg.to_radians().cos()
    }

    #[inline]
    pub fn poll_interval(&self) -> f64 {
        1.0 / self.poll_hz
    }
}

// ── Breadcrumbs ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BreadcrumbConfig {
    pub capacity:      usize,
    pub min_spacing_m: f32,
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self { capacity: 20, min_spacing_m: 0.5 }
    }
}

// ── CrowdConfig ───────────────────────────────────────────────────────────────

/// Top-level configuration for one navigable region's crowd.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CrowdConfig {
    /// Fixed frame rate of the game loop.
    pub frame_hz:     f64,
    /// Master seed.  The same seed always produces identical tick phases.
    pub seed:         u64,
    /// Randomise each mover's first active tick within one tier interval.
    pub stagger:      bool,
    pub tiers:        TierRates,
    pub field:        FieldConfig,
    pub queue:        QueueConfig,
    pub mover:        MoverConfig,
    pub reservation:  ReservationConfig,
    pub negotiation:  NegotiationConfig,
    pub breadcrumbs:  BreadcrumbConfig,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            frame_hz:    60.0,
            seed:        0,
            stagger:     true,
            tiers:       TierRates::default(),
            field:       FieldConfig::default(),
            queue:       QueueConfig::default(),
            mover:       MoverConfig::default(),
            reservation: ReservationConfig::default(),
            negotiation: NegotiationConfig::default(),
            breadcrumbs: BreadcrumbConfig::default(),
        }
    }
}

impl CrowdConfig {
    /// Reject values that would stall or divide by zero at runtime.
    pub fn validate(&self) -> CoreResult<()> {
        fn positive(what: &str, v: f64) -> CoreResult<()> {
            if v > 0.0 && v.is_finite() {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{what} must be positive, got {v}")))
            }
        }

        positive("frame_hz", self.frame_hz)?;
        for tier in Tier::ALL {
            positive(&format!("{tier} tier rate"), self.tiers.hz(tier))?;
        }
        positive("field.cell_size", self.field.cell_size as f64)?;
        positive("field.half_life_secs", self.field.half_life_secs)?;
        if self.field.width == 0 || self.field.height == 0 {
            return Err(CoreError::Config("field dimensions must be non-zero".into()));
        }
        if self.queue.dispatch_budget == 0 {
            return Err(CoreError::Config("queue.dispatch_budget must be at least 1".into()));
        }
        positive("reservation.interval_secs", self.reservation.interval_secs)?;
        positive("reservation.spacing_m", self.reservation.spacing_m as f64)?;
        positive("negotiation.poll_hz", self.negotiation.poll_hz)?;
        if self.negotiation.min_backoff_m > self.negotiation.max_backoff_m {
            return Err(CoreError::Config(
                "negotiation.min_backoff_m exceeds max_backoff_m".into(),
            ));
        }
        if self.breadcrumbs.capacity == 0 {
            return Err(CoreError::Config("breadcrumbs.capacity must be at least 1".into()));
        }
        Ok(())
    }
}
