//! Unit tests for cf-field.

use cf_core::{Falloff, FieldConfig, Vec2};

use crate::DensityField;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 20 × 20 one-metre cells spanning [0, 20)², two-second half-life.
fn config(falloff: Falloff) -> FieldConfig {
    FieldConfig {
        origin:         Vec2::ZERO,
        cell_size:      1.0,
        width:          20,
        height:         20,
        half_life_secs: 2.0,
        falloff,
    }
}

fn field() -> DensityField {
    DensityField::new(&config(Falloff::Flat)).unwrap()
}

/// Centre of cell (10, 10).
const P: Vec2 = Vec2::new(10.5, 10.5);

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn empty_grid_rejected() {
        let mut cfg = config(Falloff::Flat);
        cfg.width = 0;
        assert!(DensityField::new(&cfg).is_err());
    }

    #[test]
    fn bad_half_life_rejected() {
        let mut cfg = config(Falloff::Flat);
        cfg.half_life_secs = 0.0;
        assert!(DensityField::new(&cfg).is_err());
    }

    #[test]
    fn starts_empty() {
        let f = field();
        assert_eq!(f.cell_count(), 400);
        assert_eq!(f.total_weight(), 0.0);
        assert_eq!(f.query_cost(P), 0.0);
    }

    #[test]
    fn cell_index_bounds() {
        let f = field();
        assert_eq!(f.cell_index(Vec2::new(0.2, 0.2)), Some(0));
        assert_eq!(f.cell_index(Vec2::new(1.5, 2.5)), Some(2 * 20 + 1));
        assert!(f.cell_index(Vec2::new(-0.1, 3.0)).is_none());
        assert!(f.cell_index(Vec2::new(20.0, 3.0)).is_none());
    }
}

// ── Stamping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stamping {
    use super::*;

    #[test]
    fn stamp_adds_weight_within_radius() {
        let mut f = field();
        f.stamp(P, 1.0, 2.0);
        assert_eq!(f.query_cost(P), 2.0);
        // Direct neighbours' centres are exactly 1 m away → inside.
        assert_eq!(f.query_cost(P + Vec2::X), 2.0);
        // Diagonal neighbours are √2 m away → outside.
        assert_eq!(f.query_cost(P + Vec2::new(1.0, 1.0)), 0.0);
        assert_eq!(f.last_stamp_time(P), Some(0.0));
        assert_eq!(f.last_stamp_time(P + Vec2::new(3.0, 0.0)), None);
    }

    #[test]
    fn stamps_accumulate_additively() {
        let mut f = field();
        f.stamp(P, 1.0, 0.5);
        f.stamp(P, 1.0, 0.25);
        f.stamp(P + Vec2::X, 1.0, 1.0);
        assert!((f.query_cost(P) - 1.75).abs() < 1e-6);
    }

    #[test]
    fn tiny_radius_still_reaches_own_cell() {
        let mut f = field();
        f.stamp(Vec2::new(3.9, 3.9), 0.05, 1.0);
        assert_eq!(f.query_cost(Vec2::new(3.5, 3.5)), 1.0);
    }

    #[test]
    fn out_of_bounds_ignored() {
        let mut f = field();
        f.stamp(Vec2::new(-5.0, 5.0), 3.0, 1.0);
        f.stamp(Vec2::new(50.0, 50.0), 3.0, 1.0);
        assert_eq!(f.total_weight(), 0.0);
    }

    #[test]
    fn negative_and_nan_weights_ignored() {
        let mut f = field();
        f.stamp(P, 1.0, -4.0);
        f.stamp(P, 1.0, f32::NAN);
        assert_eq!(f.total_weight(), 0.0);
    }

    #[test]
    fn linear_falloff_is_monotonic() {
        let mut f = DensityField::new(&config(Falloff::Linear)).unwrap();
        f.stamp(P, 3.0, 3.0);
        let c0 = f.query_cost(P);
        let c1 = f.query_cost(P + Vec2::X);
        let c2 = f.query_cost(P + Vec2::X * 2.0);
        let c3 = f.query_cost(P + Vec2::X * 3.0);
        assert_eq!(c0, 3.0);
        assert!(c0 > c1 && c1 > c2 && c2 > c3);
        assert_eq!(c3, 0.0);
    }

    #[test]
    fn stamp_near_edge_clips_to_grid() {
        let mut f = field();
        f.stamp(Vec2::new(0.5, 0.5), 2.0, 1.0);
        assert_eq!(f.query_cost(Vec2::new(0.5, 0.5)), 1.0);
        assert!(f.total_weight() > 0.0);
    }
}

// ── Decay ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decay {
    use super::*;

    #[test]
    fn one_half_life_halves_cost() {
        let mut f = field();
        f.stamp(P, 1.0, 2.0);
        f.decay_tick(f.half_life());
        assert!((f.query_cost(P) - 1.0).abs() < 1e-3, "got {}", f.query_cost(P));
    }

    #[test]
    fn decay_is_independent_of_tick_frequency() {
        let mut coarse = field();
        let mut fine = field();
        coarse.stamp(P, 1.0, 4.0);
        fine.stamp(P, 1.0, 4.0);

        coarse.decay_tick(3.0);
        for i in 1..=180 {
            fine.decay_tick(i as f64 / 60.0);
        }
        assert!((coarse.query_cost(P) - fine.query_cost(P)).abs() < 1e-3);
    }

    #[test]
    fn stamp_after_decay_adds_to_decayed_value() {
        let mut f = field();
        f.stamp(P, 1.0, 2.0);
        f.decay_tick(2.0);
        f.stamp(P, 1.0, 1.0);
        assert!((f.query_cost(P) - 2.0).abs() < 1e-3);
        assert_eq!(f.last_stamp_time(P), Some(2.0));
    }

    #[test]
    fn eventually_returns_to_zero() {
        let mut f = field();
        f.stamp(P, 2.0, 100.0);
        f.decay_tick(120.0);
        assert_eq!(f.query_cost(P), 0.0);
        assert_eq!(f.total_weight(), 0.0);
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut f = field();
        f.decay_tick(5.0);
        f.decay_tick(1.0);
        assert_eq!(f.now(), 5.0);
    }

    #[test]
    fn clear_drops_everything() {
        let mut f = field();
        f.stamp(P, 3.0, 1.0);
        f.clear();
        assert_eq!(f.total_weight(), 0.0);
        assert!(f.snapshot().iter().all(|&w| w == 0.0));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    fn arb_stamp() -> impl Strategy<Value = (f32, f32, f32, f32)> {
        (2.0f32..18.0, 2.0f32..18.0, 1.0f32..3.0, 0.1f32..5.0)
    }

    proptest! {
        #[test]
        fn cell_weight_is_sum_of_covering_stamps(stamps in prop::collection::vec(arb_stamp(), 1..30)) {
            let mut f = field();
            for &(x, y, r, w) in &stamps {
                f.stamp(Vec2::new(x, y), r, w);
            }
            for cy in 0..f.height() {
                for cx in 0..f.width() {
                    let c = f.cell_center(cx, cy);
                    let expected: f32 = stamps
                        .iter()
                        .filter(|&&(x, y, r, _)| c.distance(Vec2::new(x, y)) <= r)
                        .map(|&(_, _, _, w)| w)
                        .sum();
                    prop_assert!((f.query_cost(c) - expected).abs() < 1e-3);
                }
            }
        }

        #[test]
        fn weights_never_negative(
            stamps in prop::collection::vec(arb_stamp(), 0..30),
            advance in prop::collection::vec(0.0f64..3.0, 0..10),
        ) {
            let mut f = DensityField::new(&config(Falloff::Linear)).unwrap();
            let mut now = 0.0;
            for (i, &(x, y, r, w)) in stamps.iter().enumerate() {
                f.stamp(Vec2::new(x, y), r, w);
                if let Some(dt) = advance.get(i) {
                    now += dt;
                    f.decay_tick(now);
                }
            }
            prop_assert!(f.snapshot().iter().all(|&w| w >= 0.0));
        }

        #[test]
        fn stamp_order_does_not_matter(stamps in prop::collection::vec(arb_stamp(), 1..20)) {
            let mut forward = field();
            let mut reverse = field();
            for &(x, y, r, w) in &stamps {
                forward.stamp(Vec2::new(x, y), r, w);
            }
            for &(x, y, r, w) in stamps.iter().rev() {
                reverse.stamp(Vec2::new(x, y), r, w);
            }
            for (a, b) in forward.snapshot().iter().zip(reverse.snapshot()) {
                prop_assert!((a - b).abs() < 1e-3);
            }
        }
    }
}
