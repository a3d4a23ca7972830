//! Dense density grid with lazy exponential decay.
//!
//! # Data layout
//!
//! Cells are stored row-major: cell `(x, y)` lives at index `y * width + x`
//! and covers the square
//!
//! ```text
//! [origin.x + x*cell, origin.x + (x+1)*cell) × [origin.y + y*cell, origin.y + (y+1)*cell)
//! ```
//!
//! Weights are kept as `f32` (a planner cost does not need more), while
//! timestamps are `f64` seconds so long sessions keep sub-millisecond
//! resolution.

use std::f64::consts::LN_2;

use cf_core::{Falloff, FieldConfig, Vec2};

use crate::{FieldError, FieldResult};

/// Weights below this are snapped to zero when a cell is settled.
const EPSILON: f32 = 1e-4;

/// Cells re-settled by each [`DensityField::decay_tick`] call.
const SWEEP_PER_TICK: usize = 1024;

#[derive(Copy, Clone, Debug, Default)]
struct Cell {
    /// Weight as of `touched`.
    weight:     f32,
    /// Time the weight was last brought up to date.
    touched:    f64,
    /// Time of the most recent stamp; `NEG_INFINITY` if never stamped.
    last_stamp: f64,
}

/// Decaying scalar congestion grid over one navigable region.
///
/// Created once per region at scene start and shared by every mover through
/// the crowd that owns it.
#[derive(Clone, Debug)]
pub struct DensityField {
    origin:       Vec2,
    cell_size:    f32,
    width:        u32,
    height:       u32,
    falloff:      Falloff,
    /// `λ` in `exp(-λ·Δt)`.
    decay_rate:   f64,
    half_life:    f64,
    cells:        Vec<Cell>,
    now:          f64,
    sweep_cursor: usize,
}

impl DensityField {
    /// Build an all-zero field from `config`.
    pub fn new(config: &FieldConfig) -> FieldResult<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(FieldError::EmptyGrid { width: config.width, height: config.height });
        }
        if config.cell_size.is_nan() || config.cell_size <= 0.0 {
            return Err(FieldError::InvalidParameter(format!(
                "cell_size must be positive, got {}",
                config.cell_size
            )));
        }
        if config.half_life_secs.is_nan() || config.half_life_secs <= 0.0 {
            return Err(FieldError::InvalidParameter(format!(
                "half_life_secs must be positive, got {}",
                config.half_life_secs
            )));
        }

        let empty = Cell { weight: 0.0, touched: 0.0, last_stamp: f64::NEG_INFINITY };
        Ok(Self {
            origin:       config.origin,
            cell_size:    config.cell_size,
            width:        config.width,
            height:       config.height,
            falloff:      config.falloff,
            decay_rate:   LN_2 / config.half_life_secs,
            half_life:    config.half_life_secs,
            cells:        vec![empty; (config.width * config.height) as usize],
            now:          0.0,
            sweep_cursor: 0,
        })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn half_life(&self) -> f64 {
        self.half_life
    }

    /// The field's clock, as last advanced by [`decay_tick`][Self::decay_tick].
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Index of the cell containing `pos`, or `None` outside the grid.
    pub fn cell_index(&self, pos: Vec2) -> Option<usize> {
        let local = (pos - self.origin) / self.cell_size;
        if local.x.is_nan() || local.y.is_nan() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (cx, cy) = (local.x as u32, local.y as u32);
        if cx >= self.width || cy >= self.height {
            return None;
        }
        Some((cy * self.width + cx) as usize)
    }

    /// World position of the centre of cell `(cx, cy)`.
    pub fn cell_center(&self, cx: u32, cy: u32) -> Vec2 {
        self.origin + (Vec2::new(cx as f32, cy as f32) + Vec2::splat(0.5)) * self.cell_size
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Add `weight` to every cell whose centre lies within `radius` of
    /// `position`, scaled by the configured falloff.
    ///
    /// Radii smaller than half a cell diagonal are widened to it so an
    /// in-bounds stamp always reaches at least its own cell.  Stamps centred
    /// outside the grid, and non-positive or non-finite weights, are ignored.
    pub fn stamp(&mut self, position: Vec2, radius: f32, weight: f32) {
        if !weight.is_finite() || weight <= 0.0 || self.cell_index(position).is_none() {
            return;
        }
        let radius = radius.max(self.cell_size * std::f32::consts::FRAC_1_SQRT_2);

        let lo = ((position - Vec2::splat(radius) - self.origin) / self.cell_size).floor();
        let hi = ((position + Vec2::splat(radius) - self.origin) / self.cell_size).floor();
        let x0 = lo.x.max(0.0) as u32;
        let y0 = lo.y.max(0.0) as u32;
        let x1 = (hi.x.max(0.0) as u32).min(self.width - 1);
        let y1 = (hi.y.max(0.0) as u32).min(self.height - 1);

        let now = self.now;
        let rate = self.decay_rate;
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                let d = self.cell_center(cx, cy).distance(position);
                if d > radius {
                    continue;
                }
                let w = match self.falloff {
                    Falloff::Flat   => weight,
                    Falloff::Linear => weight * (1.0 - d / radius),
                };
                if w <= 0.0 {
                    continue;
                }
                let cell = &mut self.cells[(cy * self.width + cx) as usize];
                settle(cell, now, rate);
                cell.weight += w;
                cell.last_stamp = now;
            }
        }
    }

    /// Advance the field clock to `now` and re-settle a bounded slice of
    /// cells, snapping fully decayed ones to zero.
    ///
    /// Time never runs backwards: an earlier `now` is ignored.
    pub fn decay_tick(&mut self, now: f64) {
        if now <= self.now {
            return;
        }
        self.now = now;

        let n = self.cells.len();
        let rate = self.decay_rate;
        for _ in 0..SWEEP_PER_TICK.min(n) {
            settle(&mut self.cells[self.sweep_cursor], now, rate);
            self.sweep_cursor = (self.sweep_cursor + 1) % n;
        }
    }

    /// Drop all accumulated weight (region reload).
    pub fn clear(&mut self) {
        let now = self.now;
        for cell in &mut self.cells {
            *cell = Cell { weight: 0.0, touched: now, last_stamp: f64::NEG_INFINITY };
        }
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Current decayed weight at `position`; `0.0` outside the grid.
    ///
    /// Used by path solvers as an additive cost.  Pure: does not settle.
    pub fn query_cost(&self, position: Vec2) -> f32 {
        match self.cell_index(position) {
            Some(i) => self.decayed(&self.cells[i]),
            None => 0.0,
        }
    }

    /// Time of the last stamp that reached the cell containing `position`.
    pub fn last_stamp_time(&self, position: Vec2) -> Option<f64> {
        let cell = &self.cells[self.cell_index(position)?];
        cell.last_stamp.is_finite().then_some(cell.last_stamp)
    }

    /// Sum of all decayed cell weights.
    pub fn total_weight(&self) -> f32 {
        self.cells.iter().map(|c| self.decayed(c)).sum()
    }

    /// Row-major decayed weights, for heatmap overlays and debugging.
    pub fn snapshot(&self) -> Vec<f32> {
        self.cells.iter().map(|c| self.decayed(c)).collect()
    }

    #[inline]
    fn decayed(&self, cell: &Cell) -> f32 {
        let dt = (self.now - cell.touched).max(0.0);
        let w = cell.weight * (-self.decay_rate * dt).exp() as f32;
        if w < EPSILON { 0.0 } else { w }
    }
}

/// Bring `cell` up to date at `now`.
#[inline]
fn settle(cell: &mut Cell, now: f64, rate: f64) {
    let dt = now - cell.touched;
    if dt > 0.0 {
        cell.weight *= (-rate * dt).exp() as f32;
        if cell.weight < EPSILON {
            cell.weight = 0.0;
        }
        cell.touched = now;
    }
}
