//! `KinematicBody` — a minimal corner-following movement primitive.
//!
//! Moves at constant speed straight at the next corner and snaps onto it
//! when the frame's step would overshoot.  There is no acceleration, no
//! collision and no local avoidance; a game's navigation agent supplies
//! those.  It is enough to drive headless crowds and scenario tests.

use cf_core::Vec2;
use cf_path::Path;
use cf_pool::Poolable;

use crate::{Locomotion, SteeringParams};

/// Corners closer than this to the body count as reached.
const REACHED_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct KinematicBody {
    position: Vec2,
    forward:  Vec2,
    corners:  Vec<Vec2>,
    stopped:  bool,
    /// Movement primitive switched on (pool placement turns it off).
    enabled:  bool,
    /// Present in the scene.
    active:   bool,
    steering: SteeringParams,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self::new(Vec2::ZERO, SteeringParams::default())
    }
}

impl KinematicBody {
    pub fn new(position: Vec2, steering: SteeringParams) -> Self {
        Self {
            position,
            forward:  Vec2::ZERO,
            corners:  Vec::new(),
            stopped:  false,
            enabled:  true,
            active:   true,
            steering,
        }
    }

    /// Same body facing `forward`.
    pub fn facing(mut self, forward: Vec2) -> Self {
        self.forward = forward.normalize_or_zero();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Locomotion for KinematicBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn forward(&self) -> Vec2 {
        self.forward
    }

    fn desired_direction(&self) -> Vec2 {
        self.corners
            .first()
            .map_or(Vec2::ZERO, |&c| (c - self.position).normalize_or_zero())
    }

    /// Follows `corners[1..]`: the first corner is where the solver saw the
    /// body, which may already be behind it.
    fn set_path(&mut self, path: &Path) {
        let rest = path.corners.get(1..).unwrap_or_default();
        let skip = rest
            .iter()
            .take_while(|c| c.distance(self.position) <= REACHED_EPSILON)
            .count();
        self.corners = rest[skip..].to_vec();
    }

    fn clear_path(&mut self) {
        self.corners.clear();
    }

    fn has_path(&self) -> bool {
        !self.corners.is_empty()
    }

    fn corners(&self) -> &[Vec2] {
        &self.corners
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn steering(&self) -> SteeringParams {
        self.steering
    }

    fn set_steering(&mut self, params: SteeringParams) {
        self.steering = params;
    }

    fn advance(&mut self, dt: f32) {
        if self.stopped || !self.enabled || !self.active {
            return;
        }
        let mut budget = self.steering.speed.max(0.0) * dt;
        while budget > 0.0 {
            let Some(&next) = self.corners.first() else {
                break;
            };
            let to_next = next - self.position;
            let dist = to_next.length();
            if dist <= REACHED_EPSILON {
                self.corners.remove(0);
                continue;
            }
            self.forward = to_next / dist;
            if dist <= budget {
                self.position = next;
                self.corners.remove(0);
                budget -= dist;
            } else {
                self.position += self.forward * budget;
                budget = 0.0;
            }
        }
    }
}

impl Poolable for KinematicBody {
    fn set_movement_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn place(&mut self, position: Vec2, yaw: f32) {
        self.position = position;
        self.forward = cf_core::geo::heading_from_yaw(yaw);
        self.corners.clear();
        self.stopped = false;
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
