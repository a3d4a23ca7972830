//! The movement primitive seam.

use cf_core::Vec2;
use cf_path::Path;

/// Steering parameters the avoidance layer reads from a mover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    /// Cruise speed, metres per second.
    pub speed:              f32,
    /// Physical radius used for avoidance, metres.
    pub radius:             f32,
    /// Lower is more important; equal-or-higher values give way.
    pub avoidance_priority: i32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self { speed: 1.4, radius: 0.3, avoidance_priority: 50 }
    }
}

/// What a mover needs from the thing that actually moves it.
///
/// A game implements this over its navigation agent; the crate ships
/// [`KinematicBody`][crate::KinematicBody] for tests and headless runs.
/// Corner lists are world-space and next-corner-first.
///
/// # Type parameter use
///
/// `Mover<L: Locomotion>` is generic rather than boxed so the per-frame
/// calls inline.
pub trait Locomotion {
    fn position(&self) -> Vec2;

    /// Unit facing direction, or zero if the body has never moved.
    fn forward(&self) -> Vec2;

    /// Unit direction towards the next corner, or zero with no path.
    fn desired_direction(&self) -> Vec2;

    /// Start following `path`.  Corners at the current position are skipped.
    fn set_path(&mut self, path: &Path);

    fn clear_path(&mut self);

    fn has_path(&self) -> bool;

    /// Remaining corners, next first.
    fn corners(&self) -> &[Vec2];

    /// Length of the remaining route from the current position.
    fn remaining_distance(&self) -> f32 {
        cf_path::polyline_length(self.position(), self.corners())
    }

    /// Halt in place, keeping the path.
    fn stop(&mut self);

    /// Continue along the kept path.
    fn resume(&mut self);

    fn is_stopped(&self) -> bool;

    fn steering(&self) -> SteeringParams;

    fn set_steering(&mut self, params: SteeringParams);

    /// Integrate one frame.  Engine-driven primitives leave this as a no-op.
    fn advance(&mut self, _dt: f32) {}
}
