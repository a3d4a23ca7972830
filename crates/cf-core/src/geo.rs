//! World-plane geometry helpers.
//!
//! Every component works on the 2-D ground plane.  Positions and directions
//! are `glam::Vec2` in metres; rotations are yaw angles in radians measured
//! counter-clockwise from +X.

pub use glam::Vec2;

/// `true` if `target` lies inside the cone of half-angle `acos(cos_half_angle)`
/// opening from `origin` along `forward`.
///
/// A zero `forward` has no cone and never contains anything.  A `target`
/// coincident with `origin` counts as inside.
#[inline]
pub fn in_forward_cone(origin: Vec2, forward: Vec2, target: Vec2, cos_half_angle: f32) -> bool {
    let Some(fwd) = forward.try_normalize() else {
        return false;
    };
    match (target - origin).try_normalize() {
        Some(to_target) => fwd.dot(to_target) >= cos_half_angle,
        None => true,
    }
}

/// Unit vector 90° counter-clockwise from `forward` (the agent's left side).
#[inline]
pub fn left_of(forward: Vec2) -> Vec2 {
    forward.normalize_or_zero().perp()
}

/// Unit heading for a yaw angle.
#[inline]
pub fn heading_from_yaw(yaw: f32) -> Vec2 {
    Vec2::from_angle(yaw)
}

/// Yaw angle of a direction; `0.0` for a zero vector.
#[inline]
pub fn yaw_of(dir: Vec2) -> f32 {
    if dir == Vec2::ZERO { 0.0 } else { dir.y.atan2(dir.x) }
}
