//! What the pool needs from an instance.

use cf_core::Vec2;

/// A pooled entity: something with a movement primitive, a placement and
/// an active flag.
///
/// The pool drives these in a fixed order.  On spawn: movement off, place,
/// activate, movement on.  On despawn: movement off, deactivate.  Movement
/// stays off while the instance is moved so the primitive never tries to
/// path from its previous, stale position.
pub trait Poolable {
    fn set_movement_enabled(&mut self, enabled: bool);

    /// Snap to `position` facing `yaw` without any movement in between.
    fn place(&mut self, position: Vec2, yaw: f32);

    fn set_active(&mut self, active: bool);

    fn is_active(&self) -> bool;
}
