//! Things that occupy the ground plane.

use cf_core::{MoverId, Vec2};

/// What a mover publishes about itself each frame.
///
/// Peers only ever see this copy; nothing holds a reference into another
/// mover's state across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerSnapshot {
    pub id:              MoverId,
    pub position:        Vec2,
    /// Unit facing direction (zero when the mover has never moved).
    pub forward:         Vec2,
    pub radius:          f32,
    /// Current avoidance priority (lower is more important).
    pub priority:        i32,
    /// `true` while the mover has somewhere to go.
    pub has_destination: bool,
    /// `true` while the mover is giving way in a negotiation.  It has
    /// already conceded and must not be contested again.
    pub yielding:        bool,
}

/// An entry in the proximity index.
///
/// The variant is the capability check: only [`Occupant::Mover`] entries
/// can take part in corridor negotiation.  Props take up space but are never
/// asked to yield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Occupant {
    Mover(PeerSnapshot),
    Prop { position: Vec2, radius: f32 },
}

impl Occupant {
    #[inline]
    pub fn position(&self) -> Vec2 {
        match self {
            Occupant::Mover(p)              => p.position,
            Occupant::Prop { position, .. } => *position,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        match self {
            Occupant::Mover(p)            => p.radius,
            Occupant::Prop { radius, .. } => *radius,
        }
    }

    /// The peer snapshot if this occupant is a mover.
    #[inline]
    pub fn as_mover(&self) -> Option<&PeerSnapshot> {
        match self {
            Occupant::Mover(p)    => Some(p),
            Occupant::Prop { .. } => None,
        }
    }
}

/// A static line segment that blocks ray probes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub a: Vec2,
    pub b: Vec2,
}

impl Wall {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Distance along the unit ray `origin + t * dir` to this wall, if the
    /// ray crosses it at `t >= 0`.
    pub fn ray_hit(&self, origin: Vec2, dir: Vec2) -> Option<f32> {
        let edge = self.b - self.a;
        let denom = dir.perp_dot(edge);
        if denom.abs() < 1e-9 {
            return None; // parallel
        }
        let to_a = self.a - origin;
        let t = to_a.perp_dot(edge) / denom;
        let s = to_a.perp_dot(dir) / denom;
        (t >= 0.0 && (0.0..=1.0).contains(&s)).then_some(t)
    }
}
