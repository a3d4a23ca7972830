//! The spatial collaborator seam.

use cf_core::{MoverId, Vec2};

use crate::{Occupant, PeerSnapshot};

/// Proximity queries and ray probes against the current frame's world.
///
/// Implementations only need to be consistent within one frame; the crowd
/// refreshes the default [`CrowdSpace`][crate::CrowdSpace] before movers run.
pub trait SpaceQuery {
    /// Every occupant whose centre lies within `radius` of `center`.
    fn occupants_within(&self, center: Vec2, radius: f32) -> Vec<Occupant>;

    /// Latest snapshot of mover `id`, or `None` if it is no longer present.
    fn peer(&self, id: MoverId) -> Option<PeerSnapshot>;

    /// Distance from `origin` along `dir` to the first obstruction, capped
    /// at `max_len`.  A zero `dir` reports `0.0`.
    fn probe(&self, origin: Vec2, dir: Vec2, max_len: f32) -> f32;

    /// Movers near `center`, excluding `exclude`.
    fn peers_within(&self, center: Vec2, radius: f32, exclude: MoverId) -> Vec<PeerSnapshot> {
        self.occupants_within(center, radius)
            .iter()
            .filter_map(Occupant::as_mover)
            .filter(|p| p.id != exclude)
            .copied()
            .collect()
    }

    /// `true` if the straight segment `from → to` is unobstructed.
    fn segment_clear(&self, from: Vec2, to: Vec2) -> bool {
        let len = from.distance(to);
        if len <= f32::EPSILON {
            return true;
        }
        self.probe(from, to - from, len) >= len
    }
}
