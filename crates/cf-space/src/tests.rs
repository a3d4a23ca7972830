//! Unit tests for cf-space.

use cf_core::{MoverId, Vec2};

use crate::{CrowdSpace, Occupant, PeerSnapshot, SpaceQuery, Wall};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn snap(id: u32, x: f32, y: f32) -> PeerSnapshot {
    PeerSnapshot {
        id:              MoverId(id),
        position:        Vec2::new(x, y),
        forward:         Vec2::X,
        radius:          0.3,
        priority:        50,
        has_destination: true,
        yielding:        false,
    }
}

/// Corridor along +X, 1.5 m wide (y ∈ [-0.75, 0.75]), 20 m long.
fn corridor() -> CrowdSpace {
    CrowdSpace::with_walls([
        Wall::new(Vec2::new(-10.0, 0.75), Vec2::new(10.0, 0.75)),
        Wall::new(Vec2::new(-10.0, -0.75), Vec2::new(10.0, -0.75)),
    ])
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── Wall ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wall {
    use super::*;

    #[test]
    fn perpendicular_hit() {
        let w = Wall::new(Vec2::new(-1.0, 2.0), Vec2::new(1.0, 2.0));
        assert!(close(w.ray_hit(Vec2::ZERO, Vec2::Y).unwrap(), 2.0));
    }

    #[test]
    fn behind_or_beside_misses() {
        let w = Wall::new(Vec2::new(-1.0, 2.0), Vec2::new(1.0, 2.0));
        assert!(w.ray_hit(Vec2::ZERO, -Vec2::Y).is_none());
        assert!(w.ray_hit(Vec2::new(5.0, 0.0), Vec2::Y).is_none());
        assert!(w.ray_hit(Vec2::ZERO, Vec2::X).is_none()); // parallel
    }
}

// ── CrowdSpace ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod space {
    use super::*;

    #[test]
    fn probe_measures_corridor_sides() {
        let space = corridor();
        assert!(close(space.probe(Vec2::ZERO, Vec2::Y, 3.0), 0.75));
        assert!(close(space.probe(Vec2::ZERO, -Vec2::Y, 3.0), 0.75));
        assert!(close(space.probe(Vec2::ZERO, Vec2::X, 3.0), 3.0));
    }

    #[test]
    fn probe_zero_direction_is_zero() {
        assert_eq!(corridor().probe(Vec2::ZERO, Vec2::ZERO, 3.0), 0.0);
    }

    #[test]
    fn probe_direction_need_not_be_unit() {
        let space = corridor();
        assert!(close(space.probe(Vec2::ZERO, Vec2::new(0.0, 10.0), 3.0), 0.75));
    }

    #[test]
    fn segment_clear_along_and_across() {
        let space = corridor();
        assert!(space.segment_clear(Vec2::ZERO, Vec2::new(-2.0, 0.0)));
        assert!(!space.segment_clear(Vec2::ZERO, Vec2::new(0.0, 2.0)));
        assert!(space.segment_clear(Vec2::ZERO, Vec2::ZERO));
    }

    #[test]
    fn rebuild_replaces_movers() {
        let mut space = corridor();
        space.rebuild([snap(1, 0.0, 0.0), snap(2, 3.0, 0.0)]);
        assert_eq!(space.mover_count(), 2);
        space.rebuild([snap(2, 4.0, 0.0)]);
        assert_eq!(space.mover_count(), 1);
        assert!(space.peer(MoverId(1)).is_none());
        assert_eq!(space.peer(MoverId(2)).unwrap().position, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn peers_within_excludes_self_and_far() {
        let mut space = corridor();
        space.rebuild([snap(1, 0.0, 0.0), snap(2, 3.0, 0.0), snap(3, 9.0, 0.0)]);
        let peers = space.peers_within(Vec2::ZERO, 6.0, MoverId(1));
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].id, MoverId(2));
    }

    #[test]
    fn props_are_occupants_but_not_peers() {
        let mut space = CrowdSpace::new();
        space.add_prop(Vec2::new(1.0, 0.0), 0.5);
        space.rebuild([snap(1, 0.0, 0.0)]);
        assert_eq!(space.len(), 2);

        let all = space.occupants_within(Vec2::ZERO, 2.0);
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|o| matches!(o, Occupant::Prop { .. })));
        assert!(space.peers_within(Vec2::ZERO, 2.0, MoverId(99)).iter().all(|p| p.id == MoverId(1)));
    }

    #[test]
    fn props_block_probes() {
        let mut space = CrowdSpace::new();
        space.add_prop(Vec2::new(2.0, 0.0), 0.5);
        space.rebuild(std::iter::empty());
        assert!(close(space.probe(Vec2::ZERO, Vec2::X, 5.0), 1.5));
        assert!(close(space.probe(Vec2::ZERO, -Vec2::X, 5.0), 5.0));
    }

    #[test]
    fn empty_space() {
        let space = CrowdSpace::new();
        assert!(space.is_empty());
        assert_eq!(space.wall_count(), 0);
        assert!(space.occupants_within(Vec2::ZERO, 100.0).is_empty());
        assert_eq!(space.probe(Vec2::ZERO, Vec2::X, 4.0), 4.0);
    }
}
