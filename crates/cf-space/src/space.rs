//! `CrowdSpace` — the default [`SpaceQuery`] implementation.
//!
//! # Data layout
//!
//! Two R-trees (via `rstar`):
//!
//! - **occupants**: mover snapshots plus registered props, rebuilt once per
//!   frame with a bulk load, which beats incremental updates when nearly
//!   every entry moves.
//! - **walls**: static segments, keyed by their bounding boxes, so a probe
//!   only tests walls whose boxes overlap the probe's box.
//!
//! A side map from `MoverId` to snapshot answers `peer(id)` in O(1).

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use cf_core::{MoverId, Vec2};

use crate::{Occupant, PeerSnapshot, SpaceQuery, Wall};

// ── R-tree entries ────────────────────────────────────────────────────────────

#[derive(Clone)]
struct OccupantEntry {
    point:    [f32; 2],
    occupant: Occupant,
}

impl RTreeObject for OccupantEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for OccupantEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[derive(Clone)]
struct WallEntry(Wall);

impl RTreeObject for WallEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.0.a.x, self.0.a.y], [self.0.b.x, self.0.b.y])
    }
}

// ── CrowdSpace ────────────────────────────────────────────────────────────────

pub struct CrowdSpace {
    occupants:       RTree<OccupantEntry>,
    movers:          FxHashMap<MoverId, PeerSnapshot>,
    props:           Vec<(Vec2, f32)>,
    /// Largest prop radius, so probes widen their search just enough.
    max_prop_radius: f32,
    walls:           RTree<WallEntry>,
}

impl Default for CrowdSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl CrowdSpace {
    pub fn new() -> Self {
        Self {
            occupants:       RTree::new(),
            movers:          FxHashMap::default(),
            props:           Vec::new(),
            max_prop_radius: 0.0,
            walls:           RTree::new(),
        }
    }

    /// An empty space bounded by `walls`.
    pub fn with_walls(walls: impl IntoIterator<Item = Wall>) -> Self {
        let mut space = Self::new();
        space.walls = RTree::bulk_load(walls.into_iter().map(WallEntry).collect());
        space
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.insert(WallEntry(wall));
    }

    pub fn wall_count(&self) -> usize {
        self.walls.size()
    }

    /// Register a static prop.  It appears in proximity results and blocks
    /// probes from the next [`rebuild`][Self::rebuild] on.
    pub fn add_prop(&mut self, position: Vec2, radius: f32) {
        let radius = radius.max(0.0);
        self.props.push((position, radius));
        self.max_prop_radius = self.max_prop_radius.max(radius);
    }

    /// Replace the mover snapshots with this frame's.
    pub fn rebuild<I: IntoIterator<Item = PeerSnapshot>>(&mut self, movers: I) {
        self.movers.clear();
        let mut entries: Vec<OccupantEntry> = self
            .props
            .iter()
            .map(|&(position, radius)| OccupantEntry {
                point:    [position.x, position.y],
                occupant: Occupant::Prop { position, radius },
            })
            .collect();
        for snap in movers {
            self.movers.insert(snap.id, snap);
            entries.push(OccupantEntry {
                point:    [snap.position.x, snap.position.y],
                occupant: Occupant::Mover(snap),
            });
        }
        self.occupants = RTree::bulk_load(entries);
    }

    pub fn mover_count(&self) -> usize {
        self.movers.len()
    }

    /// Movers and props currently indexed.
    pub fn len(&self) -> usize {
        self.occupants.size()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.size() == 0
    }
}

impl SpaceQuery for CrowdSpace {
    fn occupants_within(&self, center: Vec2, radius: f32) -> Vec<Occupant> {
        self.occupants
            .locate_within_distance([center.x, center.y], radius * radius)
            .map(|e| e.occupant)
            .collect()
    }

    fn peer(&self, id: MoverId) -> Option<PeerSnapshot> {
        self.movers.get(&id).copied()
    }

    fn probe(&self, origin: Vec2, dir: Vec2, max_len: f32) -> f32 {
        let Some(dir) = dir.try_normalize() else {
            return 0.0;
        };
        if max_len <= 0.0 {
            return 0.0;
        }
        let end = origin + dir * max_len;
        let lo = origin.min(end);
        let hi = origin.max(end);
        let envelope = AABB::from_corners([lo.x, lo.y], [hi.x, hi.y]);

        let mut nearest = max_len;
        for entry in self.walls.locate_in_envelope_intersecting(&envelope) {
            if let Some(t) = entry.0.ray_hit(origin, dir) {
                nearest = nearest.min(t);
            }
        }

        if !self.props.is_empty() {
            let reach = max_len + self.max_prop_radius;
            for entry in self.occupants.locate_within_distance([origin.x, origin.y], reach * reach) {
                if let Occupant::Prop { position, radius } = entry.occupant {
                    if let Some(t) = ray_circle(origin, dir, position, radius) {
                        nearest = nearest.min(t);
                    }
                }
            }
        }

        nearest
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Entry distance of the unit ray into a circle; `0.0` if `origin` is inside.
fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let m = origin - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = m.dot(dir);
    if b > 0.0 {
        return None; // outside and pointing away
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}
