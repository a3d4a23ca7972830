//! Bounded trail of recent positions.

use std::collections::VecDeque;

use cf_core::{BreadcrumbConfig, Vec2};

/// Oldest-to-newest record of where a mover has been.
///
/// A position is appended only once the mover is at least `min_spacing`
/// from the newest crumb, so standing still never floods the trail.  Every
/// crumb is a place the mover actually stood, which is what makes them safe
/// retreat targets.
#[derive(Debug, Clone)]
pub struct BreadcrumbTrail {
    crumbs:      VecDeque<Vec2>,
    capacity:    usize,
    min_spacing: f32,
}

impl BreadcrumbTrail {
    pub fn new(config: &BreadcrumbConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            crumbs: VecDeque::with_capacity(capacity),
            capacity,
            min_spacing: config.min_spacing_m.max(0.0),
        }
    }

    /// Append `pos` if far enough from the newest crumb; evicts the oldest
    /// on overflow.  Returns `true` if a crumb was added.
    pub fn record(&mut self, pos: Vec2) -> bool {
        if let Some(&newest) = self.crumbs.back() {
            if newest.distance(pos) < self.min_spacing {
                return false;
            }
        }
        if self.crumbs.len() == self.capacity {
            self.crumbs.pop_front();
        }
        self.crumbs.push_back(pos);
        true
    }

    /// Crumbs from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Vec2> + '_ {
        self.crumbs.iter().copied()
    }

    pub fn newest(&self) -> Option<Vec2> {
        self.crumbs.back().copied()
    }

    pub fn oldest(&self) -> Option<Vec2> {
        self.crumbs.front().copied()
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget the trail (after a teleport or respawn).
    pub fn clear(&mut self) {
        self.crumbs.clear();
    }
}
