//! Resolved paths.

use cf_core::Vec2;

/// An ordered corner sequence from start to goal.
///
/// The first corner is the start position as the solver saw it; followers
/// usually skip it and steer at `corners[1]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub corners: Vec<Vec2>,
}

impl Path {
    pub fn new(corners: Vec<Vec2>) -> Self {
        Self { corners }
    }

    /// Two-corner path straight from `start` to `goal`.
    pub fn straight(start: Vec2, goal: Vec2) -> Self {
        Self { corners: vec![start, goal] }
    }

    /// Final corner, or `None` for an empty path.
    pub fn goal(&self) -> Option<Vec2> {
        self.corners.last().copied()
    }

    /// Total polyline length in metres.
    pub fn length(&self) -> f32 {
        self.corners.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// `true` if there is nowhere to go (fewer than two corners).
    pub fn is_trivial(&self) -> bool {
        self.corners.len() < 2
    }
}

/// Length of the polyline `from → corners[0] → corners[1] → …`.
pub fn polyline_length(from: Vec2, corners: &[Vec2]) -> f32 {
    let mut prev = from;
    let mut total = 0.0;
    for &c in corners {
        total += prev.distance(c);
        prev = c;
    }
    total
}
