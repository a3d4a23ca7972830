//! Designer-assigned mover profiles and their CSV loader.
//!
//! # CSV format
//!
//! One row per mover.  `hints` is optional and takes `|`-separated flag
//! names (`avoid_density`, `important`, `prefer_wide`) or `none`.
//!
//! ```csv
//! mover_id,tier,personal_space_radius,avoidance_priority,speed,radius,hints
//! 3,high,0.6,50,1.4,0.3,important
//! 7,high,0.6,50,1.4,0.3,
//! 12,low,0.5,70,1.2,0.3,avoid_density|prefer_wide
//! ```
//!
//! Rows keep file order.  A mover id appearing twice is an error.

use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use cf_core::{MoverId, PlannerHints, Tier};

use crate::{MoverError, MoverResult, SteeringParams};

/// Static, designer-assigned properties of one mover.
#[derive(Debug, Clone, PartialEq)]
pub struct MoverProfile {
    pub tier:                  Tier,
    /// Radius of the mover's own density stamp, metres.
    pub personal_space_radius: f32,
    pub steering:              SteeringParams,
    /// Hints attached to every path request.
    pub hints:                 PlannerHints,
}

impl Default for MoverProfile {
    fn default() -> Self {
        Self {
            tier:                  Tier::Medium,
            personal_space_radius: 0.5,
            steering:              SteeringParams::default(),
            hints:                 PlannerHints::NONE,
        }
    }
}

impl MoverProfile {
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_priority(mut self, avoidance_priority: i32) -> Self {
        self.steering.avoidance_priority = avoidance_priority;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.steering.speed = speed;
        self
    }

    pub fn with_hints(mut self, hints: PlannerHints) -> Self {
        self.hints = hints;
        self
    }
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProfileRecord {
    mover_id:              u32,
    tier:                  String,
    personal_space_radius: f32,
    avoidance_priority:    i32,
    speed:                 f32,
    radius:                f32,
    #[serde(default)]
    hints:                 String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load mover profiles from a CSV file.
pub fn load_profiles_csv(path: &Path) -> MoverResult<IndexMap<MoverId, MoverProfile>> {
    let file = std::fs::File::open(path)?;
    load_profiles_reader(file)
}

/// Like [`load_profiles_csv`] but accepts any `Read` source.
pub fn load_profiles_reader<R: Read>(reader: R) -> MoverResult<IndexMap<MoverId, MoverProfile>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut profiles = IndexMap::new();

    for result in csv_reader.deserialize::<ProfileRecord>() {
        let row = result.map_err(|e| MoverError::Parse(e.to_string()))?;
        let id = MoverId(row.mover_id);

        let tier = Tier::parse(&row.tier).ok_or_else(|| {
            MoverError::Parse(format!(
                "{id}: invalid tier {:?}: expected \"high\", \"medium\" or \"low\"",
                row.tier
            ))
        })?;
        let hints = PlannerHints::parse(&row.hints)
            .ok_or_else(|| MoverError::Parse(format!("{id}: invalid hints {:?}", row.hints)))?;
        if row.personal_space_radius < 0.0 || row.radius < 0.0 || row.speed < 0.0 {
            return Err(MoverError::Parse(format!("{id}: radii and speed must be non-negative")));
        }

        let profile = MoverProfile {
            tier,
            personal_space_radius: row.personal_space_radius,
            steering: SteeringParams {
                speed:              row.speed,
                radius:             row.radius,
                avoidance_priority: row.avoidance_priority,
            },
            hints,
        };
        if profiles.insert(id, profile).is_some() {
            return Err(MoverError::DuplicateProfile(id));
        }
    }

    Ok(profiles)
}
