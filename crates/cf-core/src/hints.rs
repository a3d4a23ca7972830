//! Planner hint flags carried by movers and path queries.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bit set of hints forwarded to the path solver with each query.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerHints(pub u8);

impl PlannerHints {
    pub const NONE: PlannerHints = PlannerHints(0);
    /// Add density-field cost to edge weights.
    pub const AVOID_DENSITY: PlannerHints = PlannerHints(1 << 0);
    /// The requester matters to gameplay; solvers may spend more effort.
    pub const IS_IMPORTANT: PlannerHints = PlannerHints(1 << 1);
    /// Prefer wide passages over the shortest route.
    pub const PREFER_WIDE: PlannerHints = PlannerHints(1 << 2);

    const NAMES: [(PlannerHints, &'static str); 3] = [
        (Self::AVOID_DENSITY, "avoid_density"),
        (Self::IS_IMPORTANT, "important"),
        (Self::PREFER_WIDE, "prefer_wide"),
    ];

    #[inline]
    pub fn contains(self, other: PlannerHints) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn with(self, other: PlannerHints) -> PlannerHints {
        self | other
    }

    /// Parse a `|`-separated list of flag names (`"avoid_density|important"`).
    /// An empty string or `"none"` yields [`PlannerHints::NONE`].
    pub fn parse(s: &str) -> Option<PlannerHints> {
        let mut hints = PlannerHints::NONE;
        for part in s.split('|').map(str::trim).filter(|p| !p.is_empty()) {
            if part == "none" {
                continue;
            }
            let (flag, _) = Self::NAMES.iter().find(|(_, name)| *name == part)?;
            hints |= *flag;
        }
        Some(hints)
    }
}

impl BitOr for PlannerHints {
    type Output = PlannerHints;
    #[inline]
    fn bitor(self, rhs: PlannerHints) -> PlannerHints {
        PlannerHints(self.0 | rhs.0)
    }
}

impl BitOrAssign for PlannerHints {
    #[inline]
    fn bitor_assign(&mut self, rhs: PlannerHints) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for PlannerHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
