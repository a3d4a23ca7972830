//! Update-frequency tiers.
//!
//! Tiers are designer-assigned importance classes, never computed at runtime.
//! The mapping from tier to tick rate lives in [`TierRates`][crate::TierRates]
//! so it can be tuned per scene.

/// How often a mover re-evaluates its behavior.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    /// Player-adjacent or gameplay-critical agents (10 Hz by default).
    High,
    /// Ordinary visible agents (3.3 Hz by default).
    #[default]
    Medium,
    /// Background population (0.5 Hz by default).
    Low,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::High, Tier::Medium, Tier::Low];

    /// Lower-case label used in profile CSVs and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::High   => "high",
            Tier::Medium => "medium",
            Tier::Low    => "low",
        }
    }

    /// Inverse of [`Tier::as_str`]; case-insensitive.
    pub fn parse(s: &str) -> Option<Tier> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high"   => Some(Tier::High),
            "medium" => Some(Tier::Medium),
            "low"    => Some(Tier::Low),
            _        => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
