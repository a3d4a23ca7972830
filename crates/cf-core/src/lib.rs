//! `cf-core` — foundational types for the `crowdflow` movement coordinator.
//!
//! This crate is a dependency of every other `cf-*` crate.  It intentionally
//! has no `cf-*` dependencies and few external ones (`glam`, `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `MoverId`, `PathQueryId`, `EntityHandle`, `PrefabKind` |
//! | [`geo`]         | `Vec2` re-export, forward-cone and heading helpers    |
//! | [`time`]        | `FrameClock`                                          |
//! | [`rng`]         | `MoverRng`, seeded per mover for tick staggering      |
//! | [`tier`]        | `Tier` update-frequency class                         |
//! | [`hints`]       | `PlannerHints` bit flags                              |
//! | [`config`]      | `CrowdConfig` and its per-component sections          |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, tiers, hints and    |
//! |         | every config struct.                                       |

pub mod config;
pub mod error;
pub mod geo;
pub mod hints;
pub mod ids;
pub mod rng;
pub mod tier;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    BreadcrumbConfig, CrowdConfig, Falloff, FieldConfig, MoverConfig, NegotiationConfig,
    QueueConfig, ReservationConfig, TierRates,
};
pub use error::{CoreError, CoreResult};
pub use geo::Vec2;
pub use hints::PlannerHints;
pub use ids::{EntityHandle, MoverId, PathQueryId, PrefabKind};
pub use rng::MoverRng;
pub use tier::Tier;
pub use time::FrameClock;
