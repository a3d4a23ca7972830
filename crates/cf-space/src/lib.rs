//! `cf-space` — what a mover can see around it.
//!
//! Corridor negotiation needs two things from the world: nearby peers and a
//! short ray probe against static geometry.  [`SpaceQuery`] is that seam; a
//! game with its own physics scene implements it directly, everyone else
//! uses [`CrowdSpace`].
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`occupant`] | `Occupant` (typed capability), `PeerSnapshot`, `Wall`      |
//! | [`query`]    | `SpaceQuery` trait                                         |
//! | [`space`]    | `CrowdSpace` (R-tree of occupants + R-tree of walls)       |

pub mod occupant;
pub mod query;
pub mod space;

#[cfg(test)]
mod tests;

pub use occupant::{Occupant, PeerSnapshot, Wall};
pub use query::SpaceQuery;
pub use space::CrowdSpace;
