//! `cf-field` — the shared density field.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`field`]   | `DensityField` (dense grid, lazy exponential decay)   |
//! | [`error`]   | `FieldError`, `FieldResult<T>`                        |
//!
//! # Decay model (summary)
//!
//! Each cell stores its weight as of the last time it was touched.  Reads
//! and writes first apply `exp(-λ·Δt)` with `λ = ln 2 / half_life`, so the
//! cost seen by a planner is exact regardless of how often
//! [`DensityField::decay_tick`] runs.  Stamps are pure additions, which makes
//! every write commutative: movers may stamp in any order within a frame.

pub mod error;
pub mod field;

#[cfg(test)]
mod tests;

pub use error::{FieldError, FieldResult};
pub use field::DensityField;
