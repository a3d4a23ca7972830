//! `cf-path` — path queries, solvers, and the request queue.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`path`]   | `Path` (corner list), polyline helpers                       |
//! | [`query`]  | `PathRequest`, `PathQuery`, `QueryStatus`, `PathOutcome`     |
//! | [`solver`] | `PathSolver` trait, `SolveStep`, `DirectSolver`              |
//! | [`queue`]  | `PathRequestQueue`, `QueueStats`, `PumpReport`               |
//! | [`error`]  | `PathError`, `PathResult<T>`                                 |
//!
//! # Request lifecycle
//!
//! ```text
//! enqueue ──► Pending ──(pump, ≤ K per frame)──► InFlight ──► Resolved / Failed
//!    │                                                            │
//!    └── a newer enqueue from the same requester supersedes ──────┘ (late result dropped)
//! ```
//!
//! Search internals are out of scope: the queue only rate-limits and
//! bookkeeps.  Games plug their navmesh or grid search in through
//! [`PathSolver`].

pub mod error;
pub mod path;
pub mod query;
pub mod queue;
pub mod solver;

#[cfg(test)]
mod tests;

pub use error::{PathError, PathResult};
pub use path::{Path, polyline_length};
pub use query::{PathOutcome, PathQuery, PathRequest, QueryStatus};
pub use queue::{PathRequestQueue, PumpReport, QueueStats};
pub use solver::{DirectSolver, PathSolver, SolveStep};
