//! Path-subsystem error type.

use thiserror::Error;

use cf_core::Vec2;

/// Why a query could not produce a path.
///
/// Delivered to the requester as the `Err` side of a
/// [`PathOutcome`][crate::PathOutcome]; never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("no path from {start} to {goal}")]
    Unreachable { start: Vec2, goal: Vec2 },

    #[error("solver error: {0}")]
    Solver(String),
}

pub type PathResult<T> = Result<T, PathError>;
