//! Solver trait and the trivial default implementation.
//!
//! # Pluggability
//!
//! The queue talks to search through [`PathSolver`], so a game can hand in
//! its navmesh query, a flow-field lookup, or a job-system-backed search
//! without touching the coordination layer.  Synchronous solvers answer from
//! [`solve`][PathSolver::solve]; asynchronous ones return
//! [`SolveStep::Deferred`] and later report completions from
//! [`poll`][PathSolver::poll].

use cf_core::PathQueryId;
use cf_field::DensityField;

use crate::{Path, PathOutcome, PathQuery};

/// Result of handing one query to a solver.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveStep {
    /// The solver finished immediately.
    Done(PathOutcome),
    /// The solver accepted the query and will report it from `poll`.
    Deferred,
}

/// Pluggable path search.
///
/// `field` is the region's density overlay; solvers that honour
/// [`PlannerHints::AVOID_DENSITY`][cf_core::PlannerHints::AVOID_DENSITY]
/// add [`DensityField::query_cost`] to their edge weights.
pub trait PathSolver {
    /// Begin solving `query`.
    fn solve(&mut self, query: &PathQuery, field: &DensityField) -> SolveStep;

    /// Completions of previously deferred queries.  Called once per frame
    /// before new dispatches.
    ///
    /// Default: nothing is ever deferred.
    fn poll(&mut self, _field: &DensityField) -> Vec<(PathQueryId, PathOutcome)> {
        Vec::new()
    }
}

/// Any `FnMut(&PathQuery, &DensityField) -> PathOutcome` is a synchronous
/// solver.
impl<F> PathSolver for F
where
    F: FnMut(&PathQuery, &DensityField) -> PathOutcome,
{
    fn solve(&mut self, query: &PathQuery, field: &DensityField) -> SolveStep {
        SolveStep::Done(self(query, field))
    }
}

/// Straight-line solver: every goal is reachable in one segment.
///
/// Stand-in for open terrain and for tests; it ignores the density field.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSolver;

impl PathSolver for DirectSolver {
    fn solve(&mut self, query: &PathQuery, _field: &DensityField) -> SolveStep {
        SolveStep::Done(Ok(Path::straight(query.start, query.goal)))
    }
}
