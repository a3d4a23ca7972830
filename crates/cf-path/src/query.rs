//! Path query records.

use cf_core::{MoverId, PathQueryId, PlannerHints, Vec2};

use crate::{Path, PathError};

/// What a solver delivers for one query.
pub type PathOutcome = Result<Path, PathError>;

/// A mover's request for a route, before the queue assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRequest {
    pub requester: MoverId,
    pub start:     Vec2,
    pub goal:      Vec2,
    pub hints:     PlannerHints,
    /// Avoidance priority of the requester at request time.  Carried for
    /// solvers that weigh important agents differently; dispatch order is
    /// FIFO regardless.
    pub priority:  i32,
}

/// A request the queue has accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    pub id:        PathQueryId,
    pub requester: MoverId,
    pub start:     Vec2,
    pub goal:      Vec2,
    pub hints:     PlannerHints,
    pub priority:  i32,
}

impl PathQuery {
    pub(crate) fn from_request(id: PathQueryId, req: PathRequest) -> Self {
        Self {
            id,
            requester: req.requester,
            start:     req.start,
            goal:      req.goal,
            hints:     req.hints,
            priority:  req.priority,
        }
    }
}

/// Where a query currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Waiting in the FIFO for a dispatch slot.
    Pending,
    /// Handed to the solver; no result yet.
    InFlight,
    /// A path is waiting for the requester to take it.
    Resolved,
    /// The solver reported failure; waiting for the requester to take it.
    Failed,
}
