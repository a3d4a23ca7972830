//! `PathRequestQueue` — rate-limited, supersede-on-enqueue path dispatcher.
//!
//! # Why this exists
//!
//! Movers decide to replan independently, and a crowd arriving at a choke
//! point can all decide in the same frame.  Handing every request straight to
//! the solver would put the whole burst on one frame.  The queue caps
//! dispatches at `K` per frame, and because each requester holds at most one
//! live query, its length is bounded by the population no matter how often
//! movers ask.
//!
//! # Supersession
//!
//! Enqueuing for a requester that already has a live query replaces it.  A
//! pending entry is skipped lazily when it reaches the front of the FIFO; an
//! in-flight one keeps running in the solver and its result is discarded on
//! arrival because its id no longer matches the requester's live id.

use std::collections::{HashMap, VecDeque};

use cf_core::{MoverId, PathQueryId};
use cf_field::DensityField;
use tracing::{debug, trace};

use crate::{PathOutcome, PathQuery, PathRequest, PathSolver, QueryStatus, SolveStep};

/// Running totals since the queue was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub enqueued:       u64,
    pub dispatched:     u64,
    pub superseded:     u64,
    pub resolved:       u64,
    pub failed:         u64,
    /// Results that arrived for a query its requester had already replaced.
    pub discarded_late: u64,
}

/// What one [`PathRequestQueue::pump`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Queries handed to the solver this frame (never more than the budget).
    pub dispatched: usize,
    /// Results accepted for their requesters this frame.
    pub delivered:  usize,
    /// Superseded FIFO entries dropped without consuming budget.
    pub skipped:    usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveState {
    Pending,
    InFlight,
}

/// FIFO of path queries with a per-frame dispatch budget.
pub struct PathRequestQueue {
    budget:    usize,
    fifo:      VecDeque<PathQuery>,
    /// The one live query per requester.
    live:      HashMap<MoverId, (PathQueryId, LiveState)>,
    /// Every query the solver holds, including superseded ones.
    in_flight: HashMap<PathQueryId, MoverId>,
    /// Results waiting for their requester.
    delivered: HashMap<MoverId, (PathQueryId, PathOutcome)>,
    next_id:   PathQueryId,
    stats:     QueueStats,
}

impl PathRequestQueue {
    /// Create a queue dispatching at most `dispatch_budget` queries per frame.
    /// A zero budget is raised to one so the queue always drains.
    pub fn new(dispatch_budget: usize) -> Self {
        Self {
            budget:    dispatch_budget.max(1),
            fifo:      VecDeque::new(),
            live:      HashMap::new(),
            in_flight: HashMap::new(),
            delivered: HashMap::new(),
            next_id:   PathQueryId(0),
            stats:     QueueStats::default(),
        }
    }

    // ── Requester-facing API ──────────────────────────────────────────────

    /// Accept `request`, superseding any live query from the same requester.
    pub fn enqueue(&mut self, request: PathRequest) -> PathQueryId {
        let id = self.next_id;
        self.next_id = id.next();
        let requester = request.requester;

        if let Some((old, state)) = self.live.insert(requester, (id, LiveState::Pending)) {
            self.stats.superseded += 1;
            trace!(%requester, old = old.0, new = id.0, ?state, "path query superseded");
        }
        // An unconsumed result for an older query is stale now too.
        self.delivered.remove(&requester);

        self.fifo.push_back(PathQuery::from_request(id, request));
        self.stats.enqueued += 1;
        id
    }

    /// Take the delivered result for `requester`, if any.
    ///
    /// Returns the query id alongside the outcome so the caller can check it
    /// against the query it believes is current.
    pub fn take_result(&mut self, requester: MoverId) -> Option<(PathQueryId, PathOutcome)> {
        self.delivered.remove(&requester)
    }

    /// Forget everything about `requester` (despawn).  A query still in the
    /// solver is discarded when it returns.
    pub fn cancel(&mut self, requester: MoverId) {
        self.live.remove(&requester);
        self.delivered.remove(&requester);
    }

    /// Lifecycle position of `id`, or `None` once it has been consumed,
    /// superseded, or cancelled.
    pub fn status(&self, id: PathQueryId) -> Option<QueryStatus> {
        if let Some((_, state)) = self.live.values().find(|(live_id, _)| *live_id == id) {
            return Some(match state {
                LiveState::Pending  => QueryStatus::Pending,
                LiveState::InFlight => QueryStatus::InFlight,
            });
        }
        self.delivered
            .values()
            .find(|(done_id, _)| *done_id == id)
            .map(|(_, outcome)| match outcome {
                Ok(_)  => QueryStatus::Resolved,
                Err(_) => QueryStatus::Failed,
            })
    }

    /// The live (pending or in-flight) query id for `requester`.
    pub fn live_query(&self, requester: MoverId) -> Option<PathQueryId> {
        self.live.get(&requester).map(|(id, _)| *id)
    }

    /// Number of requesters with a pending or in-flight query.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Queries still waiting for a dispatch slot.
    pub fn pending_count(&self) -> usize {
        self.live.values().filter(|(_, s)| *s == LiveState::Pending).count()
    }

    pub fn dispatch_budget(&self) -> usize {
        self.budget
    }

    pub fn stats(&self) -> QueueStats {
        self.stats
    }

    // ── Per-frame pump ────────────────────────────────────────────────────

    /// Collect deferred completions from `solver`, then dispatch up to the
    /// budget of pending queries in FIFO order.
    pub fn pump<S: PathSolver + ?Sized>(&mut self, solver: &mut S, field: &DensityField) -> PumpReport {
        let mut report = PumpReport::default();

        for (id, outcome) in solver.poll(field) {
            if self.deliver(id, outcome) {
                report.delivered += 1;
            }
        }

        while report.dispatched < self.budget {
            let Some(query) = self.fifo.pop_front() else {
                break;
            };
            match self.live.get_mut(&query.requester) {
                Some((live_id, state)) if *live_id == query.id => *state = LiveState::InFlight,
                _ => {
                    report.skipped += 1;
                    continue;
                }
            }

            self.in_flight.insert(query.id, query.requester);
            report.dispatched += 1;
            self.stats.dispatched += 1;

            if let SolveStep::Done(outcome) = solver.solve(&query, field) {
                if self.deliver(query.id, outcome) {
                    report.delivered += 1;
                }
            }
        }

        report
    }

    /// Route a solver result to its requester.  Returns `false` if the
    /// query was superseded or cancelled meanwhile.
    fn deliver(&mut self, id: PathQueryId, outcome: PathOutcome) -> bool {
        let Some(requester) = self.in_flight.remove(&id) else {
            trace!(query = id.0, "result for unknown query ignored");
            return false;
        };
        match self.live.get(&requester) {
            Some((live_id, _)) if *live_id == id => {
                self.live.remove(&requester);
            }
            _ => {
                self.stats.discarded_late += 1;
                trace!(%requester, query = id.0, "late path result discarded");
                return false;
            }
        }

        match &outcome {
            Ok(_) => self.stats.resolved += 1,
            Err(e) => {
                self.stats.failed += 1;
                debug!(%requester, query = id.0, error = %e, "path query failed");
            }
        }
        self.delivered.insert(requester, (id, outcome));
        true
    }
}
