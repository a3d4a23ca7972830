//! Unit tests for cf-path.

use std::collections::VecDeque;

use cf_core::{FieldConfig, MoverId, PathQueryId, PlannerHints, Vec2};
use cf_field::DensityField;

use crate::{
    DirectSolver, Path, PathError, PathOutcome, PathQuery, PathRequest, PathRequestQueue,
    PathSolver, QueryStatus, SolveStep, polyline_length,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn field() -> DensityField {
    DensityField::new(&FieldConfig::default()).unwrap()
}

fn req(requester: u32, goal_x: f32) -> PathRequest {
    PathRequest {
        requester: MoverId(requester),
        start:     Vec2::ZERO,
        goal:      Vec2::new(goal_x, 0.0),
        hints:     PlannerHints::NONE,
        priority:  50,
    }
}

/// Solver that holds every query for `delay` polls before answering.
struct DelayedSolver {
    delay:   u32,
    waiting: VecDeque<(PathQuery, u32)>,
}

impl DelayedSolver {
    fn new(delay: u32) -> Self {
        Self { delay, waiting: VecDeque::new() }
    }
}

impl PathSolver for DelayedSolver {
    fn solve(&mut self, query: &PathQuery, _field: &DensityField) -> SolveStep {
        self.waiting.push_back((query.clone(), self.delay));
        SolveStep::Deferred
    }

    fn poll(&mut self, _field: &DensityField) -> Vec<(PathQueryId, PathOutcome)> {
        let mut done = Vec::new();
        for (q, left) in self.waiting.iter_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                done.push((q.id, Ok(Path::straight(q.start, q.goal))));
            }
        }
        self.waiting.retain(|(_, left)| *left > 0);
        done
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use super::*;

    #[test]
    fn length_and_goal() {
        let p = Path::new(vec![Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(3.0, 4.0)]);
        assert_eq!(p.length(), 7.0);
        assert_eq!(p.goal(), Some(Vec2::new(3.0, 4.0)));
        assert!(!p.is_trivial());
        assert!(Path::default().is_trivial());
    }

    #[test]
    fn polyline_from_offset_start() {
        let corners = [Vec2::new(0.0, 2.0), Vec2::new(5.0, 2.0)];
        assert_eq!(polyline_length(Vec2::ZERO, &corners), 7.0);
        assert_eq!(polyline_length(Vec2::ZERO, &[]), 0.0);
    }
}

// ── Queue ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    #[test]
    fn enqueue_then_pump_resolves() {
        let mut q = PathRequestQueue::new(4);
        let id = q.enqueue(req(1, 10.0));
        assert_eq!(q.status(id), Some(QueryStatus::Pending));

        let report = q.pump(&mut DirectSolver, &field());
        assert_eq!(report.dispatched, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(q.status(id), Some(QueryStatus::Resolved));

        let (got, outcome) = q.take_result(MoverId(1)).unwrap();
        assert_eq!(got, id);
        assert_eq!(outcome.unwrap().goal(), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(q.status(id), None);
        assert_eq!(q.live_count(), 0);
    }

    #[test]
    fn budget_caps_dispatch_per_frame() {
        let mut q = PathRequestQueue::new(3);
        for i in 0..10 {
            q.enqueue(req(i, 1.0));
        }
        let f = field();
        assert_eq!(q.pump(&mut DirectSolver, &f).dispatched, 3);
        assert_eq!(q.pump(&mut DirectSolver, &f).dispatched, 3);
        assert_eq!(q.pump(&mut DirectSolver, &f).dispatched, 3);
        assert_eq!(q.pump(&mut DirectSolver, &f).dispatched, 1);
        assert_eq!(q.pump(&mut DirectSolver, &f).dispatched, 0);
        assert_eq!(q.stats().dispatched, 10);
    }

    #[test]
    fn fifo_order_across_requesters() {
        let mut q = PathRequestQueue::new(1);
        let mut order = Vec::new();
        let mut solver = |query: &PathQuery, _: &DensityField| -> PathOutcome {
            order.push(query.requester);
            Ok(Path::straight(query.start, query.goal))
        };
        q.enqueue(req(5, 1.0));
        q.enqueue(req(2, 1.0));
        q.enqueue(req(9, 1.0));
        let f = field();
        for _ in 0..3 {
            q.pump(&mut solver, &f);
        }
        assert_eq!(order, vec![MoverId(5), MoverId(2), MoverId(9)]);
    }

    #[test]
    fn second_enqueue_supersedes_pending() {
        let mut q = PathRequestQueue::new(4);
        let first = q.enqueue(req(1, 5.0));
        let second = q.enqueue(req(1, 8.0));
        assert!(second > first);
        assert_eq!(q.live_count(), 1);
        assert_eq!(q.status(first), None);

        let report = q.pump(&mut DirectSolver, &field());
        assert_eq!(report.dispatched, 1);
        assert_eq!(report.skipped, 1);

        let (id, outcome) = q.take_result(MoverId(1)).unwrap();
        assert_eq!(id, second);
        assert_eq!(outcome.unwrap().goal(), Some(Vec2::new(8.0, 0.0)));
        assert_eq!(q.stats().superseded, 1);
    }

    #[test]
    fn superseded_in_flight_result_is_discarded() {
        let mut q = PathRequestQueue::new(4);
        let mut solver = DelayedSolver::new(2);
        let f = field();

        let first = q.enqueue(req(1, 5.0));
        q.pump(&mut solver, &f); // dispatch first
        assert_eq!(q.status(first), Some(QueryStatus::InFlight));

        let second = q.enqueue(req(1, 8.0));
        q.pump(&mut solver, &f); // first: 1 poll left; dispatch second
        q.pump(&mut solver, &f); // first completes → discarded
        assert_eq!(q.stats().discarded_late, 1);
        assert!(q.take_result(MoverId(1)).is_none());

        q.pump(&mut solver, &f); // second completes
        let (id, _) = q.take_result(MoverId(1)).unwrap();
        assert_eq!(id, second);
    }

    #[test]
    fn new_enqueue_drops_unconsumed_result() {
        let mut q = PathRequestQueue::new(4);
        let f = field();
        q.enqueue(req(1, 5.0));
        q.pump(&mut DirectSolver, &f);
        let newer = q.enqueue(req(1, 6.0));
        assert!(q.take_result(MoverId(1)).is_none());
        q.pump(&mut DirectSolver, &f);
        assert_eq!(q.take_result(MoverId(1)).map(|(id, _)| id), Some(newer));
    }

    #[test]
    fn failure_is_delivered_not_retried() {
        let mut q = PathRequestQueue::new(4);
        let mut solver = |query: &PathQuery, _: &DensityField| -> PathOutcome {
            Err(PathError::Unreachable { start: query.start, goal: query.goal })
        };
        let f = field();
        let id = q.enqueue(req(3, 5.0));
        q.pump(&mut solver, &f);
        assert_eq!(q.status(id), Some(QueryStatus::Failed));
        let (_, outcome) = q.take_result(MoverId(3)).unwrap();
        assert!(matches!(outcome, Err(PathError::Unreachable { .. })));

        assert_eq!(q.pump(&mut solver, &f).dispatched, 0);
        assert_eq!(q.stats().failed, 1);
    }

    #[test]
    fn cancel_forgets_requester() {
        let mut q = PathRequestQueue::new(4);
        let mut solver = DelayedSolver::new(1);
        let f = field();
        q.enqueue(req(1, 5.0));
        q.pump(&mut solver, &f);
        q.cancel(MoverId(1));
        q.pump(&mut solver, &f);
        assert!(q.take_result(MoverId(1)).is_none());
        assert_eq!(q.live_count(), 0);
    }

    #[test]
    fn zero_budget_still_drains() {
        let mut q = PathRequestQueue::new(0);
        assert_eq!(q.dispatch_budget(), 1);
        q.enqueue(req(1, 1.0));
        assert_eq!(q.pump(&mut DirectSolver, &field()).dispatched, 1);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn dispatch_never_exceeds_budget(
            budget in 1usize..8,
            bursts in prop::collection::vec(prop::collection::vec(0u32..40, 0..60), 1..10),
        ) {
            let mut q = PathRequestQueue::new(budget);
            let f = field();
            for burst in &bursts {
                for &who in burst {
                    q.enqueue(req(who, who as f32));
                }
                let report = q.pump(&mut DirectSolver, &f);
                prop_assert!(report.dispatched <= budget);
            }
        }

        #[test]
        fn at_most_one_live_query_per_requester(
            requests in prop::collection::vec(0u32..10, 1..80),
            pump_every in 1usize..10,
        ) {
            let mut q = PathRequestQueue::new(3);
            let mut solver = DelayedSolver::new(2);
            let f = field();
            let mut latest: std::collections::HashMap<MoverId, PathQueryId> = Default::default();
            for (i, &who) in requests.iter().enumerate() {
                let id = q.enqueue(req(who, 1.0));
                latest.insert(MoverId(who), id);
                prop_assert!(q.live_count() <= 10);
                if i % pump_every == 0 {
                    q.pump(&mut solver, &f);
                }
            }
            for _ in 0..40 {
                q.pump(&mut solver, &f);
            }
            // Every delivered result belongs to the requester's newest query.
            for (who, newest) in latest {
                if let Some((id, _)) = q.take_result(who) {
                    prop_assert_eq!(id, newest);
                }
            }
        }
    }
}
