//! Frame observer hooks for diagnostics and data collection.

use cf_core::{MoverId, PrefabKind};
use cf_mover::NegotiationEvent;
use cf_path::PathError;

/// Totals for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub frame:       u64,
    pub now:         f64,
    /// Movers that had an active tick.
    pub active:      usize,
    /// Path queries enqueued by movers.
    pub requested:   usize,
    /// Queries handed to the solver.
    pub dispatched:  usize,
    /// Paths applied to bodies.
    pub paths:       usize,
    pub failures:    usize,
    pub arrivals:    usize,
    pub negotiation: usize,
    /// Movers currently yielding.
    pub yielding:    usize,
}

/// Callbacks invoked by [`Crowd::step`][crate::Crowd::step].
///
/// All methods default to no-ops.
///
/// # Example — yield log
///
/// ```rust,ignore
/// struct YieldLog(Vec<(MoverId, NegotiationEvent)>);
///
/// impl CrowdObserver for YieldLog {
///     fn on_negotiation(&mut self, mover: MoverId, event: &NegotiationEvent) {
///         self.0.push((mover, *event));
///     }
/// }
/// ```
pub trait CrowdObserver {
    /// Start of the frame, before the field decays.
    fn on_frame_start(&mut self, _frame: u64, _now: f64) {}

    /// End of the frame, after bodies moved.
    fn on_frame_end(&mut self, _report: &FrameReport) {}

    fn on_negotiation(&mut self, _mover: MoverId, _event: &NegotiationEvent) {}

    /// A mover's path query failed.  The mover retries on its own.
    fn on_path_failed(&mut self, _mover: MoverId, _error: &PathError) {}

    fn on_arrival(&mut self, _mover: MoverId) {}

    /// A spawn since the last frame had to create a fresh instance.
    fn on_pool_fallback(&mut self, _mover: MoverId, _kind: PrefabKind) {}
}

/// A [`CrowdObserver`] that does nothing.
pub struct NoopObserver;

impl CrowdObserver for NoopObserver {}
