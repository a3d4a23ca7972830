//! `cf-schedule` — per-mover tick cadence and the frame scheduler.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`cadence`]   | `Cadence` (tier, interval, next active tick time)         |
//! | [`scheduler`] | `TickScheduler` (registration-ordered membership)         |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Tick model (summary)
//!
//! The crowd runs every frame, but each mover only does its expensive work
//! (path polling, steering, stamping) on *active* frames:
//!
//! ```text
//! active           = now ≥ next_tick_time
//! next_tick_time  += 1 / hz(tier)          (on every active frame)
//! ```
//!
//! Cheap per-frame work such as breadcrumbs and negotiation runs on every
//! frame regardless of tier.

pub mod cadence;
pub mod error;
pub mod scheduler;


pub use cadence::Cadence;
pub use error::{ScheduleError, ScheduleResult};
pub use scheduler::TickScheduler;
