//! `cf-sim` — the crowd frame loop.
//!
//! # One frame
//!
//! ```text
//! step():
//!   ① Decay    — advance the density field clock.
//!   ② Pump     — dispatch up to K path queries; collect deferred results.
//!   ③ Snapshot — rebuild the spatial index from every mover's snapshot.
//!   ④ Movers   — in scheduler order:
//!                  frame_update  (breadcrumbs, reservations, negotiation)
//!                  tick          (only on the mover's active frames)
//!   ⑤ Move     — advance every body by one frame.
//! ```
//!
//! Negotiation reads the snapshot taken in ③, so both sides of a head-on
//! conflict see the same world regardless of processing order.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cf_core::{CrowdConfig, MoverId, Vec2};
//! use cf_mover::{KinematicBody, MoverProfile};
//! use cf_path::DirectSolver;
//! use cf_sim::{CrowdBuilder, NoopObserver};
//!
//! let mut crowd = CrowdBuilder::new(CrowdConfig::default(), DirectSolver, |_| KinematicBody::default())
//!     .build()?;
//! crowd.register_with(MoverId(1), KinematicBody::default(), MoverProfile::default())?;
//! crowd.set_destination(MoverId(1), Vec2::new(10.0, 0.0))?;
//! crowd.run_for_secs(5.0, &mut NoopObserver);
//! ```

pub mod builder;
pub mod crowd;
pub mod error;
pub mod observer;


pub use builder::CrowdBuilder;
pub use crowd::Crowd;
pub use error::{SimError, SimResult};
pub use observer::{CrowdObserver, FrameReport, NoopObserver};
