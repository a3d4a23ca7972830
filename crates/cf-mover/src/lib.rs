//! `cf-mover` — the per-agent half of the crowd coordinator.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`locomotion`]  | `Locomotion` trait (movement primitive), `SteeringParams`  |
//! | [`body`]        | `KinematicBody` — headless corner follower, also `Poolable` |
//! | [`breadcrumbs`] | `BreadcrumbTrail` — bounded recent-position history         |
//! | [`reservation`] | `ReservationStamper`, `sample_route`                       |
//! | [`negotiation`] | `Negotiator` state machine, `decide_yielder`               |
//! | [`mover`]       | `Mover<L>`, `RouteState`, `TickReport`                      |
//! | [`profile`]     | `MoverProfile`, `load_profiles_csv`, `load_profiles_reader` |
//! | [`error`]       | `MoverError`, `MoverResult<T>`                             |
//!
//! # Collaborators
//!
//! A mover never owns shared services.  The density field, the path queue
//! and the spatial query are borrowed per call from whoever owns them
//! (normally `cf_sim::Crowd`), and peers are only ever seen as
//! [`PeerSnapshot`][cf_space::PeerSnapshot] copies looked up by id.

pub mod body;
pub mod breadcrumbs;
pub mod error;
pub mod locomotion;
pub mod mover;
pub mod negotiation;
pub mod profile;
pub mod reservation;


pub use body::KinematicBody;
pub use breadcrumbs::BreadcrumbTrail;
pub use error::{MoverError, MoverResult};
pub use locomotion::{Locomotion, SteeringParams};
pub use mover::{Mover, RouteState, TickReport};
pub use negotiation::{
    NegotiationContext, NegotiationEvent, NegotiationPhase, Negotiator, ResumeReason, corridor_width,
    decide_yielder, mutual_head_on,
};
pub use profile::{MoverProfile, load_profiles_csv, load_profiles_reader};
pub use reservation::{ReservationStamper, sample_route};
