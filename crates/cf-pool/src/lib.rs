//! `cf-pool` — recycling for short-lived crowd agents.
//!
//! Background crowds spawn and despawn constantly.  Creating a body, its
//! movement primitive and its render state each time shows up as frame
//! spikes, so instances are kept per prefab kind and handed back out.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`poolable`] | `Poolable` trait (what the pool does to an instance)      |
//! | [`pool`]     | `EntityPool`, `Spawned`, `PoolStats`                      |
//! | [`error`]    | `PoolError`, `PoolResult<T>`                              |
//!
//! # Ownership
//!
//! A spawned instance is *moved out* to the caller together with its
//! [`EntityHandle`][cf_core::EntityHandle] and moved back in on despawn.
//! While checked out the pool only remembers the handle, so it cannot hand
//! the same instance to two owners.

pub mod error;
pub mod pool;
pub mod poolable;

#[cfg(test)]
mod tests;

pub use error::{PoolError, PoolResult};
pub use pool::{EntityPool, Factory, PoolStats, Spawned};
pub use poolable::Poolable;
