use cf_core::{CoreError, MoverId};
use cf_field::FieldError;
use cf_mover::MoverError;
use cf_pool::PoolError;
use cf_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("density field error: {0}")]
    Field(#[from] FieldError),

    #[error("scheduler error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("profile error: {0}")]
    Profile(#[from] MoverError),

    #[error("{0} is reserved and cannot name a mover")]
    InvalidId(MoverId),

    #[error("{0} is not in the crowd")]
    UnknownMover(MoverId),

    #[error("{0} was spawned from the pool; use despawn")]
    Pooled(MoverId),

    #[error("{0} was not spawned from the pool; use unregister")]
    NotPooled(MoverId),
}

pub type SimResult<T> = Result<T, SimError>;
