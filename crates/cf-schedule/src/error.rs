use cf_core::MoverId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{0} is already registered with the scheduler")]
    AlreadyRegistered(MoverId),

    #[error("{0} is not registered with the scheduler")]
    NotRegistered(MoverId),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
