use cf_core::{EntityHandle, PrefabKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("{0} was never issued by this pool")]
    UnknownHandle(EntityHandle),

    #[error("{0} is not checked out")]
    NotCheckedOut(EntityHandle),

    #[error("{handle} belongs to {expected}, not {actual}")]
    KindMismatch {
        handle:   EntityHandle,
        expected: PrefabKind,
        actual:   PrefabKind,
    },
}

pub type PoolResult<T> = Result<T, PoolError>;
