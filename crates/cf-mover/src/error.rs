use cf_core::MoverId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoverError {
    #[error("profile parse error: {0}")]
    Parse(String),

    #[error("duplicate profile for {0}")]
    DuplicateProfile(MoverId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MoverResult<T> = Result<T, MoverError>;
