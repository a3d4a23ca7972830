use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field grid must be non-empty, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("invalid field parameter: {0}")]
    InvalidParameter(String),
}

pub type FieldResult<T> = Result<T, FieldError>;
