//! Base error type.
//!
//! Sub-crates define their own error enums and either wrap `CoreError` as one
//! variant or keep it separate; prefer whichever keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `cf-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `cf-core`.
pub type CoreResult<T> = Result<T, CoreError>;
