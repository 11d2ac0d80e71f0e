//! Error types produced by the runtime.

use thiserror::Error;

use crate::validation::ValidationError;

/// Failure of a persistence or query operation.
///
/// Generated members return this type unchanged from the runtime call they
/// forward to.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// No executor has been installed with [`Databases::install`](crate::Databases::install).
    #[error("no database executor is installed")]
    NoDatabase,

    /// The executor reported a failure.
    #[error("database backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The model failed validation before it was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A row or property could not be converted to or from the model.
    #[error("failed to convert model data: {0}")]
    Conversion(#[from] serde_json::Error),

    /// A statement returned something other than what was expected.
    #[error("unexpected result shape for `{sql}`: {detail}")]
    UnexpectedShape {
        /// Statement that produced the result.
        sql: String,
        /// What was wrong with it.
        detail: String,
    },
}

impl StorageError {
    /// Wraps an executor failure.
    pub fn backend<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Backend(error.into())
    }
}

/// Result alias used throughout the runtime.
pub type StorageResult<T> = Result<T, StorageError>;
