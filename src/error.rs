use thiserror::Error;

use crate::types::FieldType;
use crate::value::Value;

#[derive(Debug, Error)]
pub enum Error {
    /// A where-value could not be converted to the column's declared type.
    ///
    /// Raised synchronously while a where-clause is normalized, never
    /// deferred to execution.
    #[error("cannot cast {value:?} to {ty} for column \"{column}\"")]
    Cast {
        column: String,
        ty: FieldType,
        value: Value,
    },

    /// Opaque error reported by the execution bridge.
    #[error("execution error: {0}")]
    Execution(String),

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for relation operations
pub type Result<T> = std::result::Result<T, Error>;
