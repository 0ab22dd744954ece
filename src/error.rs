use thiserror::Error;

use crate::models::Axis;

/// Convenient result alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while converting, validating, loading or matching points
#[derive(Debug, Error)]
pub enum Error {
    /// A field could not be interpreted as the value it stands for.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A decimal-degree value lies outside the valid range for its axis.
    #[error("invalid {axis} coordinate: {value}")]
    InvalidCoordinate { axis: Axis, value: f64 },

    /// A point record carried the wrong number of fields.
    #[error("malformed point: expected {expected} fields, found {found}")]
    MalformedPointFormat { expected: usize, found: usize },

    /// A CSV header lacks a column the loader needs.
    #[error("missing column: {name}")]
    MissingColumn { name: String },

    /// A concurrent matching task failed to complete.
    #[error("matching worker failed: {0}")]
    Worker(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }
}
