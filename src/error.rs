//! Error types for the registry and its storage backends.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected input. Always raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid {field} '{value}': not a number")]
    NotNumeric { field: &'static str, value: String },

    #[error("Invalid {field} {value}: must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(f) | Self::EmptyField(f) => f,
            Self::NotNumeric { field, .. } | Self::OutOfRange { field, .. } => field,
        }
    }
}

/// Storage backend failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cannot access school data at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt school data at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("School {id} is invalid: {reason}")]
    InvalidRecord { id: u64, reason: String },

    #[error("School id {0} appears more than once")]
    DuplicateId(u64),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No school ids left after {0}")]
    IdsExhausted(u64),
}
