use crate::traits::Capability;
use thiserror::Error;

/// Errors shared by the active record core and every backend adapter.
///
/// Validation failures are not represented here: they are recorded per field
/// in the record's [`ErrorMap`](crate::validation::ErrorMap).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: String },

    #[error("{collection} record already exists: {id}")]
    Conflict { collection: String, id: String },

    #[error("Query translation error: {0}")]
    Translation(String),

    #[error("{backend} does not support {capability}")]
    Unsupported {
        backend: &'static str,
        capability: Capability,
    },

    #[error("{operation} is not supported by {backend}; use a materialized view instead")]
    ViewRequired {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Record has no identifier")]
    MissingId,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("before_save hook failed: {0}")]
    Hook(anyhow::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(collection: &str, id: &str) -> Self {
        Self::Conflict {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    /// Wrap a backend client failure, tagging it with the operation that failed
    pub fn backend(operation: &str, error: impl std::fmt::Display) -> Self {
        Self::Backend(format!("{}: {}", operation, error))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
