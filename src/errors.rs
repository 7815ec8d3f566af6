//! Error types for the ActiveHaus crate

use crate::core::Backend;
use config::ConfigError;
use record_object::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActiveHausError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to the {backend}: {source}")]
    Connection {
        backend: Backend,
        #[source]
        source: StoreError,
    },

    #[error("The {0} is not configured")]
    BackendNotConfigured(Backend),

    #[error(transparent)]
    Store(#[from] StoreError),
}
