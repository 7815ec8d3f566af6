//! Record Object - active record core for ActiveHaus
//!
//! This crate provides the backend-agnostic pieces: the [`Model`] and
//! [`Store`] traits, the query model, validation, and [`ActiveRecord`], which
//! binds a model value to one store adapter.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod active_record;
pub mod errors;
pub mod merge;
pub mod naming;
pub mod prelude;
pub mod query_builder;
pub mod traits;
pub mod validation;
pub mod value;

pub use active_record::{ActiveRecord, Promote};
pub use errors::{StoreError, StoreResult};
pub use query_builder::{
    Condition, ListCursor, ListOptions, LogicalOperator, OrderBy, Query, RelationalOperator,
    SortOrder,
};
pub use traits::*;
pub use validation::{Blank, ErrorMap, Validation, ValidationError};

// Used by code generated from #[derive(Record)]
pub use anyhow;
pub use serde;
