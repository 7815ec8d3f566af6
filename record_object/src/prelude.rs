//! Convenience re-exports for common record-object usage

// Core traits
pub use crate::traits::{AfterSave, BeforeSave, Model, Store, Timestamps};

// Active record
pub use crate::active_record::{ActiveRecord, Promote};

// Error types
pub use crate::errors::{StoreError, StoreResult};

// Validation
pub use crate::validation::{ErrorMap, Validation, ValidationError};

// Query building
pub use crate::query_builder::{Condition, ListOptions, OrderBy, Query, SortOrder};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
