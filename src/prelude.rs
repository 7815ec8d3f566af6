//! Convenience re-exports for common ActiveHaus usage
//!
//! ```rust
//! use activehaus::prelude::*;
//! ```

// Coordinator
pub use crate::core::{ActiveHaus, Backend};
pub use crate::errors::ActiveHausError;

// Centralized config
pub use config::{AppConfig, DocumentConfig, SearchConfig, TableConfig};

// Records, queries, validation
pub use record_object::prelude::*;
pub use record_object::{ListCursor, RelationalOperator};

// Derive for model definitions
pub use record_derive::Record;

// Backend clients
pub use document_store::{MemoryDocumentClient, PgDocumentClient};
pub use search_service::{HttpSearchClient, MemorySearchClient};
pub use table_store::{MemoryTableClient, RedisTableClient};

// Common external dependencies
pub use anyhow;
pub use tokio;
