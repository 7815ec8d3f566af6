//! # ActiveHaus
//!
//! Active record persistence over interchangeable storage backends: a
//! PostgreSQL JSONB document store, a hosted search service and a Redis
//! key-value table. Entities validate, save, load, delete and query
//! themselves through one API; each backend declares what it supports and
//! anything else fails before a network call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use activehaus::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize, Record)]
//! #[record(generate_id)]
//! pub struct Automobile {
//!     #[serde(default)]
//!     pub id: String,
//!
//!     #[serde(flatten)]
//!     pub timestamps: Timestamps,
//!
//!     #[record(required)]
//!     #[serde(default)]
//!     pub year: i32,
//!
//!     #[record(required)]
//!     #[serde(default)]
//!     pub model: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let haus = ActiveHaus::connect(AppConfig::load()?).await?;
//!     haus.ensure_collection::<Automobile>(false).await?;
//!
//!     let mut car = haus.record(
//!         Automobile { year: 2010, model: "panamera".into(), ..Default::default() },
//!         Backend::Document,
//!     )?;
//!     if !car.save().await? {
//!         println!("invalid: {:?}", car.errors());
//!     }
//!
//!     car.filter(Condition::gte("year", 2000)).order(OrderBy::desc("year"));
//!     let recent: Vec<Automobile> = car.run().await?;
//!     println!("{} recent automobiles", recent.len());
//!
//!     haus.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::{ActiveHaus, Backend};
pub use errors::ActiveHausError;

// Re-export centralized config
pub use config::{AppConfig, DocumentConfig, SearchConfig, TableConfig};

// Re-export internal crates used by macros and public API
// record_object MUST be public for the derive's generated code
pub use document_store;
pub use record_derive::Record;
pub use record_object;
pub use search_service;
pub use table_store;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
