//! Document Store - full capability backend for ActiveHaus
//!
//! Records are stored whole as JSON documents. Every part of the query model
//! is supported: all six relational operators, sorting, projection, a
//! single-field sum and distinct. Partial updates are not offered; saves
//! replace the whole document.

pub mod client;
pub mod memory;
pub mod plan;
pub mod postgres;
pub mod sql;
pub mod store;

pub use client::DocumentClient;
pub use memory::MemoryDocumentClient;
pub use plan::{DocumentPlan, Expr};
pub use postgres::PgDocumentClient;
pub use store::DocumentStore;
