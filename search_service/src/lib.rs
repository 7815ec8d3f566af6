//! Search Service - partial capability backend for ActiveHaus
//!
//! Targets a hosted key-value service with a Lucene-style search endpoint.
//! Filters support EQ and GTE only, sorting is per-field ascending or
//! descending, and there is no projection or aggregation. Inserts are
//! conditional so an existing record is never overwritten by accident.

pub mod client;
pub mod http;
pub mod lucene;
pub mod memory;
pub mod store;

pub use client::SearchClient;
pub use http::HttpSearchClient;
pub use memory::MemorySearchClient;
pub use store::SearchStore;

/// Page size when a listing does not name one
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Largest page the service returns
pub const MAX_PAGE_SIZE: usize = 100;
/// Results requested per search call
pub const SEARCH_LIMIT: usize = 100;
