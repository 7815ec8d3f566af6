//! Table Store - minimal capability backend for ActiveHaus
//!
//! Items are reached by identifier only. Searching and listing need a
//! materialized view maintained elsewhere and are refused with
//! `StoreError::ViewRequired`.

pub mod client;
pub mod memory;
pub mod redis_client;
pub mod store;

pub use client::{Item, TableClient};
pub use memory::MemoryTableClient;
pub use redis_client::RedisTableClient;
pub use store::TableStore;
