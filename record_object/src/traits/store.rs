//! Storage backend contract
//!
//! Every adapter owns one long-lived client handle and serves all entity
//! types through it, so operations take the collection name explicitly and
//! exchange JSON documents rather than concrete types.

use super::capabilities::Capabilities;
use super::model::Timestamps;
use crate::errors::StoreError;
use crate::query_builder::{ListOptions, Query};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// A record on its way to storage
#[derive(Debug, Clone)]
pub struct Persisted<'a> {
    pub id: &'a str,
    pub timestamps: &'a Timestamps,
    pub document: Value,
}

#[async_trait]
pub trait Store: Send + Sync + Debug {
    /// Human readable backend name used in errors and logs
    fn backend(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Write a record. Insert versus update semantics are backend specific and
    /// decided from `record.timestamps`.
    async fn persist(&self, collection: &str, record: Persisted<'_>) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// `Ok(None)` when no record has this identifier
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Translate and run `query`, returning one JSON row per result
    async fn search(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    async fn list_all(
        &self,
        collection: &str,
        options: &ListOptions,
    ) -> Result<Vec<Value>, StoreError>;

    /// Delete every record in the collection. `None` when the backend does not
    /// report how many were removed.
    async fn truncate(&self, collection: &str) -> Result<Option<u64>, StoreError>;
}
