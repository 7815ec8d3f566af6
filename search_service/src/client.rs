use async_trait::async_trait;
use record_object::query_builder::ListCursor;
use record_object::StoreResult;
use serde_json::Value;
use std::fmt::Debug;

/// Native operations of the key-value search service
#[async_trait]
pub trait SearchClient: Send + Sync + Debug {
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Value>>;

    /// Unconditional write
    async fn put(&self, collection: &str, key: &str, value: &Value) -> StoreResult<()>;

    /// Write only when `key` is unused; otherwise `StoreError::Conflict`
    async fn put_if_absent(&self, collection: &str, key: &str, value: &Value) -> StoreResult<()>;

    /// Remove a key and its history
    async fn purge(&self, collection: &str, key: &str) -> StoreResult<()>;

    /// One page of values in key order
    async fn list(
        &self,
        collection: &str,
        limit: usize,
        cursor: Option<&ListCursor>,
    ) -> StoreResult<Vec<Value>>;

    /// Values matching a Lucene query string, optionally sorted
    async fn search(
        &self,
        collection: &str,
        query: &str,
        sort: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Value>>;

    async fn delete_collection(&self, collection: &str) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;
}
