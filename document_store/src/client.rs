use crate::plan::DocumentPlan;
use async_trait::async_trait;
use record_object::query_builder::ListOptions;
use record_object::StoreResult;
use serde_json::Value;
use std::fmt::Debug;

/// Native operations of a document database
///
/// One client serves every collection and is shared by all in-flight
/// operations.
#[async_trait]
pub trait DocumentClient: Send + Sync + Debug {
    /// Insert or replace the document stored under `id`
    async fn upsert(&self, collection: &str, id: &str, document: Value) -> StoreResult<()>;

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Removing an absent document is not an error
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Documents in identifier order, honoring the cursor and limit
    async fn scan(&self, collection: &str, options: &ListOptions) -> StoreResult<Vec<Value>>;

    /// Run a translated query. A sum plan yields exactly one number.
    async fn query(&self, collection: &str, plan: &DocumentPlan) -> StoreResult<Vec<Value>>;

    async fn delete_all(&self, collection: &str) -> StoreResult<u64>;

    /// Create the collection if needed, dropping it first when `recreate`
    async fn create_collection(&self, collection: &str, recreate: bool) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;

    async fn close(&self);
}
