use async_trait::async_trait;
use record_object::StoreResult;
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Attributes of one stored item, without its key
pub type Item = Map<String, Value>;

/// Native operations of the key-value table
#[async_trait]
pub trait TableClient: Send + Sync + Debug {
    async fn get_item(&self, table: &str, key: &str) -> StoreResult<Option<Item>>;

    async fn put_item(&self, table: &str, key: &str, item: Item) -> StoreResult<()>;

    /// Removing an absent key is not an error
    async fn delete_item(&self, table: &str, key: &str) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;
}
