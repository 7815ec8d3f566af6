use crate::client::{Item, TableClient};
use async_trait::async_trait;
use record_object::{StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// In-process table client; items are keyed by `(table, key)`
#[derive(Debug, Clone, Default)]
pub struct MemoryTableClient {
    items: Arc<RwLock<HashMap<(String, String), Item>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryTableClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with a connection error until reset
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Stored attributes exactly as the table holds them
    pub fn raw_item(&self, table: &str, key: &str) -> Option<Item> {
        self.items
            .read()
            .ok()?
            .get(&(table.to_string(), key.to_string()))
            .cloned()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("table is offline".to_string()));
        }
        Ok(())
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("table lock poisoned".to_string())
    }
}

#[async_trait]
impl TableClient for MemoryTableClient {
    async fn get_item(&self, table: &str, key: &str) -> StoreResult<Option<Item>> {
        self.check_online()?;
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.get(&(table.to_string(), key.to_string())).cloned())
    }

    async fn put_item(&self, table: &str, key: &str, item: Item) -> StoreResult<()> {
        self.check_online()?;
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.insert((table.to_string(), key.to_string()), item);
        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &str) -> StoreResult<()> {
        self.check_online()?;
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.remove(&(table.to_string(), key.to_string()));
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }
}
