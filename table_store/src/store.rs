//! Key-value table adapter
//!
//! The identifier is the item key and is not repeated among the stored
//! attributes, so reads put it back before handing the document out.

use crate::client::TableClient;
use async_trait::async_trait;
use record_object::query_builder::{ListOptions, Query};
use record_object::traits::{Capabilities, Capability, Persisted, Store, ID_FIELD};
use record_object::{debug_log, StoreError, StoreResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const BACKEND: &str = "key-value table";

const CAPABILITIES: Capabilities = Capabilities {
    patch: true,
    ..Capabilities::KEY_VALUE
};

#[derive(Debug, Clone)]
pub struct TableStore {
    client: Arc<dyn TableClient>,
}

impl TableStore {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn TableClient> {
        &self.client
    }
}

#[async_trait]
impl Store for TableStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    async fn persist(&self, collection: &str, record: Persisted<'_>) -> StoreResult<()> {
        let Value::Object(mut item) = record.document else {
            return Err(StoreError::Backend(format!(
                "{} records must serialize to a JSON object",
                collection
            )));
        };
        item.remove(ID_FIELD);

        debug!("[PERSIST] {} {}", collection, record.id);
        self.client.put_item(collection, record.id, item).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        debug!("[DELETE] {} {}", collection, id);
        self.client.delete_item(collection, id).await
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        debug_log!("[FIND] {} {}", collection, id);
        Ok(self
            .client
            .get_item(collection, id)
            .await?
            .map(|mut item| {
                item.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                Value::Object(item)
            }))
    }

    async fn search(&self, _collection: &str, _query: &Query) -> StoreResult<Vec<Value>> {
        Err(StoreError::ViewRequired {
            backend: BACKEND,
            operation: "search",
        })
    }

    async fn list_all(&self, _collection: &str, _options: &ListOptions) -> StoreResult<Vec<Value>> {
        Err(StoreError::ViewRequired {
            backend: BACKEND,
            operation: "listing",
        })
    }

    async fn truncate(&self, _collection: &str) -> StoreResult<Option<u64>> {
        Err(StoreError::Unsupported {
            backend: BACKEND,
            capability: Capability::Truncate,
        })
    }
}
