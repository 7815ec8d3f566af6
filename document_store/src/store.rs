//! Document store adapter

use crate::client::DocumentClient;
use crate::plan::DocumentPlan;
use async_trait::async_trait;
use record_object::query_builder::{ListOptions, Query};
use record_object::traits::{Capabilities, Persisted, Store};
use record_object::{trace_log, StoreResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const BACKEND: &str = "document store";

/// Full capability adapter over any [`DocumentClient`]
#[derive(Debug, Clone)]
pub struct DocumentStore {
    client: Arc<dyn DocumentClient>,
}

impl DocumentStore {
    pub fn new(client: Arc<dyn DocumentClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn DocumentClient> {
        &self.client
    }
}

#[async_trait]
impl Store for DocumentStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }

    /// Upsert: saving the same identifier twice replaces the document
    async fn persist(&self, collection: &str, record: Persisted<'_>) -> StoreResult<()> {
        debug!("[PERSIST] {} {}", collection, record.id);
        self.client.upsert(collection, record.id, record.document).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        debug!("[DELETE] {} {}", collection, id);
        self.client.delete(collection, id).await
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.client.get(collection, id).await
    }

    async fn search(&self, collection: &str, query: &Query) -> StoreResult<Vec<Value>> {
        let plan = DocumentPlan::from_query(query)?;
        debug!("[SEARCH] {} {:?}", collection, plan);
        let rows = self.client.query(collection, &plan).await?;
        trace_log!("[SEARCH] {} returned {} rows", collection, rows.len());
        Ok(rows)
    }

    async fn list_all(&self, collection: &str, options: &ListOptions) -> StoreResult<Vec<Value>> {
        self.client.scan(collection, options).await
    }

    async fn truncate(&self, collection: &str) -> StoreResult<Option<u64>> {
        let removed = self.client.delete_all(collection).await?;
        debug!("[TRUNCATE] {} removed {}", collection, removed);
        Ok(Some(removed))
    }
}
