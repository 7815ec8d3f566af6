//! Search service adapter

use crate::client::SearchClient;
use crate::lucene::{render_query, render_sort};
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SEARCH_LIMIT};
use async_trait::async_trait;
use record_object::query_builder::{ListOptions, Query, RelationalOperator};
use record_object::traits::{Capabilities, Persisted, Store, WriteKind};
use record_object::{trace_log, StoreError, StoreResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const BACKEND: &str = "search service";

const CAPABILITIES: Capabilities = Capabilities {
    search: true,
    filter: true,
    sort: true,
    projection: false,
    aggregation: false,
    listing: true,
    truncate: true,
    patch: true,
    operators: &[RelationalOperator::Eq, RelationalOperator::Gte],
};

#[derive(Debug, Clone)]
pub struct SearchStore {
    client: Arc<dyn SearchClient>,
}

impl SearchStore {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn SearchClient> {
        &self.client
    }
}

#[async_trait]
impl Store for SearchStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    /// A record never saved before is written conditionally, so an identifier
    /// already in use yields `StoreError::Conflict` instead of an overwrite.
    async fn persist(&self, collection: &str, record: Persisted<'_>) -> StoreResult<()> {
        match record.timestamps.write_kind() {
            WriteKind::Update => {
                debug!("[PERSIST] put {} {}", collection, record.id);
                self.client.put(collection, record.id, &record.document).await
            }
            WriteKind::Insert => {
                debug!("[PERSIST] put_if_absent {} {}", collection, record.id);
                self.client
                    .put_if_absent(collection, record.id, &record.document)
                    .await
            }
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        debug!("[DELETE] {} {}", collection, id);
        self.client.purge(collection, id).await
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.client.get(collection, id).await
    }

    async fn search(&self, collection: &str, query: &Query) -> StoreResult<Vec<Value>> {
        if let Some(capability) = CAPABILITIES.missing_for(query) {
            return Err(StoreError::Unsupported {
                backend: BACKEND,
                capability,
            });
        }

        let lucene = render_query(query)?;
        let sort = render_sort(query.order_bys())?;
        debug!("[SEARCH] {} query={} sort={:?}", collection, lucene, sort);

        let rows = self
            .client
            .search(collection, &lucene, sort.as_deref(), SEARCH_LIMIT, 0)
            .await?;
        trace_log!("[SEARCH] {} returned {} rows", collection, rows.len());
        Ok(rows)
    }

    async fn list_all(&self, collection: &str, options: &ListOptions) -> StoreResult<Vec<Value>> {
        let limit = options.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit > MAX_PAGE_SIZE {
            return Err(StoreError::InvalidOption(format!(
                "limit {} exceeds the maximum page size of {}",
                limit, MAX_PAGE_SIZE
            )));
        }
        self.client
            .list(collection, limit, options.cursor.as_ref())
            .await
    }

    /// The service does not report how many records a collection held
    async fn truncate(&self, collection: &str) -> StoreResult<Option<u64>> {
        debug!("[TRUNCATE] {}", collection);
        self.client.delete_collection(collection).await?;
        Ok(None)
    }
}
