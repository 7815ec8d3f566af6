//! Core ActiveHaus functionality
//!
//! [`ActiveHaus`] owns one long-lived native client per configured backend and
//! hands out store adapters built on them. Clients are created once, shared by
//! every entity type and every in-flight operation, and released by
//! [`ActiveHaus::shutdown`].

use config::AppConfig;
use document_store::{DocumentClient, DocumentStore, PgDocumentClient};
use record_object::traits::Store;
use record_object::{ActiveRecord, Model};
use search_service::{HttpSearchClient, SearchClient, SearchStore};
use std::fmt;
use std::sync::Arc;
use table_store::{RedisTableClient, TableClient, TableStore};
use tracing::{debug, info};

use crate::errors::ActiveHausError;

/// The storage backends an entity can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Document,
    Search,
    Table,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Document => f.write_str("document store"),
            Backend::Search => f.write_str("search service"),
            Backend::Table => f.write_str("key-value table"),
        }
    }
}

/// Coordinator for the backend clients of one process
#[derive(Debug, Clone, Default)]
pub struct ActiveHaus {
    document: Option<Arc<dyn DocumentClient>>,
    search: Option<Arc<dyn SearchClient>>,
    table: Option<Arc<dyn TableClient>>,
}

impl ActiveHaus {
    /// Coordinator with no backends; attach clients with the `with_*` methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect every backend named in `config`
    ///
    /// A backend that cannot be reached is fatal: every later operation on it
    /// would fail, so the error is returned here instead.
    pub async fn connect(config: AppConfig) -> Result<Self, ActiveHausError> {
        config.validate()?;
        let mut haus = Self::new();

        if let Some(document) = &config.document {
            let client = PgDocumentClient::connect(document)
                .await
                .map_err(|source| ActiveHausError::Connection {
                    backend: Backend::Document,
                    source,
                })?;
            info!("Connected to the document store at {}:{}", document.host, document.port);
            haus = haus.with_document_client(Arc::new(client));
        }

        if let Some(search) = &config.search {
            let connected = match HttpSearchClient::connect(search) {
                Ok(client) => client.ping().await.map(|_| client),
                Err(e) => Err(e),
            };
            let client = connected.map_err(|source| ActiveHausError::Connection {
                backend: Backend::Search,
                source,
            })?;
            info!("Connected to the search service at {}", search.base_url);
            haus = haus.with_search_client(Arc::new(client));
        }

        if let Some(table) = &config.table {
            let client = RedisTableClient::connect(table)
                .await
                .map_err(|source| ActiveHausError::Connection {
                    backend: Backend::Table,
                    source,
                })?;
            info!("Connected to the key-value table");
            haus = haus.with_table_client(Arc::new(client));
        }

        Ok(haus)
    }

    pub fn with_document_client(mut self, client: Arc<dyn DocumentClient>) -> Self {
        self.document = Some(client);
        self
    }

    pub fn with_search_client(mut self, client: Arc<dyn SearchClient>) -> Self {
        self.search = Some(client);
        self
    }

    pub fn with_table_client(mut self, client: Arc<dyn TableClient>) -> Self {
        self.table = Some(client);
        self
    }

    pub fn is_configured(&self, backend: Backend) -> bool {
        match backend {
            Backend::Document => self.document.is_some(),
            Backend::Search => self.search.is_some(),
            Backend::Table => self.table.is_some(),
        }
    }

    pub(crate) fn document_client(&self) -> Result<&Arc<dyn DocumentClient>, ActiveHausError> {
        self.document
            .as_ref()
            .ok_or(ActiveHausError::BackendNotConfigured(Backend::Document))
    }

    /// Store adapter for `backend`, sharing the backend's client
    pub fn store(&self, backend: Backend) -> Result<Arc<dyn Store>, ActiveHausError> {
        let not_configured = || ActiveHausError::BackendNotConfigured(backend);
        let store: Arc<dyn Store> = match backend {
            Backend::Document => Arc::new(DocumentStore::new(self.document_client()?.clone())),
            Backend::Search => Arc::new(SearchStore::new(
                self.search.clone().ok_or_else(not_configured)?,
            )),
            Backend::Table => Arc::new(TableStore::new(
                self.table.clone().ok_or_else(not_configured)?,
            )),
        };
        Ok(store)
    }

    /// Bind `model` to `backend`
    pub fn record<M: Model>(&self, model: M, backend: Backend) -> Result<ActiveRecord<M>, ActiveHausError> {
        Ok(ActiveRecord::new(model, self.store(backend)?))
    }

    /// Ping every configured backend
    pub async fn health_check(&self) -> Result<(), ActiveHausError> {
        if let Some(client) = &self.document {
            client.ping().await?;
        }
        if let Some(client) = &self.search {
            client.ping().await?;
        }
        if let Some(client) = &self.table {
            client.ping().await?;
        }
        debug!("[HEALTH] all configured backends reachable");
        Ok(())
    }

    /// Release pooled connections. Stores handed out earlier stop working.
    pub async fn shutdown(self) {
        if let Some(client) = &self.document {
            client.close().await;
        }
        info!("ActiveHaus shut down");
    }
}
