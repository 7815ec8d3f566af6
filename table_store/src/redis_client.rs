//! Redis-backed table client
//!
//! Each item is one Redis string holding its attributes as JSON, stored under
//! `{prefix:}{table}:{key}`. A single multiplexed connection is opened lazily
//! and shared by every clone of the client.

use crate::client::{Item, TableClient};
use async_trait::async_trait;
use config::TableConfig;
use record_object::{StoreError, StoreResult};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::debug;

#[derive(Clone)]
pub struct RedisTableClient {
    client: Arc<Client>,
    key_prefix: Option<String>,
    timeout: Duration,
    connection_timeout: Duration,
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
}

impl Debug for RedisTableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.connection.try_read() {
            Ok(connection) if connection.is_some() => "connected",
            Ok(_) => "no_connection",
            Err(_) => "lock_error",
        };

        f.debug_struct("RedisTableClient")
            .field("key_prefix", &self.key_prefix)
            .field("timeout", &self.timeout)
            .field("connected", &connection_status)
            .finish()
    }
}

fn redis_error(operation: &str, error: RedisError) -> StoreError {
    if error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
    {
        StoreError::Connection(format!("{}: {}", operation, error))
    } else {
        StoreError::backend(operation, error)
    }
}

impl RedisTableClient {
    /// Open the client without connecting
    pub fn new(config: &TableConfig) -> StoreResult<Self> {
        let client = Client::open(config.redis_url.as_str())
            .map_err(|e| StoreError::Connection(format!("invalid redis url: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            key_prefix: config.key_prefix.clone().filter(|prefix| !prefix.is_empty()),
            timeout: Duration::from_millis(config.timeout_ms),
            connection_timeout: Duration::from_millis(config.connection_timeout_ms),
            connection: Arc::new(RwLock::new(None)),
        })
    }

    /// Open the client and establish its connection, failing when Redis is unreachable
    pub async fn connect(config: &TableConfig) -> StoreResult<Self> {
        let client = Self::new(config)?;
        client.ping().await?;
        debug!("[TABLE] Connected to redis");
        Ok(client)
    }

    pub fn item_key(&self, table: &str, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}:{}", prefix, table, key),
            None => format!("{}:{}", table, key),
        }
    }

    async fn get_connection(&self) -> StoreResult<MultiplexedConnection> {
        let mut connection = self.connection.write().await;

        if connection.is_none() {
            let opened = timeout(
                self.connection_timeout,
                self.client.get_multiplexed_async_connection(),
            )
            .await
            .map_err(|_| StoreError::Connection("timed out connecting to redis".to_string()))?
            .map_err(|e| redis_error("connect", e))?;
            *connection = Some(opened);
        }

        connection
            .as_ref()
            .cloned()
            .ok_or_else(|| StoreError::Connection("no redis connection available".to_string()))
    }

    /// Run one command under the configured response timeout
    async fn round_trip<T, F>(&self, operation: &str, command: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        timeout(self.timeout, command)
            .await
            .map_err(|_| StoreError::Connection(format!("{}: timed out", operation)))?
            .map_err(|e| redis_error(operation, e))
    }
}

#[async_trait]
impl TableClient for RedisTableClient {
    async fn get_item(&self, table: &str, key: &str) -> StoreResult<Option<Item>> {
        let item_key = self.item_key(table, key);
        let mut conn = self.get_connection().await?;

        let stored: Option<String> = self.round_trip("get_item", conn.get(&item_key)).await?;
        match stored {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put_item(&self, table: &str, key: &str, item: Item) -> StoreResult<()> {
        let item_key = self.item_key(table, key);
        let json = serde_json::to_string(&item)?;
        let mut conn = self.get_connection().await?;

        self.round_trip::<(), _>("put_item", conn.set(&item_key, json))
            .await
    }

    async fn delete_item(&self, table: &str, key: &str) -> StoreResult<()> {
        let item_key = self.item_key(table, key);
        let mut conn = self.get_connection().await?;

        let _removed: i64 = self.round_trip("delete_item", conn.del(&item_key)).await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.get_connection().await?;
        let _pong: String = self
            .round_trip("ping", redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key_prefix: Option<&str>) -> TableConfig {
        let mut config = TableConfig::new("redis://127.0.0.1:6379".to_string(), 1000, 500);
        config.key_prefix = key_prefix.map(str::to_string);
        config
    }

    #[test]
    fn test_item_keys() {
        let client = RedisTableClient::new(&config(None)).unwrap();
        assert_eq!(client.item_key("automobiles", "42"), "automobiles:42");

        let client = RedisTableClient::new(&config(Some("staging"))).unwrap();
        assert_eq!(client.item_key("automobiles", "42"), "staging:automobiles:42");

        let client = RedisTableClient::new(&config(Some(""))).unwrap();
        assert_eq!(client.item_key("automobiles", "42"), "automobiles:42");
    }

    #[test]
    fn test_invalid_url_is_a_connection_error() {
        let mut config = config(None);
        config.redis_url = "not-a-url".to_string();
        let err = RedisTableClient::new(&config).unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));
    }
}
