//! PostgreSQL JSONB document client

use crate::client::DocumentClient;
use crate::plan::DocumentPlan;
use crate::sql::{self, Param, Statement};
use async_trait::async_trait;
use config::DocumentConfig;
use record_object::query_builder::ListOptions;
use record_object::value::number_value;
use record_object::{StoreError, StoreResult};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions};
use sqlx::query::Query as SqlQuery;
use sqlx::types::Json;
use sqlx::{Postgres, Row};
use std::time::Duration;
use tracing::debug;

/// Document client over a shared connection pool
#[derive(Debug, Clone)]
pub struct PgDocumentClient {
    pool: PgPool,
}

impl PgDocumentClient {
    /// Open the connection pool. Failure here is fatal for this backend.
    pub async fn connect(config: &DocumentConfig) -> StoreResult<Self> {
        let mut pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        if config.max_lifetime_seconds > 0 {
            pool_options = pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options
            .connect(&config.connection_string())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_documents(&self, statement: &Statement, operation: &str) -> StoreResult<Vec<Value>> {
        debug!("[{}] {}", operation, statement.sql);
        let rows = bind_params(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(operation, e))?;

        rows.iter()
            .map(|row| {
                row.try_get::<Json<Value>, _>("doc")
                    .map(|document| document.0)
                    .map_err(|e| db_error(operation, e))
            })
            .collect()
    }
}

fn bind_params<'q>(
    mut query: SqlQuery<'q, Postgres, PgArguments>,
    params: &[Param],
) -> SqlQuery<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            Param::Json(value) => query.bind(Json(value.clone())),
            Param::Text(text) => query.bind(text.clone()),
        };
    }
    query
}

fn db_error(operation: &str, error: sqlx::Error) -> StoreError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            StoreError::Connection(format!("{}: {}", operation, error))
        }
        other => StoreError::backend(operation, other),
    }
}

#[async_trait]
impl DocumentClient for PgDocumentClient {
    async fn upsert(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        let sql = sql::upsert(collection)?;
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("upsert", e))?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let sql = sql::select_by_id(collection)?;
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get", e))?;

        row.map(|row| {
            row.try_get::<Json<Value>, _>("data")
                .map(|document| document.0)
                .map_err(|e| db_error("get", e))
        })
        .transpose()
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let sql = sql::delete_by_id(collection)?;
        sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete", e))?;
        Ok(())
    }

    async fn scan(&self, collection: &str, options: &ListOptions) -> StoreResult<Vec<Value>> {
        let statement = sql::scan(collection, options)?;
        self.fetch_documents(&statement, "SCAN").await
    }

    async fn query(&self, collection: &str, plan: &DocumentPlan) -> StoreResult<Vec<Value>> {
        let statement = sql::select(collection, plan)?;

        if plan.sum.is_some() {
            debug!("[SUM] {}", statement.sql);
            let row = bind_params(sqlx::query(&statement.sql), &statement.params)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("sum", e))?;
            let total: f64 = row.try_get("total").map_err(|e| db_error("sum", e))?;
            return Ok(vec![number_value(total)]);
        }

        self.fetch_documents(&statement, "QUERY").await
    }

    async fn delete_all(&self, collection: &str) -> StoreResult<u64> {
        let sql = sql::delete_all(collection)?;
        let result = sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete_all", e))?;
        Ok(result.rows_affected())
    }

    async fn create_collection(&self, collection: &str, recreate: bool) -> StoreResult<()> {
        if recreate {
            let drop_sql = sql::drop_table(collection)?;
            debug!("[MIGRATE] {}", drop_sql);
            sqlx::query(&drop_sql)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("drop_table", e))?;
        }

        let create_sql = sql::create_table(collection)?;
        debug!("[MIGRATE] {}", create_sql);
        sqlx::query(&create_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("create_table", e))?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("ping", e))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
