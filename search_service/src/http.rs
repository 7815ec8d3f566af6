//! HTTP client for the hosted search service

use crate::client::SearchClient;
use async_trait::async_trait;
use config::SearchConfig;
use record_object::query_builder::ListCursor;
use record_object::{StoreError, StoreResult};
use reqwest::header::IF_NONE_MATCH;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ResultPage {
    #[serde(default)]
    results: Vec<ResultItem>,
}

#[derive(Debug, Deserialize)]
struct ResultItem {
    value: Value,
}

/// Talks to the service's REST API, one collection per model
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl HttpSearchClient {
    pub fn connect(config: &SearchConfig) -> StoreResult<Self> {
        let api_key = config
            .resolve_api_key()
            .map_err(|e| StoreError::Connection(format!("search api key: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| StoreError::Connection(format!("invalid search url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Connection(format!(
                "invalid search url {}: not a base url",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connection_timeout_ms))
            .build()
            .map_err(|e| StoreError::Connection(format!("failed to build http client: {}", e)))?;

        debug!("[SEARCH] Client ready for {}", base_url);
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn url(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Connection(format!("invalid search url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.api_key, Some(""))
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> StoreResult<Response> {
        request.send().await.map_err(|e| transport_error(operation, e))
    }

    async fn results(&self, operation: &str, request: RequestBuilder) -> StoreResult<Vec<Value>> {
        let response = checked(operation, self.send(operation, request).await?).await?;
        let page: ResultPage = response
            .json()
            .await
            .map_err(|e| StoreError::backend(operation, e))?;
        Ok(page.results.into_iter().map(|item| item.value).collect())
    }
}

fn transport_error(operation: &str, error: reqwest::Error) -> StoreError {
    if error.is_connect() || error.is_timeout() {
        StoreError::Connection(format!("{}: {}", operation, error))
    } else {
        StoreError::backend(operation, error)
    }
}

/// Turn a non-success status into an error carrying the response body
async fn checked(operation: &str, response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(StoreError::backend(operation, format!("HTTP {}: {}", status, body)))
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Value>> {
        let url = self.url(&[collection, key])?;
        let response = self.send("get", self.request(Method::GET, url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = checked("get", response).await?;
        let value = response
            .json()
            .await
            .map_err(|e| StoreError::backend("get", e))?;
        Ok(Some(value))
    }

    async fn put(&self, collection: &str, key: &str, value: &Value) -> StoreResult<()> {
        let url = self.url(&[collection, key])?;
        let response = self.send("put", self.request(Method::PUT, url).json(value)).await?;
        checked("put", response).await?;
        Ok(())
    }

    async fn put_if_absent(&self, collection: &str, key: &str, value: &Value) -> StoreResult<()> {
        let url = self.url(&[collection, key])?;
        let request = self
            .request(Method::PUT, url)
            .header(IF_NONE_MATCH, "\"*\"")
            .json(value);
        let response = self.send("put_if_absent", request).await?;
        if response.status() == StatusCode::PRECONDITION_FAILED {
            return Err(StoreError::conflict(collection, key));
        }
        checked("put_if_absent", response).await?;
        Ok(())
    }

    async fn purge(&self, collection: &str, key: &str) -> StoreResult<()> {
        let url = self.url(&[collection, key])?;
        let request = self
            .request(Method::DELETE, url)
            .query(&[("purge", "true")]);
        let response = self.send("purge", request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        checked("purge", response).await?;
        Ok(())
    }

    async fn list(
        &self,
        collection: &str,
        limit: usize,
        cursor: Option<&ListCursor>,
    ) -> StoreResult<Vec<Value>> {
        let url = self.url(&[collection])?;
        let mut request = self
            .request(Method::GET, url)
            .query(&[("limit", limit.to_string())]);
        request = match cursor {
            Some(ListCursor::After(key)) => request.query(&[("afterKey", key)]),
            Some(ListCursor::Start(key)) => request.query(&[("startKey", key)]),
            None => request,
        };
        self.results("list", request).await
    }

    async fn search(
        &self,
        collection: &str,
        query: &str,
        sort: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<Value>> {
        let url = self.url(&[collection])?;
        let mut request = self.request(Method::GET, url).query(&[
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ]);
        if let Some(sort) = sort {
            request = request.query(&[("sort", sort)]);
        }
        self.results("search", request).await
    }

    async fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        let url = self.url(&[collection])?;
        let request = self
            .request(Method::DELETE, url)
            .query(&[("force", "true")]);
        let response = self.send("delete_collection", request).await?;
        checked("delete_collection", response).await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let response = self
            .send("ping", self.request(Method::HEAD, self.base_url.clone()))
            .await?;
        checked("ping", response).await?;
        Ok(())
    }
}
