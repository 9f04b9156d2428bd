//! Remote document store client
//!
//! The store is a remote HTTP service exposing three POST endpoints over
//! document collections: get, update (upsert), and delete. This module is
//! the only place that knows those URLs and verbs; everything else reaches
//! the store through the [`DocumentStore`] trait.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::store::filter::FetchOptions;
use crate::types::{GranaryError, Result};

/// Options for upsert operations.
#[derive(Debug, Clone)]
pub struct UpsertOptions {
    /// Insert when no document matches the filter.
    pub upsert: bool,
    /// Replace the whole document instead of merging fields.
    pub replace_one: bool,
}

impl Default for UpsertOptions {
    fn default() -> Self {
        Self {
            upsert: true,
            replace_one: false,
        }
    }
}

/// Options for delete operations.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Delete every matching document instead of at most one.
    pub delete_many: bool,
}

/// Result of a fetch: matched count plus the (possibly paged) documents.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchResult {
    pub status: String,
    pub code: i64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Result of an upsert.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertResult {
    pub status: String,
    pub code: i64,
    #[serde(default)]
    pub matched_count: u64,
    #[serde(default)]
    pub modified_count: u64,
    #[serde(default)]
    pub upserted_id: Option<String>,
}

/// Result of a delete.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResult {
    pub status: String,
    pub code: i64,
    #[serde(default)]
    pub deleted_count: u64,
}

/// The three operations every document store must provide.
///
/// Implemented by [`StoreClient`] for the remote HTTP store and by
/// [`MemoryStore`](crate::store::MemoryStore) for tests and dev mode.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Query documents matching `filter`, with optional paging controls.
    async fn fetch(
        &self,
        collection: &str,
        filter: Value,
        options: FetchOptions,
    ) -> Result<FetchResult>;

    /// Insert or update documents matching `filter`.
    async fn upsert(
        &self,
        collection: &str,
        filter: Value,
        data: Value,
        options: UpsertOptions,
    ) -> Result<UpsertResult>;

    /// Delete document(s) matching `filter`.
    async fn delete(
        &self,
        collection: &str,
        filter: Value,
        options: DeleteOptions,
    ) -> Result<DeleteResult>;
}

#[derive(Serialize)]
struct GetBody<'a> {
    collection: &'a str,
    filter: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip: Option<i64>,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    collection: &'a str,
    filter: Value,
    data: Value,
    upsert: bool,
    replaceone: bool,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    collection: &'a str,
    filter: Value,
    delete_many: bool,
}

/// HTTP client for the remote document store.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    base_url: String,
}

impl StoreClient {
    /// Create a new store client against a base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| GranaryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(self.endpoint(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| GranaryError::Store(format!("{} request failed: {}", endpoint, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(GranaryError::Store(format!(
                "{} failed: {}",
                endpoint,
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GranaryError::Store(format!("{} response decode failed: {}", endpoint, e)))
    }
}

#[async_trait]
impl DocumentStore for StoreClient {
    async fn fetch(
        &self,
        collection: &str,
        filter: Value,
        options: FetchOptions,
    ) -> Result<FetchResult> {
        debug!(collection, "store fetch");

        self.post(
            "mongoatlasget",
            &GetBody {
                collection,
                filter,
                projection: options.projection,
                sort: options.sort,
                limit: options.limit,
                skip: options.skip,
            },
        )
        .await
    }

    async fn upsert(
        &self,
        collection: &str,
        filter: Value,
        data: Value,
        options: UpsertOptions,
    ) -> Result<UpsertResult> {
        debug!(collection, upsert = options.upsert, "store upsert");

        self.post(
            "mongoatlasupdate",
            &UpdateBody {
                collection,
                filter,
                data,
                upsert: options.upsert,
                replaceone: options.replace_one,
            },
        )
        .await
    }

    async fn delete(
        &self,
        collection: &str,
        filter: Value,
        options: DeleteOptions,
    ) -> Result<DeleteResult> {
        debug!(collection, delete_many = options.delete_many, "store delete");

        self.post(
            "mongoatlasdelete",
            &DeleteBody {
                collection,
                filter,
                delete_many: options.delete_many,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = StoreClient::new("http://localhost:9000/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint("mongoatlasget"), "http://localhost:9000/v1/mongoatlasget");
    }

    #[test]
    fn get_body_omits_unset_options() {
        let body = GetBody {
            collection: "members",
            filter: json!({}),
            projection: None,
            sort: None,
            limit: Some(5),
            skip: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["limit"], json!(5));
        assert!(value.get("skip").is_none());
        assert!(value.get("sort").is_none());
    }

    #[test]
    fn update_body_defaults_match_wire_contract() {
        let opts = UpsertOptions::default();
        assert!(opts.upsert);
        assert!(!opts.replace_one);
    }
}
