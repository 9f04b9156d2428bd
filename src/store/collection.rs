//! Tenant-scoped collection accessor
//!
//! Typed create/read/update/delete for one logical collection. Tenant
//! isolation is enforced here, at the call boundary: every filter has the
//! tenant key injected unconditionally (and last, so callers cannot
//! override it), and timestamps are stamped here, never by callers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::store::client::{DeleteOptions, DocumentStore, UpsertOptions};
use crate::store::filter::{FetchOptions, Filter};
use crate::types::{GranaryError, Result};

/// Creation/update timestamps as RFC 3339 strings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Timestamps {
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A document that lives in exactly one collection and one tenant.
pub trait TenantDocument: Serialize + DeserializeOwned + Send + Sync {
    /// Logical collection name in the remote store.
    const COLLECTION: &'static str;

    /// The owning tenant. Required, never empty.
    fn coop_id(&self) -> &str;

    /// The document's own identifier, if assigned yet.
    fn doc_id(&self) -> Option<&str>;

    /// Assign the document identifier (used when creating without one).
    fn set_doc_id(&mut self, id: String);

    /// Accessor-managed timestamps.
    fn timestamps_mut(&mut self) -> &mut Timestamps;
}

/// One page of results plus the total matched count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Documents matched by the filter, not just this page's length.
    pub count: u64,
}

/// Generate a new document identifier, optionally prefixed by kind.
pub fn generate_id(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    if prefix.is_empty() {
        id
    } else {
        format!("{}_{}", prefix, id)
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Typed accessor for one collection over a document store.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: TenantDocument> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        T::COLLECTION
    }

    /// Create (or overwrite, keyed by id and tenant) a document.
    ///
    /// Stamps `updatedAt` always and `createdAt` when the document does not
    /// already carry one, so re-creating an existing document advances
    /// `updatedAt` without rewriting its creation time. Assigns an id when
    /// the document has none, so the upsert key is always fully specified.
    pub async fn create(&self, mut doc: T) -> Result<T> {
        if doc.coop_id().is_empty() {
            return Err(GranaryError::BadRequest(format!(
                "{}: document has no tenant id",
                T::COLLECTION
            )));
        }

        if doc.doc_id().is_none() {
            doc.set_doc_id(generate_id(""));
        }

        let now = now_rfc3339();
        let timestamps = doc.timestamps_mut();
        if timestamps.created_at.is_none() {
            timestamps.created_at = Some(now.clone());
        }
        timestamps.updated_at = Some(now);

        let key = Filter::new()
            .eq("_id", doc.doc_id().unwrap_or_default())
            .scoped(doc.coop_id());

        self.store
            .upsert(
                T::COLLECTION,
                key.into_value(),
                serde_json::to_value(&doc)?,
                UpsertOptions::default(),
            )
            .await?;

        Ok(doc)
    }

    /// Find at most one document in the tenant. Absence is `Ok(None)`.
    pub async fn find_one(&self, coop_id: &str, filter: Filter) -> Result<Option<T>> {
        let result = self
            .store
            .fetch(
                T::COLLECTION,
                filter.scoped(coop_id).into_value(),
                FetchOptions::limit(1),
            )
            .await?;

        Ok(result.data.into_iter().next().and_then(decode::<T>))
    }

    /// Find documents in the tenant, with paging passed through.
    pub async fn find(
        &self,
        coop_id: &str,
        filter: Filter,
        options: FetchOptions,
    ) -> Result<Page<T>> {
        let result = self
            .store
            .fetch(T::COLLECTION, filter.scoped(coop_id).into_value(), options)
            .await?;

        let data = result.data.into_iter().filter_map(decode::<T>).collect();

        Ok(Page {
            data,
            count: result.count,
        })
    }

    /// Apply a partial update to the first matching document in the tenant.
    ///
    /// Stamps `updatedAt` into the patch. Returns whether a document was
    /// modified; a patch that matches nothing is not an error.
    pub async fn update(&self, coop_id: &str, filter: Filter, mut patch: Value) -> Result<bool> {
        let Some(fields) = patch.as_object_mut() else {
            return Err(GranaryError::BadRequest(format!(
                "{}: update patch must be an object",
                T::COLLECTION
            )));
        };
        fields.insert("updatedAt".to_string(), Value::String(now_rfc3339()));

        let result = self
            .store
            .upsert(
                T::COLLECTION,
                filter.scoped(coop_id).into_value(),
                patch,
                UpsertOptions {
                    upsert: false,
                    replace_one: false,
                },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    /// Delete at most one matching document in the tenant.
    pub async fn delete(&self, coop_id: &str, filter: Filter) -> Result<bool> {
        let result = self
            .store
            .delete(
                T::COLLECTION,
                filter.scoped(coop_id).into_value(),
                DeleteOptions::default(),
            )
            .await?;

        Ok(result.deleted_count > 0)
    }

    /// Delete every matching document in the tenant.
    pub async fn delete_many(&self, coop_id: &str, filter: Filter) -> Result<u64> {
        let result = self
            .store
            .delete(
                T::COLLECTION,
                filter.scoped(coop_id).into_value(),
                DeleteOptions { delete_many: true },
            )
            .await?;

        Ok(result.deleted_count)
    }
}

/// Decode a stored document, quarantining anything that fails validation.
fn decode<T: TenantDocument>(doc: Value) -> Option<T> {
    match serde_json::from_value(doc) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(collection = T::COLLECTION, error = %e, "skipping undecodable document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::filter::TENANT_KEY;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Clone, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    struct TestDoc {
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        coop_id: String,
        name: String,
        #[serde(default)]
        status: String,
        #[serde(flatten)]
        timestamps: Timestamps,
    }

    impl TenantDocument for TestDoc {
        const COLLECTION: &'static str = "test_docs";

        fn coop_id(&self) -> &str {
            &self.coop_id
        }

        fn doc_id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        fn set_doc_id(&mut self, id: String) {
            self.id = Some(id);
        }

        fn timestamps_mut(&mut self) -> &mut Timestamps {
            &mut self.timestamps
        }
    }

    fn doc(coop: &str, name: &str) -> TestDoc {
        TestDoc {
            id: None,
            coop_id: coop.to_string(),
            name: name.to_string(),
            status: "active".to_string(),
            timestamps: Timestamps::default(),
        }
    }

    fn collection() -> (Arc<MemoryStore>, Collection<TestDoc>) {
        let store = Arc::new(MemoryStore::new());
        let collection = Collection::new(store.clone() as Arc<dyn DocumentStore>);
        (store, collection)
    }

    #[tokio::test]
    async fn create_assigns_id_and_stamps_timestamps() {
        let (_, docs) = collection();
        let created = docs.create(doc("coop-a", "Somchai")).await.unwrap();

        assert!(created.id.is_some());
        assert!(created.timestamps.created_at.is_some());
        assert_eq!(created.timestamps.created_at, created.timestamps.updated_at);
    }

    #[tokio::test]
    async fn create_twice_is_idempotent_by_id() {
        let (store, docs) = collection();
        let first = docs.create(doc("coop-a", "Somchai")).await.unwrap();
        let second = docs.create(first.clone()).await.unwrap();

        // one logical document; createdAt stable, updatedAt advancing
        assert_eq!(store.len("test_docs").await, 1);
        assert_eq!(second.timestamps.created_at, first.timestamps.created_at);
        assert!(second.timestamps.updated_at >= first.timestamps.updated_at);
    }

    #[tokio::test]
    async fn tenant_isolation_holds_for_any_filter() {
        let (_, docs) = collection();
        docs.create(doc("coop-a", "Somchai")).await.unwrap();
        docs.create(doc("coop-b", "Pranee")).await.unwrap();

        let page = docs.find("coop-b", Filter::new(), FetchOptions::default()).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].name, "Pranee");

        // even a hostile filter naming tenant A cannot cross over
        let hostile = Filter::new().eq(TENANT_KEY, "coop-a");
        let page = docs.find("coop-b", hostile, FetchOptions::default()).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].name, "Pranee");

        let found = docs
            .find_one("coop-b", Filter::new().eq("name", "Somchai"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_one_absence_is_none_not_error() {
        let (_, docs) = collection();
        let found = docs
            .find_one("coop-a", Filter::new().eq("name", "nobody"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn update_stamps_updated_at_and_reports_modification() {
        let (store, docs) = collection();
        let created = docs.create(doc("coop-a", "Somchai")).await.unwrap();

        let modified = docs
            .update(
                "coop-a",
                Filter::new().eq("_id", created.id.clone().unwrap()),
                json!({ "status": "resigned" }),
            )
            .await
            .unwrap();
        assert!(modified);

        let fetched = store
            .fetch("test_docs", json!({ "_id": created.id.unwrap() }), FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(fetched.data[0]["status"], json!("resigned"));
        assert!(fetched.data[0]["updatedAt"].is_string());

        // no match in this tenant -> false, not an error
        let modified = docs
            .update("coop-b", Filter::new().eq("status", "resigned"), json!({ "status": "x" }))
            .await
            .unwrap();
        assert!(!modified);
    }

    #[tokio::test]
    async fn delete_scopes_to_tenant() {
        let (store, docs) = collection();
        docs.create(doc("coop-a", "Somchai")).await.unwrap();
        docs.create(doc("coop-b", "Pranee")).await.unwrap();

        let removed = docs.delete_many("coop-a", Filter::new()).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len("test_docs").await, 1);
    }

    #[tokio::test]
    async fn undecodable_documents_are_quarantined_on_read() {
        let (store, docs) = collection();
        docs.create(doc("coop-a", "Somchai")).await.unwrap();
        // a document missing required fields, planted directly in the store
        store
            .upsert(
                "test_docs",
                json!({ "_id": "broken" }),
                json!({ "_id": "broken", "coopId": "coop-a" }),
                Default::default(),
            )
            .await
            .unwrap();

        let page = docs.find("coop-a", Filter::new(), FetchOptions::default()).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "Somchai");
        // count still reflects what the store matched
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn create_rejects_missing_tenant() {
        let (_, docs) = collection();
        let result = docs.create(doc("", "Somchai")).await;
        assert!(matches!(result, Err(GranaryError::BadRequest(_))));
    }
}
