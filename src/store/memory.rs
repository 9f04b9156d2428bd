//! In-memory document store
//!
//! Implements [`DocumentStore`] over process-local maps, with the subset of
//! the remote store's matcher language the application actually uses:
//! equality, `$regex` with `$options: "i"` (literal patterns only), `$in`,
//! `$ne`, and numeric comparisons. Used by tests and by `--dev-mode` runs
//! where no remote store is reachable.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::client::{
    DeleteOptions, DeleteResult, DocumentStore, FetchResult, UpsertOptions, UpsertResult,
};
use crate::store::filter::FetchOptions;
use crate::types::Result;

/// Process-local document store.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

fn matches(doc: &Value, filter: &Value) -> bool {
    let Some(conditions) = filter.as_object() else {
        return true;
    };

    conditions
        .iter()
        .all(|(field, cond)| field_matches(doc.get(field), cond))
}

fn field_matches(actual: Option<&Value>, cond: &Value) -> bool {
    match cond {
        Value::Object(ops) if ops.keys().any(|k| k.starts_with('$')) => {
            operators_match(actual, ops)
        }
        literal => actual == Some(literal),
    }
}

fn operators_match(actual: Option<&Value>, ops: &Map<String, Value>) -> bool {
    ops.iter().all(|(op, arg)| match op.as_str() {
        "$regex" => {
            let (Some(Value::String(text)), Some(pattern)) = (actual, arg.as_str()) else {
                return false;
            };
            // Literal patterns only; "i" is the one option the app uses.
            let insensitive = ops
                .get("$options")
                .and_then(Value::as_str)
                .is_some_and(|o| o.contains('i'));
            if insensitive {
                text.to_lowercase().contains(&pattern.to_lowercase())
            } else {
                text.contains(pattern)
            }
        }
        "$options" => true,
        "$eq" => actual == Some(arg),
        "$ne" => actual != Some(arg),
        "$in" => arg
            .as_array()
            .is_some_and(|allowed| actual.is_some_and(|a| allowed.contains(a))),
        "$gt" => compare(actual, arg).is_some_and(|ord| ord.is_gt()),
        "$gte" => compare(actual, arg).is_some_and(|ord| ord.is_ge()),
        "$lt" => compare(actual, arg).is_some_and(|ord| ord.is_lt()),
        "$lte" => compare(actual, arg).is_some_and(|ord| ord.is_le()),
        _ => false,
    })
}

fn compare(actual: Option<&Value>, arg: &Value) -> Option<std::cmp::Ordering> {
    match (actual?, arg) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn sort_docs(docs: &mut [Value], sort: &Value) {
    let Some(keys) = sort.as_object() else {
        return;
    };

    docs.sort_by(|a, b| {
        for (field, direction) in keys {
            let ord = compare(a.get(field), b.get(field).unwrap_or(&Value::Null))
                .unwrap_or(std::cmp::Ordering::Equal);
            let ord = if direction.as_i64() == Some(-1) {
                ord.reverse()
            } else {
                ord
            };
            if !ord.is_eq() {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
}

/// Merge `data` fields into `target`, preserving fields `data` omits.
fn merge_into(target: &mut Value, data: &Value) -> bool {
    let (Some(target), Some(data)) = (target.as_object_mut(), data.as_object()) else {
        return false;
    };

    let mut changed = false;
    for (key, value) in data {
        if target.get(key) != Some(value) {
            target.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch(
        &self,
        collection: &str,
        filter: Value,
        options: FetchOptions,
    ) -> Result<FetchResult> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Value> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default();

        // projection is not applied; in-memory readers take whole documents
        if let Some(sort) = &options.sort {
            sort_docs(&mut matched, sort);
        }

        // count is the matched total, not the page size
        let count = matched.len() as u64;

        let skip = options.skip.unwrap_or(0).max(0) as usize;
        let mut data: Vec<Value> = matched.into_iter().skip(skip).collect();
        if let Some(limit) = options.limit {
            data.truncate(limit.max(0) as usize);
        }

        Ok(FetchResult {
            status: "success".to_string(),
            code: 200,
            count,
            data,
        })
    }

    async fn upsert(
        &self,
        collection: &str,
        filter: Value,
        data: Value,
        options: UpsertOptions,
    ) -> Result<UpsertResult> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let mut matched_count = 0u64;
        let mut modified_count = 0u64;

        // Update semantics touch at most one document, like the remote store.
        if let Some(doc) = docs.iter_mut().find(|d| matches(d, &filter)) {
            matched_count = 1;
            let changed = if options.replace_one {
                let replaced = *doc != data;
                *doc = data.clone();
                replaced
            } else {
                merge_into(doc, &data)
            };
            if changed {
                modified_count = 1;
            }
        }

        if matched_count > 0 || !options.upsert {
            return Ok(UpsertResult {
                status: "success".to_string(),
                code: 200,
                matched_count,
                modified_count,
                upserted_id: None,
            });
        }

        // No match: insert, assigning an _id when the document lacks one.
        let mut inserted = data;
        let id = inserted
            .get("_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                let id = Uuid::new_v4().to_string();
                if let Some(obj) = inserted.as_object_mut() {
                    obj.insert("_id".to_string(), Value::String(id.clone()));
                }
                id
            });
        docs.push(inserted);

        Ok(UpsertResult {
            status: "success".to_string(),
            code: 200,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete(
        &self,
        collection: &str,
        filter: Value,
        options: DeleteOptions,
    ) -> Result<DeleteResult> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let mut deleted_count = 0u64;
        docs.retain(|doc| {
            if !matches(doc, &filter) {
                return true;
            }
            if !options.delete_many && deleted_count >= 1 {
                return true;
            }
            deleted_count += 1;
            false
        });

        Ok(DeleteResult {
            status: "success".to_string(),
            code: 200,
            deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn fetch_filters_by_equality_and_regex() {
        let store = MemoryStore::new();
        store
            .upsert(
                "members",
                json!({}),
                json!({ "_id": "m1", "firstName": "Somchai", "status": "active" }),
                UpsertOptions::default(),
            )
            .await
            .unwrap();
        store
            .upsert(
                "members",
                json!({}),
                json!({ "_id": "m2", "firstName": "Pranee", "status": "resigned" }),
                UpsertOptions::default(),
            )
            .await
            .unwrap();

        let result = store
            .fetch(
                "members",
                json!({ "firstName": { "$regex": "somchai", "$options": "i" } }),
                FetchOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.data[0]["_id"], json!("m1"));

        let result = store
            .fetch("members", json!({ "status": "resigned" }), FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.data[0]["_id"], json!("m2"));
    }

    #[tokio::test]
    async fn fetch_count_reflects_matches_beyond_the_page() {
        let store = MemoryStore::new();
        for i in 0..8 {
            store
                .upsert(
                    "loans",
                    json!({}),
                    json!({ "_id": format!("l{}", i), "status": "active" }),
                    UpsertOptions::default(),
                )
                .await
                .unwrap();
        }

        let result = store
            .fetch("loans", json!({ "status": "active" }), FetchOptions::limit(5))
            .await
            .unwrap();
        assert_eq!(result.count, 8);
        assert_eq!(result.data.len(), 5);

        let result = store
            .fetch(
                "loans",
                json!({}),
                FetchOptions {
                    skip: Some(6),
                    limit: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(result.data.len(), 2);
    }

    #[tokio::test]
    async fn upsert_merges_and_preserves_omitted_fields() {
        let store = MemoryStore::new();
        store
            .upsert(
                "products",
                json!({ "_id": "p1" }),
                json!({ "_id": "p1", "name": "Fertilizer", "createdAt": "2026-01-01T00:00:00Z" }),
                UpsertOptions::default(),
            )
            .await
            .unwrap();

        let result = store
            .upsert(
                "products",
                json!({ "_id": "p1" }),
                json!({ "_id": "p1", "name": "Fertilizer 15-15-15" }),
                UpsertOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.modified_count, 1);
        assert_eq!(store.len("products").await, 1);

        let fetched = store
            .fetch("products", json!({ "_id": "p1" }), FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(fetched.data[0]["name"], json!("Fertilizer 15-15-15"));
        assert_eq!(fetched.data[0]["createdAt"], json!("2026-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn non_upsert_update_does_not_insert() {
        let store = MemoryStore::new();
        let result = store
            .upsert(
                "members",
                json!({ "_id": "missing" }),
                json!({ "status": "active" }),
                UpsertOptions {
                    upsert: false,
                    replace_one: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(result.matched_count, 0);
        assert_eq!(store.len("members").await, 0);
    }

    #[tokio::test]
    async fn delete_one_removes_at_most_one() {
        let store = MemoryStore::new();
        for i in 0..3 {
            store
                .upsert(
                    "sales",
                    json!({}),
                    json!({ "_id": format!("s{}", i), "status": "pending" }),
                    UpsertOptions::default(),
                )
                .await
                .unwrap();
        }

        let result = store
            .delete("sales", json!({ "status": "pending" }), DeleteOptions::default())
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 1);
        assert_eq!(store.len("sales").await, 2);

        let result = store
            .delete(
                "sales",
                json!({ "status": "pending" }),
                DeleteOptions { delete_many: true },
            )
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 2);
        assert_eq!(store.len("sales").await, 0);
    }

    #[tokio::test]
    async fn sort_orders_by_direction() {
        let store = MemoryStore::new();
        for (id, balance) in [("a", 50), ("b", 150), ("c", 100)] {
            store
                .upsert(
                    "deposit_accounts",
                    json!({}),
                    json!({ "_id": id, "balance": balance }),
                    UpsertOptions::default(),
                )
                .await
                .unwrap();
        }

        let result = store
            .fetch(
                "deposit_accounts",
                json!({}),
                FetchOptions::default().with_sort(json!({ "balance": -1 })),
            )
            .await
            .unwrap();
        let ids: Vec<_> = result.data.iter().map(|d| d["_id"].clone()).collect();
        assert_eq!(ids, vec![json!("b"), json!("c"), json!("a")]);
    }
}
