//! Query filter construction
//!
//! Filters are plain JSON objects in the remote store's query language.
//! Application code builds them through [`Filter`] so that tenant scoping
//! and the regex matcher have one well-tested spelling.

use serde_json::{json, Map, Value};

/// Field name that partitions every collection by cooperative.
pub const TENANT_KEY: &str = "coopId";

/// A query filter: field name -> literal value or matcher object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Empty filter (match-all).
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Exact-match condition on a field.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Case-insensitive regex condition on a text field.
    pub fn regex_ci(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.0.insert(
            field.into(),
            json!({ "$regex": pattern.into(), "$options": "i" }),
        );
        self
    }

    /// Scope this filter to a single tenant.
    ///
    /// The tenant key is inserted last so a caller-supplied `coopId` value
    /// can never widen or redirect the scope.
    pub fn scoped(mut self, coop_id: &str) -> Self {
        self.0.insert(TENANT_KEY.to_string(), json!(coop_id));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The wire representation sent to the remote store.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Filter> for Value {
    fn from(filter: Filter) -> Value {
        filter.into_value()
    }
}

/// Scope an arbitrary filter value to a tenant.
///
/// Accepts non-object values defensively (they are replaced by an empty
/// object) so a malformed caller filter degrades to "everything in this
/// tenant" rather than escaping the tenant.
pub fn scope_to_tenant(coop_id: &str, filter: Value) -> Value {
    let mut map = match filter {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    map.insert(TENANT_KEY.to_string(), json!(coop_id));
    Value::Object(map)
}

/// Options for fetch operations: projection, sort, and paging.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Field -> 0|1 inclusion map
    pub projection: Option<Value>,
    /// Field -> 1|-1 order map
    pub sort: Option<Value>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl FetchOptions {
    /// Limit-only options, the common case.
    pub fn limit(limit: i64) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Paging options for a 1-based page number.
    pub fn page(page: i64, per_page: i64) -> Self {
        Self {
            limit: Some(per_page),
            skip: Some((page - 1).max(0) * per_page),
            ..Default::default()
        }
    }

    pub fn with_sort(mut self, sort: Value) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_equality_and_regex() {
        let filter = Filter::new()
            .eq("status", "active")
            .regex_ci("firstName", "somchai")
            .into_value();

        assert_eq!(filter["status"], json!("active"));
        assert_eq!(
            filter["firstName"],
            json!({ "$regex": "somchai", "$options": "i" })
        );
    }

    #[test]
    fn tenant_key_wins_over_caller_filter() {
        // A caller filter that tries to smuggle in another tenant must lose.
        let filter = Filter::new().eq(TENANT_KEY, "coop-b").scoped("coop-a");
        assert_eq!(filter.into_value()[TENANT_KEY], json!("coop-a"));

        let raw = json!({ "coopId": "coop-b", "status": "active" });
        let scoped = scope_to_tenant("coop-a", raw);
        assert_eq!(scoped[TENANT_KEY], json!("coop-a"));
        assert_eq!(scoped["status"], json!("active"));
    }

    #[test]
    fn scoping_a_non_object_filter_degrades_to_tenant_only() {
        let scoped = scope_to_tenant("coop-a", json!("not a filter"));
        assert_eq!(scoped, json!({ "coopId": "coop-a" }));
    }

    #[test]
    fn page_options_compute_skip() {
        let opts = FetchOptions::page(3, 20);
        assert_eq!(opts.limit, Some(20));
        assert_eq!(opts.skip, Some(40));
    }
}
