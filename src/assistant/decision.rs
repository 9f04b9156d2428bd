//! Assistant decision parsing and validation
//!
//! The model answers every user message with one of two JSON shapes:
//! a `query` decision or a `chat` reply. Parsing is deliberately lenient
//! (a model that forgets to emit JSON is still useful as chat); execution
//! is deliberately strict (only allow-listed collections and conservative
//! filter shapes ever reach the store).

use serde::Deserialize;
use serde_json::Value;

/// Classified intent for one user message.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Decision {
    Query {
        collection: String,
        /// Defaults to match-all when the model omits it
        #[serde(default = "default_filter")]
        filter: Value,
        #[serde(default)]
        explanation: Option<String>,
    },
    Chat {
        message: String,
    },
}

impl Decision {
    /// Parse a model reply into a decision.
    ///
    /// Markdown code fences are stripped first. `None` means the reply is
    /// not a decision at all — callers treat the raw text as chat.
    pub fn parse(reply: &str) -> Option<Self> {
        let cleaned = strip_code_fences(reply);
        serde_json::from_str(&cleaned).ok()
    }
}

fn default_filter() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Remove ```json ... ``` wrapping a reply, if present.
fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_string()
}

/// Collections the assistant may query, mapped to store collection names.
///
/// The prompt-facing names are what the model is taught; the store names
/// are where the documents actually live.
const QUERYABLE_COLLECTIONS: &[(&str, &str)] = &[
    ("members", "members"),
    ("deposits", "deposit_accounts"),
    ("loans", "loan_contracts"),
    ("products", "products"),
    ("cooperatives", "cooperatives"),
];

/// Operators a model-supplied filter may use.
const ALLOWED_OPERATORS: &[&str] = &[
    "$regex", "$options", "$eq", "$ne", "$gt", "$gte", "$lt", "$lte", "$in",
];

/// A model-supplied filter may not name more fields than this.
const MAX_FILTER_FIELDS: usize = 8;

/// Resolve an allow-listed collection name to its store collection.
pub fn resolve_collection(name: &str) -> Option<&'static str> {
    QUERYABLE_COLLECTIONS
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, store_name)| *store_name)
}

/// Check a model-supplied filter against the conservative shape rules:
/// an object of scalar conditions or single-level operator objects drawn
/// from the operator allow-list.
pub fn validate_filter(filter: &Value) -> Result<(), String> {
    let Some(fields) = filter.as_object() else {
        return Err("filter must be an object".to_string());
    };

    if fields.len() > MAX_FILTER_FIELDS {
        return Err(format!("filter names too many fields ({})", fields.len()));
    }

    for (field, condition) in fields {
        if field.starts_with('$') {
            return Err(format!("top-level operator '{}' is not allowed", field));
        }

        match condition {
            Value::Object(operators) => {
                for (op, arg) in operators {
                    if !ALLOWED_OPERATORS.contains(&op.as_str()) {
                        return Err(format!("operator '{}' is not allowed", op));
                    }
                    let valid = match op.as_str() {
                        "$in" => arg
                            .as_array()
                            .is_some_and(|items| items.iter().all(is_scalar)),
                        _ => is_scalar(arg),
                    };
                    if !valid {
                        return Err(format!("operator '{}' has a non-scalar argument", op));
                    }
                }
            }
            scalar if is_scalar(scalar) => {}
            _ => {
                return Err(format!("field '{}' has a non-scalar condition", field));
            }
        }
    }

    Ok(())
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_chat_decision() {
        let decision = Decision::parse(r#"{"type":"chat","message":"Hello!"}"#).unwrap();
        assert_eq!(
            decision,
            Decision::Chat {
                message: "Hello!".to_string()
            }
        );
    }

    #[test]
    fn parses_query_decision_with_fences() {
        let reply = "```json\n{\"type\":\"query\",\"collection\":\"loans\",\"filter\":{\"status\":\"active\"},\"explanation\":\"Fetching...\"}\n```";
        let decision = Decision::parse(reply).unwrap();
        match decision {
            Decision::Query {
                collection, filter, ..
            } => {
                assert_eq!(collection, "loans");
                assert_eq!(filter, json!({ "status": "active" }));
            }
            other => panic!("expected query, got {:?}", other),
        }
    }

    #[test]
    fn omitted_filter_defaults_to_match_all() {
        let decision = Decision::parse(r#"{"type":"query","collection":"members"}"#).unwrap();
        match decision {
            Decision::Query { filter, .. } => assert_eq!(filter, json!({})),
            other => panic!("expected query, got {:?}", other),
        }
    }

    #[test]
    fn non_json_reply_is_not_a_decision() {
        assert!(Decision::parse("Hello there").is_none());
        assert!(Decision::parse("").is_none());
    }

    #[test]
    fn unknown_decision_type_is_not_a_decision() {
        assert!(Decision::parse(r#"{"type":"delete","collection":"members"}"#).is_none());
    }

    #[test]
    fn resolves_only_allow_listed_collections() {
        assert_eq!(resolve_collection("members"), Some("members"));
        assert_eq!(resolve_collection("loans"), Some("loan_contracts"));
        assert_eq!(resolve_collection("deposits"), Some("deposit_accounts"));
        assert_eq!(resolve_collection("users"), None);
        assert_eq!(resolve_collection("journal_entries"), None);
    }

    #[test]
    fn accepts_scalar_and_regex_filters() {
        assert!(validate_filter(&json!({})).is_ok());
        assert!(validate_filter(&json!({ "status": "active" })).is_ok());
        assert!(validate_filter(
            &json!({ "firstName": { "$regex": "Somchai", "$options": "i" } })
        )
        .is_ok());
        assert!(validate_filter(&json!({ "balance": { "$gte": 1000 } })).is_ok());
        assert!(validate_filter(&json!({ "status": { "$in": ["active", "dormant"] } })).is_ok());
    }

    #[test]
    fn rejects_unlisted_operators_and_deep_nesting() {
        assert!(validate_filter(&json!({ "status": { "$where": "1" } })).is_err());
        assert!(validate_filter(&json!({ "$or": [{ "a": 1 }, { "b": 2 }] })).is_err());
        assert!(validate_filter(&json!({ "a": { "$eq": { "b": 1 } } })).is_err());
        assert!(validate_filter(&json!({ "a": [1, 2, 3] })).is_err());
        assert!(validate_filter(&json!("not an object")).is_err());
    }

    #[test]
    fn rejects_oversized_filters() {
        let mut filter = serde_json::Map::new();
        for i in 0..9 {
            filter.insert(format!("field{}", i), json!("x"));
        }
        assert!(validate_filter(&Value::Object(filter)).is_err());
    }
}
