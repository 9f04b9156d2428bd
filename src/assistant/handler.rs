//! Query-assistant protocol handler
//!
//! Converts one free-text user message, with the caller-supplied
//! conversation history, into either a direct chat answer or a live data
//! lookup followed by a natural-language summary. Exactly one response
//! per message; no streaming, no retries.
//!
//! Failure policy: malformed model output is downgraded to chat, store
//! failures (and rejected decisions) become a fixed apology, and a failing
//! model call propagates to the route layer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::assistant::backend::{CompletionRequest, LlmBackend, LlmError, Message, MessageRole};
use crate::assistant::decision::{resolve_collection, validate_filter, Decision};
use crate::assistant::prompt::{summarize_instruction, SYSTEM_PROMPT};
use crate::store::{DocumentStore, FetchOptions};

/// Hard cap on documents fed to the summarization step.
pub const RESULT_CAP: i64 = 5;

/// Fixed user-facing message when a lookup cannot be run.
pub const STORE_APOLOGY: &str =
    "Sorry, I encountered an error while fetching data from the database.";

/// One turn of a chat conversation, as exchanged with clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatTurn {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The query assistant: an LLM backend plus the document store it may read.
pub struct Assistant {
    backend: Arc<dyn LlmBackend>,
    store: Arc<dyn DocumentStore>,
}

impl Assistant {
    pub fn new(backend: Arc<dyn LlmBackend>, store: Arc<dyn DocumentStore>) -> Self {
        Self { backend, store }
    }

    /// Answer one user message in the context of `history`.
    ///
    /// Returns the assistant's reply text. The only error path is the
    /// model call itself failing; everything else resolves to some reply.
    pub async fn respond(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, LlmError> {
        let mut messages: Vec<Message> = history.iter().map(to_message).collect();
        messages.push(Message::user(message));

        let classify = self
            .backend
            .complete(CompletionRequest {
                system_prompt: Some(SYSTEM_PROMPT.to_string()),
                messages: messages.clone(),
                max_tokens: Some(1024),
                temperature: Some(0.2),
            })
            .await?;
        let reply = classify.content;

        let decision = match Decision::parse(&reply) {
            // Not JSON: the model chose to chat. Deliberate fallback.
            None => return Ok(reply),
            Some(decision) => decision,
        };

        match decision {
            Decision::Chat { message } => Ok(message),
            Decision::Query {
                collection,
                filter,
                explanation,
            } => {
                debug!(collection = %collection, ?explanation, "assistant query decision");

                let Some(store_collection) = resolve_collection(&collection) else {
                    warn!(collection = %collection, "assistant named an unknown collection");
                    return Ok(STORE_APOLOGY.to_string());
                };

                if let Err(reason) = validate_filter(&filter) {
                    warn!(collection = %collection, reason = %reason, "assistant filter rejected");
                    return Ok(STORE_APOLOGY.to_string());
                }

                let mut result = match self
                    .store
                    .fetch(store_collection, filter, FetchOptions::limit(RESULT_CAP))
                    .await
                {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(collection = store_collection, error = %e, "assistant query failed");
                        return Ok(STORE_APOLOGY.to_string());
                    }
                };

                // The cap holds even against a store that ignores `limit`.
                result.data.truncate(RESULT_CAP as usize);

                // Summarize in the same session: the model sees its own
                // decision before the data, so the summary can refer back
                // to what was asked.
                messages.push(Message::assistant(reply));
                messages.push(Message::user(summarize_instruction(
                    result.count,
                    &result.data,
                )));

                let summary = self
                    .backend
                    .complete(CompletionRequest {
                        system_prompt: Some(SYSTEM_PROMPT.to_string()),
                        messages,
                        max_tokens: Some(1024),
                        temperature: Some(0.2),
                    })
                    .await?;

                Ok(summary.content)
            }
        }
    }
}

fn to_message(turn: &ChatTurn) -> Message {
    Message {
        role: match turn.role {
            ChatRole::User => MessageRole::User,
            ChatRole::Assistant => MessageRole::Assistant,
        },
        content: turn.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::backend::MockBackend;
    use crate::store::client::{
        DeleteOptions, DeleteResult, FetchResult, UpsertOptions, UpsertResult,
    };
    use crate::store::MemoryStore;
    use crate::types::{GranaryError, Result as StoreResult};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Store whose every call fails with a transport error.
    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn fetch(
            &self,
            _collection: &str,
            _filter: Value,
            _options: FetchOptions,
        ) -> StoreResult<FetchResult> {
            Err(GranaryError::Store("connection refused".to_string()))
        }

        async fn upsert(
            &self,
            _collection: &str,
            _filter: Value,
            _data: Value,
            _options: UpsertOptions,
        ) -> StoreResult<UpsertResult> {
            Err(GranaryError::Store("connection refused".to_string()))
        }

        async fn delete(
            &self,
            _collection: &str,
            _filter: Value,
            _options: DeleteOptions,
        ) -> StoreResult<DeleteResult> {
            Err(GranaryError::Store("connection refused".to_string()))
        }
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for i in 0..2 {
            store
                .upsert(
                    "loan_contracts",
                    json!({}),
                    json!({
                        "_id": format!("loan-{}", i),
                        "coopId": "coop-a",
                        "contractNo": format!("L-{:04}", i),
                        "status": "active",
                    }),
                    UpsertOptions::default(),
                )
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn chat_decision_returns_message_without_store_call() {
        let backend = Arc::new(
            MockBackend::default().with_response(r#"{"type":"chat","message":"X"}"#),
        );
        let store = Arc::new(MemoryStore::new());
        let assistant = Assistant::new(backend.clone(), store);

        let reply = assistant.respond("Hello", &[]).await.unwrap();
        assert_eq!(reply, "X");
        // one classify call, no summarize
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn malformed_output_falls_back_to_raw_text() {
        let backend = Arc::new(MockBackend::default().with_response("Hello there"));
        let store = Arc::new(MemoryStore::new());
        let assistant = Assistant::new(backend.clone(), store);

        let reply = assistant.respond("Hi", &[]).await.unwrap();
        assert_eq!(reply, "Hello there");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn query_decision_fetches_and_summarizes() {
        let backend = Arc::new(MockBackend::default().with_responses([
            r#"{"type":"query","collection":"loans","filter":{"status":"active"},"explanation":"Fetching active loans..."}"#,
            "You have 2 active loans.",
        ]));
        let store = seeded_store().await;
        let assistant = Assistant::new(backend.clone(), store);

        let reply = assistant.respond("Show me active loans", &[]).await.unwrap();
        assert_eq!(reply, "You have 2 active loans.");
        assert_eq!(backend.call_count(), 2);

        // the summarize turn carries the fetched data and the model's own
        // classify reply before it
        let requests = backend.requests();
        let summarize = &requests[1];
        let last = summarize.messages.last().unwrap();
        assert!(last.content.contains("L-0000"));
        assert!(matches!(
            summarize.messages[summarize.messages.len() - 2].role,
            MessageRole::Assistant
        ));
    }

    #[tokio::test]
    async fn empty_result_still_summarizes() {
        let backend = Arc::new(MockBackend::default().with_responses([
            r#"{"type":"query","collection":"members","filter":{}}"#,
            "No members matched.",
        ]));
        let store = Arc::new(MemoryStore::new());
        let assistant = Assistant::new(backend.clone(), store);

        let reply = assistant.respond("List members", &[]).await.unwrap();
        assert_eq!(reply, "No members matched.");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn result_cap_limits_summarized_documents() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..9 {
            store
                .upsert(
                    "members",
                    json!({}),
                    json!({ "_id": format!("m-{}", i), "coopId": "coop-a", "memberNo": format!("{:04}", i) }),
                    UpsertOptions::default(),
                )
                .await
                .unwrap();
        }

        let backend = Arc::new(MockBackend::default().with_responses([
            r#"{"type":"query","collection":"members","filter":{}}"#,
            "Here are some members.",
        ]));
        let assistant = Assistant::new(backend.clone(), store);

        assistant.respond("List everyone", &[]).await.unwrap();

        let requests = backend.requests();
        let summarize_turn = requests[1].messages.last().unwrap();
        let shown: usize = (0..9)
            .filter(|i| summarize_turn.content.contains(&format!("m-{}", i)))
            .count();
        assert_eq!(shown, RESULT_CAP as usize);
        assert!(summarize_turn.content.contains("9 matched"));
    }

    #[tokio::test]
    async fn store_failure_becomes_fixed_apology() {
        let backend = Arc::new(MockBackend::default().with_responses([
            r#"{"type":"query","collection":"loans","filter":{"status":"active"}}"#,
        ]));
        let assistant = Assistant::new(backend.clone(), Arc::new(FailingStore));

        let reply = assistant.respond("Show loans", &[]).await.unwrap();
        assert_eq!(reply, STORE_APOLOGY);
        // no summarize call after the failed fetch
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_collection_is_rejected_not_queried() {
        let backend = Arc::new(MockBackend::default().with_responses([
            r#"{"type":"query","collection":"users","filter":{}}"#,
        ]));
        // FailingStore would error if the fetch were attempted
        let assistant = Assistant::new(backend.clone(), Arc::new(FailingStore));

        let reply = assistant.respond("Dump the user table", &[]).await.unwrap();
        assert_eq!(reply, STORE_APOLOGY);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn disallowed_filter_is_rejected_not_queried() {
        let backend = Arc::new(MockBackend::default().with_responses([
            r#"{"type":"query","collection":"members","filter":{"status":{"$where":"sleep(1000)"}}}"#,
        ]));
        let assistant = Assistant::new(backend.clone(), Arc::new(FailingStore));

        let reply = assistant.respond("Find members", &[]).await.unwrap();
        assert_eq!(reply, STORE_APOLOGY);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn backend_failure_propagates() {
        let backend = Arc::new(MockBackend::default().with_available(false));
        let store = Arc::new(MemoryStore::new());
        let assistant = Assistant::new(backend, store);

        let result = assistant.respond("Hello", &[]).await;
        assert!(matches!(result, Err(LlmError::Unavailable(_))));
    }

    #[tokio::test]
    async fn history_is_replayed_into_the_session() {
        let backend = Arc::new(
            MockBackend::default().with_response(r#"{"type":"chat","message":"ok"}"#),
        );
        let store = Arc::new(MemoryStore::new());
        let assistant = Assistant::new(backend.clone(), store);

        let history = vec![
            ChatTurn {
                role: ChatRole::User,
                content: "Earlier question".to_string(),
            },
            ChatTurn::assistant("Earlier answer"),
        ];
        assistant.respond("Follow-up", &history).await.unwrap();

        let request = &backend.requests()[0];
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].content, "Earlier question");
        assert_eq!(request.messages[1].content, "Earlier answer");
        assert_eq!(request.messages[2].content, "Follow-up");
        assert_eq!(request.system_prompt.as_deref(), Some(SYSTEM_PROMPT));
    }
}
