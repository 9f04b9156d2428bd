//! Chat endpoint
//!
//! `POST /api/v1/chat` takes `{message, history}` and returns one
//! assistant turn. The client owns the conversation history and resends
//! it with every request; the server keeps no session state.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::assistant::ChatTurn;
use crate::routes::{error_response, json_response};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
struct ChatRequestBody {
    message: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

/// Handle POST /api/v1/chat
pub async fn handle_chat(state: Arc<AppState>, body: Bytes) -> Response<Full<Bytes>> {
    let request: ChatRequestBody = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid chat request: {}", e),
            );
        }
    };

    match state.assistant.respond(&request.message, &request.history).await {
        Ok(content) => json_response(StatusCode::OK, &ChatTurn::assistant(content)),
        Err(e) => {
            // Model-provider failures are logged, never surfaced raw.
            error!(error = %e, "chat request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}
