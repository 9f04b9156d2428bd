//! HTTP server implementation
//!
//! hyper http1 with TokioIo for async handling. One tokio task per
//! connection; no shared mutable state between requests.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::assistant::{Assistant, LlmBackend};
use crate::config::Args;
use crate::routes;
use crate::store::DocumentStore;
use crate::types::GranaryError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// The one document store every component reads through
    pub store: Arc<dyn DocumentStore>,
    /// Query assistant over the same store
    pub assistant: Assistant,
}

impl AppState {
    pub fn new(args: Args, store: Arc<dyn DocumentStore>, backend: Arc<dyn LlmBackend>) -> Self {
        let assistant = Assistant::new(backend, Arc::clone(&store));
        Self {
            args,
            store,
            assistant,
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), GranaryError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("granary listening on {}", state.args.listen);

    if state.args.dev_mode {
        warn!("Development mode enabled");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    info!("[{}] {} {}", addr, method, path);

    // CORS preflight for browser clients
    if method == Method::OPTIONS {
        return Ok(preflight_response());
    }

    let response = match (method.clone(), path.as_str()) {
        // Liveness probe - returns 200 if granary is running
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }

        // Readiness probe - returns 200 only if the document store answers
        (Method::GET, "/ready") | (Method::GET, "/readyz") => {
            routes::readiness_check(Arc::clone(&state)).await
        }

        // Version info for deployment verification
        (Method::GET, "/version") => routes::version_info(),

        // Query assistant
        (Method::POST, "/api/v1/chat") => {
            let body = req.into_body().collect().await?.to_bytes();
            routes::handle_chat(Arc::clone(&state), body).await
        }

        // Collection data routes: /api/v1/{collection}
        _ => match parse_collection_path(&path) {
            Some(collection) => {
                let collection = collection.to_string();
                let body = if method == Method::POST {
                    req.into_body().collect().await?.to_bytes()
                } else {
                    Bytes::new()
                };
                routes::handle_data(
                    Arc::clone(&state),
                    &method,
                    &collection,
                    query.as_deref(),
                    body,
                )
                .await
            }
            None => not_found_response(&path),
        },
    };

    Ok(response)
}

/// Parse "/api/v1/{collection}" into the collection segment.
fn parse_collection_path(path: &str) -> Option<&str> {
    let collection = path.strip_prefix("/api/v1/")?;
    if collection.is_empty() || collection.contains('/') {
        return None;
    }
    Some(collection)
}

fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": format!("Not found: {}", path) }).to_string();

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}
