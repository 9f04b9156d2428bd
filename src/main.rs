//! granary - multi-tenant backend service for cooperative management

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use granary::assistant::{LlmBackend, OpenAiBackend};
use granary::config::Args;
use granary::server::{self, AppState};
use granary::store::{DocumentStore, FetchOptions, MemoryStore, StoreClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("granary={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  granary - cooperative backend");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Store: {}", args.store_url);
    info!("Assistant model: {}", args.llm_model);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("======================================");

    // Document store: remote HTTP store, or in-memory in dev mode when the
    // remote is unreachable.
    let store: Arc<dyn DocumentStore> = {
        let client = StoreClient::new(
            args.store_url.clone(),
            Duration::from_millis(args.store_timeout_ms),
        )?;

        let probe = client
            .fetch("cooperatives", serde_json::json!({}), FetchOptions::limit(1))
            .await;

        match probe {
            Ok(_) => {
                info!("Document store reachable");
                Arc::new(client)
            }
            Err(e) if args.dev_mode => {
                warn!("Document store unreachable (dev mode, using in-memory store): {}", e);
                Arc::new(MemoryStore::new())
            }
            Err(e) => {
                // Production keeps the remote client; the store may come
                // back, and readiness probes report the outage meanwhile.
                warn!("Document store probe failed: {}", e);
                Arc::new(client)
            }
        }
    };

    let backend: Arc<dyn LlmBackend> = Arc::new(OpenAiBackend::new(
        args.llm_url.clone(),
        args.llm_model.clone(),
        args.llm_api_key.clone(),
    ));

    if !backend.is_available().await {
        warn!("LLM backend did not answer availability probe");
    }

    let state = Arc::new(AppState::new(args, store, backend));

    server::run(state).await?;

    Ok(())
}
