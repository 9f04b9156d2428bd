//! Health check endpoints
//!
//! - /health, /healthz - liveness probe (is the service running?)
//! - /ready, /readyz - readiness probe (can it reach the document store?)
//! - /version - build information for deployment verification

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::json_response;
use crate::server::AppState;
use crate::store::{DocumentStore, FetchOptions};

#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall health status (true if service is running)
    pub healthy: bool,
    /// 'online' or 'degraded' for dashboards
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
    /// Current timestamp
    pub timestamp: String,
    /// Operating mode
    pub mode: &'static str,
    /// Document store reachability
    pub store: StoreHealth,
}

#[derive(Serialize)]
pub struct StoreHealth {
    /// Whether the store answered the readiness probe
    pub reachable: bool,
}

fn build_health_response(state: &AppState, store_reachable: bool) -> HealthResponse {
    HealthResponse {
        healthy: true,
        status: if store_reachable || state.args.dev_mode {
            "online"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        store: StoreHealth {
            reachable: store_reachable,
        },
    }
}

/// Handle liveness probe (/health, /healthz)
///
/// Returns 200 OK whenever the service is running; store status is
/// informational here.
pub fn health_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    // Liveness does not touch the store; report the optimistic view.
    let response = build_health_response(&state, true);
    json_response(StatusCode::OK, &response)
}

/// Handle readiness probe (/ready, /readyz)
///
/// Probes the document store with a single-document fetch. In dev mode the
/// store is optional and readiness always passes.
pub async fn readiness_check(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let reachable = state
        .store
        .fetch("cooperatives", serde_json::json!({}), FetchOptions::limit(1))
        .await
        .is_ok();

    let response = build_health_response(&state, reachable);
    let status = if reachable || state.args.dev_mode {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    json_response(status, &response)
}

/// Version information for deployment verification
#[derive(Serialize)]
pub struct VersionResponse {
    /// Cargo package version
    pub version: &'static str,
    /// Git commit hash (short)
    pub commit: &'static str,
    /// Build timestamp
    pub build_time: &'static str,
    /// Service name
    pub service: &'static str,
}

/// Handle version endpoint (/version)
pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "granary",
    };

    json_response(StatusCode::OK, &response)
}
