//! granary - multi-tenant backend service for cooperative management
//!
//! Granary fronts a remote document store for cooperative (savings /
//! credit / agricultural) organizations: member registry, share capital,
//! deposits, loans, and inventory, partitioned per cooperative, plus a
//! natural-language query assistant that turns user questions into
//! database lookups.
//!
//! ## Layers
//!
//! - **store**: the remote document store client, tenant-scoped
//!   collection accessors, and an in-memory store for tests/dev
//! - **domain**: typed records for every collection
//! - **assistant**: LLM-backed query assistant (classify, query, summarize)
//! - **routes**/**server**: the HTTP surface

pub mod assistant;
pub mod config;
pub mod domain;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{GranaryError, Result};
