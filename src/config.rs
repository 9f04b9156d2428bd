//! Configuration for granary
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;

/// Granary - backend service for cooperative management
#[derive(Parser, Debug, Clone)]
#[command(name = "granary")]
#[command(about = "Multi-tenant backend service for cooperative management")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Base URL of the remote document store API
    #[arg(long, env = "STORE_URL", default_value = "https://smlgoapi.dedepos.com/v1")]
    pub store_url: String,

    /// Document store request timeout in milliseconds
    #[arg(long, env = "STORE_TIMEOUT_MS", default_value = "30000")]
    pub store_timeout_ms: u64,

    /// Base URL of the OpenAI-compatible LLM API
    #[arg(long, env = "LLM_URL", default_value = "https://api.openai.com/v1")]
    pub llm_url: String,

    /// Model name for the query assistant
    #[arg(long, env = "LLM_MODEL", default_value = "gpt-4o-mini")]
    pub llm_model: String,

    /// API key for the LLM provider (required unless dev mode)
    #[arg(long, env = "LLM_API_KEY")]
    pub llm_api_key: Option<String>,

    /// Enable development mode (in-memory store, mock-friendly defaults)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode && self.llm_api_key.is_none() {
            return Err("LLM_API_KEY is required in production mode".to_string());
        }

        if self.store_url.is_empty() {
            return Err("STORE_URL must not be empty".to_string());
        }

        Ok(())
    }
}
