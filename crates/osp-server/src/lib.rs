//! Server wiring for the OSP survey service.
//!
//! Holds the runtime configuration and assembles the HTTP application around
//! [`osp_api::api_router`]. The binary in `main.rs` only parses arguments,
//! loads configuration and binds the listener.

use std::{path::PathBuf, time::Duration};

use axum::Router;
use osp_api::{ApiSettings, AppState};
use osp_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `OSP_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  /// SQLite database file. A leading `~/` is expanded at startup.
  pub store_path:        PathBuf,
  #[serde(default = "default_db_timeout_ms")]
  pub db_timeout_ms:     u64,
  #[serde(default = "default_lookup_timeout_ms")]
  pub lookup_timeout_ms: u64,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 5050 }
fn default_db_timeout_ms() -> u64 { 5_000 }
fn default_lookup_timeout_ms() -> u64 { 2_000 }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn api_settings(&self) -> ApiSettings {
    ApiSettings {
      db_timeout:     Duration::from_millis(self.db_timeout_ms),
      lookup_timeout: Duration::from_millis(self.lookup_timeout_ms),
    }
  }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Build the full application: API routes plus request tracing.
pub fn app(store: SqliteStore, config: &ServerConfig) -> Router {
  osp_api::api_router(AppState::new(store, config.api_settings()))
    .layer(TraceLayer::new_for_http())
}
