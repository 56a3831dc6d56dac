//! Web front end for the scholarship registry.
//!
//! Serves the static pages, the JSON lists from [`becas_api`] and the
//! upload endpoint, all backed by one store handle.

pub mod pages;

use std::path::{Path, PathBuf};

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use becas_api::{ApiState, api_router, upload};
use becas_core::store::{RecordStore, RosterStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, read from `config.toml` and `BECAS_*` variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Sheet read from uploaded workbooks.
  pub default_sheet:    String,
  pub upload_dir:       PathBuf,
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "0.0.0.0".into(),
      port:             8080,
      store_path:       PathBuf::from("scholarships.db"),
      default_sheet:    "APROVECHAMIENTO".into(),
      upload_dir:       PathBuf::from("uploads"),
      max_upload_bytes: 512 << 20,
    }
  }
}

impl ServerConfig {
  /// Layer the optional file at `path` and the environment over the defaults.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("BECAS").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: ApiState<S>, max_upload_bytes: usize) -> Router
where
  S: RecordStore + RosterStore + 'static,
{
  Router::new()
    .route("/", get(pages::index))
    .route("/list", get(pages::list))
    .route("/script.js", get(pages::script))
    .route("/upload", get(pages::upload).post(upload::handler::<S>))
    .layer(DefaultBodyLimit::max(max_upload_bytes))
    .with_state(state.clone())
    .merge(api_router(state))
    .layer(TraceLayer::new_for_http())
}
