//! JSON and upload endpoints for the scholarship registry.
//!
//! [`api_router`] serves the list endpoints; [`upload::handler`] is mounted
//! by the caller next to its own page for `GET /upload`.

pub mod error;
pub mod lists;
pub mod upload;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use becas_core::store::RosterStore;

pub use error::ApiError;

/// Where uploads go and how they are ingested.
#[derive(Debug, Clone)]
pub struct UploadConfig {
  pub dir:   PathBuf,
  /// Worksheet read from every uploaded workbook.
  pub sheet: String,
}

/// Shared state threaded through the handlers.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub uploads: Arc<UploadConfig>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      uploads: Arc::clone(&self.uploads),
    }
  }
}

/// Build the list router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: RosterStore + 'static,
{
  Router::new()
    .route("/list/trabajadores", get(lists::workers::<S>))
    .route("/list/becarios", get(lists::recipients::<S>))
    .with_state(state)
}
