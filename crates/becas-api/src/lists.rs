//! Handlers for the `/list/*` endpoints.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `GET`  | `/list/trabajadores` | `[[full_name, curp, email, phone], ...]` |
//! | `GET`  | `/list/becarios` | `[[full_name, curp, worker_curp], ...]` |

use axum::{Json, extract::State};
use becas_core::store::RosterStore;

use crate::{ApiState, error::ApiError};

/// `GET /list/trabajadores`
pub async fn workers<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<[String; 4]>>, ApiError>
where
  S: RosterStore,
{
  let workers = state
    .store
    .list_workers()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::debug!(count = workers.len(), "listing workers");
  Ok(Json(workers.into_iter().map(|w| w.into_row()).collect()))
}

/// `GET /list/becarios`
pub async fn recipients<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<[String; 3]>>, ApiError>
where
  S: RosterStore,
{
  let recipients = state
    .store
    .list_recipients()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::debug!(count = recipients.len(), "listing recipients");
  Ok(Json(recipients.into_iter().map(|r| r.into_row()).collect()))
}
