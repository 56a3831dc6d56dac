//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The multipart body could not be read; carries its own status, e.g.
  /// 413 when the upload exceeds the body limit.
  #[error(transparent)]
  Multipart(#[from] MultipartError),

  /// Another writer claimed the same natural key first.
  #[error("{0}")]
  Conflict(String),

  /// The uploaded workbook could not be ingested as sent.
  #[error("{0}")]
  Unprocessable(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<becas_ingest::Error> for ApiError {
  fn from(err: becas_ingest::Error) -> Self {
    use becas_ingest::Error as E;
    let message = err.to_string();
    match err.root() {
      E::SheetNotFound(_) => ApiError::NotFound(message),
      E::Open { .. } | E::Read { .. } | E::Row(_) => ApiError::Unprocessable(message),
      E::Store(source) if is_conflict(source.as_ref()) => ApiError::Conflict(message),
      _ => ApiError::Store(message.into()),
    }
  }
}

fn is_conflict(err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
  matches!(
    err.downcast_ref::<becas_store_sqlite::Error>(),
    Some(becas_store_sqlite::Error::Conflict { .. })
  )
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Multipart(e) => (e.status(), e.body_text()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
