//! Handler for `POST /upload`.
//!
//! Accepts a `multipart/form-data` body whose `excel-file` field carries a
//! workbook. The file is kept in the upload directory under a dated name
//! and then ingested with the configured sheet.

use std::path::{Path, PathBuf};

use axum::{
  Json,
  extract::{Multipart, State},
};
use becas_core::store::RecordStore;
use becas_ingest::{IngestOptions, IngestReport};
use chrono::Datelike as _;
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Name of the multipart field holding the workbook.
pub const UPLOAD_FIELD: &str = "excel-file";

const KNOWN_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  /// Where the upload was stored on the server.
  pub stored_as: String,
  pub report:    IngestReport,
}

/// `POST /upload`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError>
where
  S: RecordStore,
{
  let mut stored = None;

  while let Some(field) = multipart.next_field().await? {
    if field.name() != Some(UPLOAD_FIELD) {
      continue;
    }
    let original = field.file_name().unwrap_or_default().to_owned();
    let data = field.bytes().await?;
    tracing::info!(file = %original, size = data.len(), "workbook uploaded");

    stored = Some(store_upload(&state.uploads.dir, &original, &data).await?);
    break;
  }

  let path = stored.ok_or_else(|| {
    ApiError::BadRequest(format!("missing multipart field {UPLOAD_FIELD:?}"))
  })?;

  let options = IngestOptions::current(state.uploads.sheet.clone());
  let report = becas_ingest::ingest(state.store.as_ref(), &path, &options)
    .await
    .inspect_err(|e| tracing::error!(path = %path.display(), "ingestion failed: {e}"))?;

  Ok(Json(UploadResponse {
    stored_as: path.display().to_string(),
    report,
  }))
}

/// Write `data` to `dir` as `<year>-<month>-<day>-<uuid>.<ext>`.
async fn store_upload(dir: &Path, original: &str, data: &[u8]) -> Result<PathBuf, ApiError> {
  tokio::fs::create_dir_all(dir).await?;

  let now = chrono::Local::now();
  let path = dir.join(format!(
    "{}-{}-{}-{}.{}",
    now.year(),
    now.month(),
    now.day(),
    Uuid::new_v4().simple(),
    extension_of(original)
  ));
  tokio::fs::write(&path, data).await?;
  tracing::debug!(path = %path.display(), "upload stored");
  Ok(path)
}

/// The spreadsheet extension of `file_name`, defaulting to `xlsx`.
fn extension_of(file_name: &str) -> &'static str {
  let ext = Path::new(file_name)
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase)
    .unwrap_or_default();
  KNOWN_EXTENSIONS
    .iter()
    .copied()
    .find(|known| *known == ext)
    .unwrap_or("xlsx")
}
