//! The ingest driver: map each row, then reconcile worker, recipient and
//! yearly record in that order.
//!
//! A run stops at the first failing row. Rows before it stay committed;
//! rows after it are never read.

use std::path::{Path, PathBuf};

use becas_core::{
  entity::Entity,
  reconcile::{Decision, Outcome, Tally},
  row::{MappedRow, Scholarship, map_row},
  store::RecordStore,
};
use chrono::Datelike as _;
use serde::Serialize;
use tracing::{debug, info};

use crate::{Error, Result, spreadsheet};

/// Parameters of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
  /// Worksheet to read.
  pub sheet: String,
  /// Year stamped on every yearly record of the run.
  pub year:  i32,
}

impl IngestOptions {
  /// Read `sheet` and stamp records with the current calendar year.
  pub fn current(sheet: impl Into<String>) -> Self {
    Self {
      sheet: sheet.into(),
      year:  chrono::Local::now().year(),
    }
  }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
  pub rows_read:      usize,
  pub rows_skipped:   usize,
  pub workers:        Tally,
  pub recipients:     Tally,
  pub yearly_records: Tally,
}

/// Ingest `options.sheet` of the workbook at `path` into `store`.
pub async fn ingest<S>(
  store: &S,
  path: impl AsRef<Path>,
  options: &IngestOptions,
) -> Result<IngestReport>
where
  S: RecordStore,
{
  let path: PathBuf = path.as_ref().to_path_buf();
  let sheet = options.sheet.clone();
  info!(path = %path.display(), sheet = %sheet, year = options.year, "ingesting spreadsheet");

  let rows =
    tokio::task::spawn_blocking(move || spreadsheet::read_sheet(&path, &sheet)).await??;

  ingest_rows(store, rows, options.year).await
}

/// Ingest rows that have already been read.
///
/// Row numbers in errors count from 1, matching the sheet.
pub async fn ingest_rows<S>(
  store: &S,
  rows: Vec<Vec<String>>,
  year: i32,
) -> Result<IngestReport>
where
  S: RecordStore,
{
  let mut report = IngestReport::default();

  for (index, cells) in rows.into_iter().enumerate() {
    report.rows_read += 1;
    ingest_row(store, &cells, year, &mut report)
      .await
      .map_err(|source| Error::AtRow { row: index + 1, source: Box::new(source) })?;
  }

  info!(
    rows = report.rows_read,
    skipped = report.rows_skipped,
    workers_written = report.workers.written(),
    recipients_written = report.recipients.written(),
    records_written = report.yearly_records.written(),
    "spreadsheet ingested"
  );
  Ok(report)
}

async fn ingest_row<S>(
  store: &S,
  cells: &[String],
  year: i32,
  report: &mut IngestReport,
) -> Result<()>
where
  S: RecordStore,
{
  let (worker, scholarship) = match map_row(cells, year)? {
    MappedRow::Skip(reason) => {
      debug!(?reason, "skipping row");
      report.rows_skipped += 1;
      return Ok(());
    }
    MappedRow::Record { worker, scholarship } => (worker, scholarship),
  };

  // Parents before children, so no insert references a missing row.
  report.workers.record(reconcile(store, worker).await?);

  if let Some(Scholarship { recipient, record }) = scholarship {
    report.recipients.record(reconcile(store, recipient).await?);
    report.yearly_records.record(reconcile(store, record).await?);
  }
  Ok(())
}

async fn reconcile<S, E>(store: &S, entity: E) -> Result<Decision>
where
  S: RecordStore,
  E: Entity,
{
  let outcome = store
    .upsert(entity)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  log_outcome(&outcome);
  Ok(outcome.decision)
}

fn log_outcome(outcome: &Outcome) {
  let Outcome { kind, key, decision } = outcome;
  match decision {
    Decision::Insert => info!(%key, "{kind} inserted"),
    Decision::Update => info!(%key, "{kind} updated"),
    Decision::Unchanged => debug!(%key, "{kind} unchanged"),
  }
}
