//! Error type for `becas-ingest`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot open spreadsheet {path}: {source}")]
  Open {
    path:   PathBuf,
    #[source]
    source: calamine::Error,
  },

  #[error("cannot read sheet {sheet:?}: {source}")]
  Read {
    sheet:  String,
    #[source]
    source: calamine::Error,
  },

  #[error("sheet {0:?} not found in workbook")]
  SheetNotFound(String),

  /// The row could not be mapped (e.g. a malformed average).
  #[error(transparent)]
  Row(#[from] becas_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("spreadsheet reader task failed: {0}")]
  Task(#[from] tokio::task::JoinError),

  /// Wraps whatever stopped the run with the 1-based sheet row it came from.
  #[error("row {row}: {source}")]
  AtRow {
    row:    usize,
    #[source]
    source: Box<Error>,
  },
}

impl Error {
  /// The underlying error, with any row context stripped.
  pub fn root(&self) -> &Error {
    match self {
      Error::AtRow { source, .. } => source.root(),
      other => other,
    }
  }

  /// Sheet row the run stopped at, if the failure came from a row.
  pub fn row(&self) -> Option<usize> {
    match self {
      Error::AtRow { row, .. } => Some(*row),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
