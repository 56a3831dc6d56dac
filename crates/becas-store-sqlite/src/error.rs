//! Error type for `becas-store-sqlite`.

use becas_core::entity::NaturalKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] becas_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("schema creation failed: {0}")]
  Schema(#[source] rusqlite::Error),

  #[error("{kind} {key} not found")]
  NotFound {
    kind: &'static str,
    key:  NaturalKey,
  },

  /// The natural key is already taken.
  #[error("{kind} {key} already exists")]
  Conflict {
    kind: &'static str,
    key:  NaturalKey,
  },

  /// Insert of a child row whose parent is not stored.
  #[error("{kind} {key} references missing {parent_table} row {parent_key}")]
  MissingParent {
    kind:         &'static str,
    key:          NaturalKey,
    parent_table: &'static str,
    parent_key:   String,
  },

  #[error("column {column} holds an unexpected value: {detail}")]
  Decode {
    column: &'static str,
    detail: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
