//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`] and
//! [`RosterStore`].

use std::path::Path;

use becas_core::{
  Recipient, Worker,
  entity::{Entity, NaturalKey},
  reconcile::Outcome,
  record::{RecipientListing, WorkerListing},
  store::{RecordStore, RosterStore},
  text::normalize,
};

use crate::{Error, Result, schema::SCHEMA, sql};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A registry store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and ensure the schema exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| Ok(conn.execute_batch(SCHEMA).map_err(Error::Schema)))
      .await??;
    tracing::debug!("schema ready");
    Ok(())
  }

  /// Number of rows in `E`'s table.
  pub async fn count<E: Entity>(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", E::TABLE), [], |r| {
          r.get(0)
        })?)
      })
      .await?;
    Ok(n as usize)
  }

  /// Surrogate id of the row stored under `key`, if any.
  pub async fn row_id<E: Entity>(&self, key: NaturalKey) -> Result<Option<i64>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(sql::row_id::<E>(conn, &key)))
        .await??,
    )
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn create_schema(&self) -> Result<()> { self.init_schema().await }

  async fn exists<E: Entity>(&self, key: NaturalKey) -> Result<bool> {
    self
      .conn
      .call(move |conn| Ok(sql::exists::<E>(conn, &key)))
      .await?
  }

  async fn get<E: Entity>(&self, key: NaturalKey) -> Result<E> {
    let lookup = key.clone();
    self
      .conn
      .call(move |conn| Ok(sql::select::<E>(conn, &lookup)))
      .await??
      .ok_or(Error::NotFound { kind: E::KIND, key })
  }

  async fn insert<E: Entity>(&self, entity: E) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(sql::insert(conn, &entity)))
      .await?
  }

  async fn update<E: Entity>(&self, entity: E) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(sql::update(conn, &entity)))
      .await?
  }

  async fn upsert<E: Entity>(&self, entity: E) -> Result<Outcome> {
    let outcome_of = entity.clone();
    let decision = self
      .conn
      .call(move |conn| Ok(sql::upsert(conn, &entity)))
      .await??;
    Ok(Outcome::of(&outcome_of, decision))
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  async fn list_workers(&self) -> Result<Vec<WorkerListing>> {
    let workers = self
      .conn
      .call(|conn| Ok(sql::select_all::<Worker>(conn)))
      .await??;

    Ok(
      workers
        .into_iter()
        .filter_map(|w| {
          let full_name = w.full_name();
          (!full_name.trim().is_empty()).then(|| WorkerListing {
            full_name,
            curp: w.curp,
            email: w.email,
            phone: w.phone,
          })
        })
        .collect(),
    )
  }

  async fn list_recipients(&self) -> Result<Vec<RecipientListing>> {
    let recipients = self
      .conn
      .call(|conn| Ok(sql::select_all::<Recipient>(conn)))
      .await??;

    Ok(
      recipients
        .into_iter()
        .map(|r| RecipientListing {
          full_name:   r.full_name(),
          curp:        r.curp,
          worker_curp: r.worker_curp,
        })
        .collect(),
    )
  }

  async fn find_workers_by_name(&self, full_name: String) -> Result<Vec<Worker>> {
    let wanted = normalize(&full_name);
    let workers = self
      .conn
      .call(|conn| Ok(sql::select_all::<Worker>(conn)))
      .await??;

    Ok(
      workers
        .into_iter()
        .filter(|w| normalize(&w.full_name()) == wanted)
        .collect(),
    )
  }
}
