//! The `RecordStore` and `RosterStore` traits.
//!
//! Implemented by storage backends (e.g. `becas-store-sqlite`). The ingest
//! driver and the HTTP layer depend on these traits, not on a concrete
//! backend.

use std::future::Future;

use crate::{
  entity::{Entity, NaturalKey},
  reconcile::{Decision, Outcome, decide},
  record::{RecipientListing, Worker, WorkerListing},
};

// ─── Record store ────────────────────────────────────────────────────────────

/// Keyed persistence for every [`Entity`].
///
/// Every method is generic over the entity type; the entity's descriptor
/// names the table, columns and natural key. All methods return `Send`
/// futures so a store can be shared across tokio tasks.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create every table that is missing. Existing tables are left alone.
  fn create_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// `Ok(false)` when no row has `key`; `Err` only when the lookup failed.
  fn exists<E: Entity>(
    &self,
    key: NaturalKey,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Fetch the row stored under `key`; fails if there is none.
  fn get<E: Entity>(
    &self,
    key: NaturalKey,
  ) -> impl Future<Output = Result<E, Self::Error>> + Send + '_;

  /// Append a new row; fails if the natural key is taken or the referenced
  /// parent row is absent.
  fn insert<E: Entity>(
    &self,
    entity: E,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Overwrite every column of the row sharing `entity`'s natural key;
  /// fails if there is no such row.
  fn update<E: Entity>(
    &self,
    entity: E,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert, update or leave alone, depending on what is stored under the
  /// entity's key.
  ///
  /// The provided implementation composes the primitives above and is
  /// therefore open to a check-then-act race between concurrent writers.
  /// Backends with transactions should override it.
  fn upsert<E: Entity>(
    &self,
    entity: E,
  ) -> impl Future<Output = Result<Outcome, Self::Error>> + Send + '_ {
    async move {
      let key = entity.key();
      let existing = if self.exists::<E>(key.clone()).await? {
        Some(self.get::<E>(key).await?)
      } else {
        None
      };

      let decision = decide(existing.as_ref(), &entity);
      let outcome = Outcome::of(&entity, decision);
      match decision {
        Decision::Insert => self.insert(entity).await?,
        Decision::Update => self.update(entity).await?,
        Decision::Unchanged => {}
      }
      Ok(outcome)
    }
  }
}

// ─── Roster queries ──────────────────────────────────────────────────────────

/// Read-only list queries backing the browse pages.
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All workers with a non-empty name, in insertion order.
  fn list_workers(
    &self,
  ) -> impl Future<Output = Result<Vec<WorkerListing>, Self::Error>> + Send + '_;

  /// All recipients, in insertion order.
  fn list_recipients(
    &self,
  ) -> impl Future<Output = Result<Vec<RecipientListing>, Self::Error>> + Send + '_;

  /// Workers whose `"<given> <paternal> <maternal>"` equals `full_name`
  /// once both are normalised.
  fn find_workers_by_name(
    &self,
    full_name: String,
  ) -> impl Future<Output = Result<Vec<Worker>, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, sync::Mutex};

  use super::*;
  use crate::{Recipient, entity::Field};

  /// Map-backed store exercising the provided `upsert`.
  #[derive(Default)]
  struct MemoryStore {
    rows:   Mutex<HashMap<(&'static str, NaturalKey), Vec<Field>>>,
    writes: Mutex<Vec<&'static str>>,
  }

  #[derive(Debug, thiserror::Error)]
  enum MemoryError {
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Core(#[from] crate::Error),
  }

  impl RecordStore for MemoryStore {
    type Error = MemoryError;

    async fn create_schema(&self) -> Result<(), MemoryError> { Ok(()) }

    async fn exists<E: Entity>(&self, key: NaturalKey) -> Result<bool, MemoryError> {
      Ok(self.rows.lock().unwrap().contains_key(&(E::TABLE, key)))
    }

    async fn get<E: Entity>(&self, key: NaturalKey) -> Result<E, MemoryError> {
      let fields = self
        .rows
        .lock()
        .unwrap()
        .get(&(E::TABLE, key))
        .cloned()
        .ok_or(MemoryError::NotFound)?;
      Ok(E::from_fields(fields)?)
    }

    async fn insert<E: Entity>(&self, entity: E) -> Result<(), MemoryError> {
      let mut rows = self.rows.lock().unwrap();
      let key = (E::TABLE, entity.key());
      if rows.contains_key(&key) {
        return Err(MemoryError::Conflict);
      }
      rows.insert(key, entity.fields());
      self.writes.lock().unwrap().push("insert");
      Ok(())
    }

    async fn update<E: Entity>(&self, entity: E) -> Result<(), MemoryError> {
      let mut rows = self.rows.lock().unwrap();
      let slot = rows
        .get_mut(&(E::TABLE, entity.key()))
        .ok_or(MemoryError::NotFound)?;
      *slot = entity.fields();
      self.writes.lock().unwrap().push("update");
      Ok(())
    }
  }

  fn recipient(sex: &str) -> Recipient {
    Recipient {
      worker_curp:   "AAAA010101HDFXXX01".into(),
      paternal_name: "Díaz".into(),
      maternal_name: "Mora".into(),
      given_names:   "Elena".into(),
      curp:          "BBBB020202MDFXXX02".into(),
      birth_date:    "2002-02-02".into(),
      sex:           sex.into(),
    }
  }

  #[tokio::test]
  async fn provided_upsert_inserts_then_noops_then_updates() {
    let store = MemoryStore::default();

    let first = store.upsert(recipient("M")).await.unwrap();
    assert_eq!(first.decision, Decision::Insert);
    assert_eq!(first.kind, "recipient");
    assert_eq!(first.key, NaturalKey::single("BBBB020202MDFXXX02"));

    let again = store.upsert(recipient(" m ")).await.unwrap();
    assert_eq!(again.decision, Decision::Unchanged);

    let changed = store.upsert(recipient("H")).await.unwrap();
    assert_eq!(changed.decision, Decision::Update);

    let stored: Recipient = store
      .get(NaturalKey::single("BBBB020202MDFXXX02"))
      .await
      .unwrap();
    assert_eq!(stored.sex, "H");
    assert_eq!(*store.writes.lock().unwrap(), vec!["insert", "update"]);
  }

  #[tokio::test]
  async fn provided_upsert_propagates_store_errors() {
    struct Broken;

    impl RecordStore for Broken {
      type Error = MemoryError;

      async fn create_schema(&self) -> Result<(), MemoryError> { Ok(()) }
      async fn exists<E: Entity>(&self, _: NaturalKey) -> Result<bool, MemoryError> {
        Err(MemoryError::NotFound)
      }
      async fn get<E: Entity>(&self, _: NaturalKey) -> Result<E, MemoryError> {
        Err(MemoryError::NotFound)
      }
      async fn insert<E: Entity>(&self, _: E) -> Result<(), MemoryError> {
        unreachable!("insert after a failed lookup")
      }
      async fn update<E: Entity>(&self, _: E) -> Result<(), MemoryError> {
        unreachable!("update after a failed lookup")
      }
    }

    let err = Broken.upsert(recipient("M")).await.unwrap_err();
    assert!(matches!(err, MemoryError::NotFound));
  }
}
