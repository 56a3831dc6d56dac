//! Integration tests for `SqliteStore` against an in-memory database.

use becas_core::{
  Recipient, Worker, YearlyRecord,
  entity::NaturalKey,
  reconcile::Decision,
  store::{RecordStore, RosterStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn worker(curp: &str) -> Worker {
  Worker {
    section:       "22".into(),
    paternal_name: "Martínez".into(),
    maternal_name: "Vásquez".into(),
    given_names:   "Rosa".into(),
    curp:          curp.into(),
    position_code: "M02001".into(),
    location:      "Hospital Civil".into(),
    phone:         "9510000000".into(),
    email:         "rosa@example.com".into(),
  }
}

fn recipient(worker_curp: &str, curp: &str) -> Recipient {
  Recipient {
    worker_curp:   worker_curp.into(),
    paternal_name: "Gómez".into(),
    maternal_name: "Martínez".into(),
    given_names:   "Iván".into(),
    curp:          curp.into(),
    birth_date:    "2010-03-04".into(),
    sex:           "H".into(),
  }
}

fn record(curp: &str, year: &str, average: f64) -> YearlyRecord {
  YearlyRecord {
    recipient_curp: curp.into(),
    year:           year.into(),
    prior_grant:    "NO".into(),
    grade:          "1 PRIMARIA".into(),
    average,
  }
}

const W: &str = "AAAA010101HDFXXX01";
const R: &str = "BBBB020202MDFXXX02";

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_schema_is_idempotent() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();

  s.create_schema().await.unwrap();
  s.create_schema().await.unwrap();

  assert_eq!(s.count::<Worker>().await.unwrap(), 1);
}

// ─── Exists / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn exists_distinguishes_absent_from_present() {
  let s = store().await;
  assert!(!s.exists::<Worker>(NaturalKey::single(W)).await.unwrap());

  s.insert(worker(W)).await.unwrap();
  assert!(s.exists::<Worker>(NaturalKey::single(W)).await.unwrap());
}

#[tokio::test]
async fn exists_uses_both_parts_of_a_pair_key() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();
  s.insert(recipient(W, R)).await.unwrap();
  s.insert(record(R, "2025", 8.0)).await.unwrap();

  assert!(s.exists::<YearlyRecord>(NaturalKey::pair(R, "2025")).await.unwrap());
  assert!(!s.exists::<YearlyRecord>(NaturalKey::pair(R, "2026")).await.unwrap());
}

#[tokio::test]
async fn get_returns_stored_values() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();

  let fetched: Worker = s.get(NaturalKey::single(W)).await.unwrap();
  assert_eq!(fetched, worker(W));
}

#[tokio::test]
async fn get_missing_is_not_found() {
  let s = store().await;
  let err = s.get::<Recipient>(NaturalKey::single(R)).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: "recipient", .. }));
}

// ─── Insert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_duplicate_key_is_conflict() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();

  let mut again = worker(W);
  again.phone = "111".into();
  let err = s.insert(again).await.unwrap_err();
  assert!(matches!(err, Error::Conflict { kind: "worker", .. }));
  assert_eq!(s.count::<Worker>().await.unwrap(), 1);
}

#[tokio::test]
async fn insert_duplicate_yearly_record_is_conflict() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();
  s.insert(recipient(W, R)).await.unwrap();
  s.insert(record(R, "2026", 9.0)).await.unwrap();

  let err = s.insert(record(R, "2026", 7.0)).await.unwrap_err();
  assert!(matches!(err, Error::Conflict { .. }));

  // A different year is a different key.
  s.insert(record(R, "2027", 7.0)).await.unwrap();
  assert_eq!(s.count::<YearlyRecord>().await.unwrap(), 2);
}

#[tokio::test]
async fn recipient_without_worker_is_rejected() {
  let s = store().await;
  let err = s.insert(recipient(W, R)).await.unwrap_err();
  match err {
    Error::MissingParent { parent_table, parent_key, .. } => {
      assert_eq!(parent_table, "trabajadores");
      assert_eq!(parent_key, W);
    }
    other => panic!("unexpected error {other:?}"),
  }
  assert_eq!(s.count::<Recipient>().await.unwrap(), 0);
}

#[tokio::test]
async fn yearly_record_without_recipient_is_rejected() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();
  let err = s.insert(record(R, "2026", 9.0)).await.unwrap_err();
  assert!(matches!(err, Error::MissingParent { parent_table: "becarios", .. }));
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_in_place() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();
  let id = s.row_id::<Worker>(NaturalKey::single(W)).await.unwrap();

  let mut changed = worker(W);
  changed.phone = "9519999999".into();
  changed.location = "Clínica Norte".into();
  s.update(changed.clone()).await.unwrap();

  let fetched: Worker = s.get(NaturalKey::single(W)).await.unwrap();
  assert_eq!(fetched, changed);
  assert_eq!(s.row_id::<Worker>(NaturalKey::single(W)).await.unwrap(), id);
  assert_eq!(s.count::<Worker>().await.unwrap(), 1);
}

#[tokio::test]
async fn update_missing_is_not_found() {
  let s = store().await;
  let err = s.update(worker(W)).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: "worker", .. }));
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_inserts_updates_and_skips() {
  let s = store().await;

  let first = s.upsert(worker(W)).await.unwrap();
  assert_eq!(first.decision, Decision::Insert);
  let id = s.row_id::<Worker>(NaturalKey::single(W)).await.unwrap();
  assert!(id.is_some());

  let mut shouty = worker(W);
  shouty.email = " ROSA@EXAMPLE.COM".into();
  let same = s.upsert(shouty).await.unwrap();
  assert_eq!(same.decision, Decision::Unchanged);

  // The stored text is not rewritten by a no-op.
  let fetched: Worker = s.get(NaturalKey::single(W)).await.unwrap();
  assert_eq!(fetched.email, "rosa@example.com");

  let mut new_phone = worker(W);
  new_phone.phone = "9515550000".into();
  let updated = s.upsert(new_phone).await.unwrap();
  assert_eq!(updated.decision, Decision::Update);

  let fetched: Worker = s.get(NaturalKey::single(W)).await.unwrap();
  assert_eq!(fetched.phone, "9515550000");
  assert_eq!(s.row_id::<Worker>(NaturalKey::single(W)).await.unwrap(), id);
  assert_eq!(s.count::<Worker>().await.unwrap(), 1);
}

#[tokio::test]
async fn upsert_yearly_record_compares_average_exactly() {
  let s = store().await;
  s.upsert(worker(W)).await.unwrap();
  s.upsert(recipient(W, R)).await.unwrap();

  assert_eq!(s.upsert(record(R, "2026", 8.5)).await.unwrap().decision, Decision::Insert);
  assert_eq!(s.upsert(record(R, "2026", 8.5)).await.unwrap().decision, Decision::Unchanged);
  assert_eq!(s.upsert(record(R, "2026", 8.6)).await.unwrap().decision, Decision::Update);

  let fetched: YearlyRecord = s.get(NaturalKey::pair(R, "2026")).await.unwrap();
  assert_eq!(fetched.average, 8.6);
  assert_eq!(s.count::<YearlyRecord>().await.unwrap(), 1);
}

#[tokio::test]
async fn failed_upsert_leaves_no_row() {
  let s = store().await;
  let err = s.upsert(recipient(W, R)).await.unwrap_err();
  assert!(matches!(err, Error::MissingParent { .. }));
  assert_eq!(s.count::<Recipient>().await.unwrap(), 0);
}

#[tokio::test]
async fn upsert_against_file_store_persists() {
  let path = std::env::temp_dir().join(format!(
    "becas-store-{}-{}.db",
    std::process::id(),
    line!()
  ));
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.upsert(worker(W)).await.unwrap();
  }

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert!(reopened.exists::<Worker>(NaturalKey::single(W)).await.unwrap());
  assert_eq!(
    reopened.upsert(worker(W)).await.unwrap().decision,
    Decision::Unchanged
  );

  drop(reopened);
  let _ = std::fs::remove_file(&path);
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_workers_projects_name_curp_email_phone() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();

  let mut nameless = worker("CCCC030303HDFXXX03");
  nameless.given_names.clear();
  nameless.paternal_name.clear();
  nameless.maternal_name.clear();
  s.insert(nameless).await.unwrap();

  let list = s.list_workers().await.unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(
    list[0].clone().into_row(),
    [
      "Rosa Martínez Vásquez".to_string(),
      W.to_string(),
      "rosa@example.com".to_string(),
      "9510000000".to_string(),
    ]
  );
}

#[tokio::test]
async fn list_recipients_projects_name_curp_sponsor() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();
  s.insert(recipient(W, R)).await.unwrap();

  let list = s.list_recipients().await.unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0].full_name, "Iván Gómez Martínez");
  assert_eq!(list[0].curp, R);
  assert_eq!(list[0].worker_curp, W);
}

#[tokio::test]
async fn find_workers_by_name_is_case_insensitive() {
  let s = store().await;
  s.insert(worker(W)).await.unwrap();
  s.insert(worker("CCCC030303HDFXXX03")).await.unwrap();

  let found = s
    .find_workers_by_name("  rosa MARTÍNEZ vásquez ".into())
    .await
    .unwrap();
  assert_eq!(found.len(), 2);

  let none = s.find_workers_by_name("Rosa Martínez".into()).await.unwrap();
  assert!(none.is_empty());
}
