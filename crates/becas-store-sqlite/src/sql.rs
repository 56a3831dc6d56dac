//! Statements generated from the entity descriptor, and the synchronous
//! operations that run them.
//!
//! Everything here takes a plain [`rusqlite::Connection`]; [`crate::SqliteStore`]
//! moves the calls onto the connection thread.

use becas_core::{
  entity::{Entity, NaturalKey},
  reconcile::{Decision, decide},
};
use rusqlite::{
  Connection, OptionalExtension as _, Row, TransactionBehavior, ffi, params_from_iter,
};

use crate::{
  Error, Result,
  encode::{decode_field, encode_field, encode_fields, encode_key},
};

// ─── Statement text ──────────────────────────────────────────────────────────

fn column_list<E: Entity>() -> String {
  E::COLUMNS.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
}

fn is_key<E: Entity>(column: &str) -> bool { E::KEY_COLUMNS.contains(&column) }

/// `k1 = ?{n+1} AND k2 = ?{n+2} ...`
fn key_predicate<E: Entity>(first_param: usize) -> String {
  E::KEY_COLUMNS
    .iter()
    .enumerate()
    .map(|(i, c)| format!("{c} = ?{}", first_param + i))
    .collect::<Vec<_>>()
    .join(" AND ")
}

pub fn select_by_key_sql<E: Entity>() -> String {
  format!(
    "SELECT {} FROM {} WHERE {}",
    column_list::<E>(),
    E::TABLE,
    key_predicate::<E>(1)
  )
}

pub fn insert_sql<E: Entity>() -> String {
  let placeholders = (1..=E::COLUMNS.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO {} ({}) VALUES ({placeholders})",
    E::TABLE,
    column_list::<E>()
  )
}

/// Sets every non-key column; key values bind after them.
pub fn update_sql<E: Entity>() -> String {
  let assignments: Vec<String> = E::COLUMNS
    .iter()
    .filter(|c| !is_key::<E>(c.name))
    .enumerate()
    .map(|(i, c)| format!("{} = ?{}", c.name, i + 1))
    .collect();
  format!(
    "UPDATE {} SET {} WHERE {}",
    E::TABLE,
    assignments.join(", "),
    key_predicate::<E>(assignments.len() + 1)
  )
}

// ─── Row decoding ────────────────────────────────────────────────────────────

fn decode_row<E: Entity>(row: &Row<'_>) -> Result<E> {
  let fields = E::COLUMNS
    .iter()
    .enumerate()
    .map(|(i, column)| decode_field(column, row.get_ref(i)?))
    .collect::<Result<Vec<_>>>()?;
  Ok(E::from_fields(fields)?)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
  )
}

// ─── Operations ──────────────────────────────────────────────────────────────

pub fn exists<E: Entity>(conn: &Connection, key: &NaturalKey) -> Result<bool> {
  let sql = format!("SELECT 1 FROM {} WHERE {} LIMIT 1", E::TABLE, key_predicate::<E>(1));
  let found = conn
    .query_row(&sql, params_from_iter(encode_key(key.parts())), |_| Ok(()))
    .optional()?;
  Ok(found.is_some())
}

pub fn row_id<E: Entity>(conn: &Connection, key: &NaturalKey) -> Result<Option<i64>> {
  let sql = format!("SELECT id FROM {} WHERE {}", E::TABLE, key_predicate::<E>(1));
  Ok(
    conn
      .query_row(&sql, params_from_iter(encode_key(key.parts())), |r| r.get(0))
      .optional()?,
  )
}

pub fn select<E: Entity>(conn: &Connection, key: &NaturalKey) -> Result<Option<E>> {
  let mut stmt = conn.prepare(&select_by_key_sql::<E>())?;
  let mut rows = stmt.query(params_from_iter(encode_key(key.parts())))?;
  match rows.next()? {
    Some(row) => decode_row(row).map(Some),
    None => Ok(None),
  }
}

/// Every row of `E`'s table, oldest first.
pub fn select_all<E: Entity>(conn: &Connection) -> Result<Vec<E>> {
  let sql = format!("SELECT {} FROM {} ORDER BY id", column_list::<E>(), E::TABLE);
  let mut stmt = conn.prepare(&sql)?;
  let mut rows = stmt.query([])?;
  let mut out = Vec::new();
  while let Some(row) = rows.next()? {
    out.push(decode_row(row)?);
  }
  Ok(out)
}

pub fn insert<E: Entity>(conn: &Connection, entity: &E) -> Result<()> {
  if let (Some(parent), Some(parent_key)) = (E::PARENT, entity.parent_key()) {
    let sql = format!(
      "SELECT 1 FROM {} WHERE {} = ?1 LIMIT 1",
      parent.table, parent.column
    );
    let found = conn
      .query_row(&sql, [&parent_key], |_| Ok(()))
      .optional()?
      .is_some();
    if !found {
      return Err(Error::MissingParent {
        kind: E::KIND,
        key: entity.key(),
        parent_table: parent.table,
        parent_key,
      });
    }
  }

  conn
    .execute(&insert_sql::<E>(), params_from_iter(encode_fields(&entity.fields())))
    .map_err(|e| {
      if is_unique_violation(&e) {
        Error::Conflict { kind: E::KIND, key: entity.key() }
      } else {
        Error::Sqlite(e)
      }
    })?;
  Ok(())
}

pub fn update<E: Entity>(conn: &Connection, entity: &E) -> Result<()> {
  let key = entity.key();
  let mut values: Vec<_> = E::COLUMNS
    .iter()
    .zip(entity.fields().iter())
    .filter(|(c, _)| !is_key::<E>(c.name))
    .map(|(_, f)| encode_field(f))
    .collect();
  values.extend(encode_key(key.parts()));

  let changed = conn.execute(&update_sql::<E>(), params_from_iter(values))?;
  if changed == 0 {
    return Err(Error::NotFound { kind: E::KIND, key });
  }
  Ok(())
}

/// Look up, decide and write inside one immediate transaction, so no other
/// writer can slip in between the lookup and the write.
pub fn upsert<E: Entity>(conn: &mut Connection, entity: &E) -> Result<Decision> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let existing = select::<E>(&tx, &entity.key())?;
  let decision = decide(existing.as_ref(), entity);
  match decision {
    Decision::Insert => insert(&tx, entity)?,
    Decision::Update => update(&tx, entity)?,
    Decision::Unchanged => {}
  }

  tx.commit()?;
  Ok(decision)
}
