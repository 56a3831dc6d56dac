//! The entity descriptor shared by every table.
//!
//! Each persisted type describes its table, its column layout, its natural
//! key and (optionally) the parent it references. Storage backends build
//! their statements from this description, and reconciliation compares
//! values through [`Entity::matches`], so the insert / update / no-op path
//! exists once for all three tables.

use std::fmt;

use serde::Serialize;

use crate::{Error, Result, text::same_text};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Real,
}

/// A single column value, in column order.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
  Text(String),
  Real(f64),
}

impl Field {
  pub fn kind(&self) -> FieldKind {
    match self {
      Field::Text(_) => FieldKind::Text,
      Field::Real(_) => FieldKind::Real,
    }
  }

  /// Text compares normalised; numbers compare exactly.
  pub fn same_as(&self, other: &Field) -> bool {
    match (self, other) {
      (Field::Text(a), Field::Text(b)) => same_text(a, b),
      (Field::Real(a), Field::Real(b)) => a == b,
      _ => false,
    }
  }
}

/// A named column of an entity table.
#[derive(Debug, Clone, Copy)]
pub struct Column {
  pub name: &'static str,
  pub kind: FieldKind,
}

impl Column {
  pub const fn text(name: &'static str) -> Self {
    Self { name, kind: FieldKind::Text }
  }

  pub const fn real(name: &'static str) -> Self {
    Self { name, kind: FieldKind::Real }
  }
}

/// The table and key column a child row points at.
#[derive(Debug, Clone, Copy)]
pub struct Reference {
  pub table:  &'static str,
  pub column: &'static str,
}

// ─── Natural key ─────────────────────────────────────────────────────────────

/// The ordered values of an entity's natural key columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NaturalKey(pub Vec<String>);

impl NaturalKey {
  pub fn single(value: impl Into<String>) -> Self { Self(vec![value.into()]) }

  pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
    Self(vec![first.into(), second.into()])
  }

  pub fn parts(&self) -> &[String] { &self.0 }
}

impl fmt::Display for NaturalKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0.join("/"))
  }
}

// ─── Descriptor ──────────────────────────────────────────────────────────────

/// Describes how an entity is stored, keyed and compared.
///
/// `fields` and `from_fields` use the order of [`Entity::COLUMNS`]. Every
/// name in [`Entity::KEY_COLUMNS`] must also appear in `COLUMNS` as a text
/// column, and `key` must return the values of those columns in the same
/// order.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
  /// Human-readable label used in logs and errors.
  const KIND: &'static str;
  const TABLE: &'static str;
  const COLUMNS: &'static [Column];
  const KEY_COLUMNS: &'static [&'static str];
  /// The row this entity must not be inserted without.
  const PARENT: Option<Reference> = None;

  fn fields(&self) -> Vec<Field>;

  fn from_fields(fields: Vec<Field>) -> Result<Self>;

  fn key(&self) -> NaturalKey;

  /// Key value of the referenced parent row, when [`Entity::PARENT`] is set.
  fn parent_key(&self) -> Option<String> { None }

  /// `true` if every column of `self` equals the same column of `other`.
  fn matches(&self, other: &Self) -> bool {
    let ours = self.fields();
    let theirs = other.fields();
    ours.len() == theirs.len()
      && ours.iter().zip(theirs.iter()).all(|(a, b)| a.same_as(b))
  }
}

/// Pulls typed values out of a `Vec<Field>` in column order.
pub struct FieldReader<E: Entity> {
  fields: std::vec::IntoIter<Field>,
  index:  usize,
  _kind:  std::marker::PhantomData<E>,
}

impl<E: Entity> FieldReader<E> {
  pub fn new(fields: Vec<Field>) -> Self {
    Self {
      fields: fields.into_iter(),
      index:  0,
      _kind:  std::marker::PhantomData,
    }
  }

  fn column(&self) -> &'static str {
    E::COLUMNS.get(self.index).map(|c| c.name).unwrap_or("?")
  }

  fn next(&mut self) -> Result<Field> {
    let column = self.column();
    let field = self.fields.next().ok_or(Error::MissingField {
      kind: E::KIND,
      column,
    })?;
    self.index += 1;
    Ok(field)
  }

  pub fn text(&mut self) -> Result<String> {
    let column = self.column();
    match self.next()? {
      Field::Text(s) => Ok(s),
      Field::Real(_) => Err(Error::FieldType { kind: E::KIND, column }),
    }
  }

  pub fn real(&mut self) -> Result<f64> {
    let column = self.column();
    match self.next()? {
      Field::Real(v) => Ok(v),
      Field::Text(_) => Err(Error::FieldType { kind: E::KIND, column }),
    }
  }
}
