//! Conversion between descriptor [`Field`]s and SQLite values.
//!
//! Text columns written by older deployments may be `NULL` (the maternal
//! surname and phone are nullable); they decode as the empty string. A
//! `NULL` average decodes as `0.0`.

use becas_core::entity::{Column, Field, FieldKind};
use rusqlite::types::{Value, ValueRef};

use crate::{Error, Result};

pub fn encode_field(field: &Field) -> Value {
  match field {
    Field::Text(s) => Value::Text(s.clone()),
    Field::Real(v) => Value::Real(*v),
  }
}

pub fn encode_fields(fields: &[Field]) -> Vec<Value> {
  fields.iter().map(encode_field).collect()
}

pub fn encode_key(parts: &[String]) -> Vec<Value> {
  parts.iter().cloned().map(Value::Text).collect()
}

pub fn decode_field(column: &Column, value: ValueRef<'_>) -> Result<Field> {
  match column.kind {
    FieldKind::Text => decode_text(column, value).map(Field::Text),
    FieldKind::Real => decode_real(column, value).map(Field::Real),
  }
}

fn decode_text(column: &Column, value: ValueRef<'_>) -> Result<String> {
  match value {
    ValueRef::Null => Ok(String::new()),
    ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec()).map_err(|e| {
      Error::Decode { column: column.name, detail: e.to_string() }
    }),
    ValueRef::Integer(i) => Ok(i.to_string()),
    ValueRef::Real(v) => Ok(v.to_string()),
    ValueRef::Blob(_) => Err(Error::Decode {
      column: column.name,
      detail: "blob in text column".to_owned(),
    }),
  }
}

fn decode_real(column: &Column, value: ValueRef<'_>) -> Result<f64> {
  match value {
    ValueRef::Null => Ok(0.0),
    ValueRef::Real(v) => Ok(v),
    ValueRef::Integer(i) => Ok(i as f64),
    ValueRef::Text(bytes) => std::str::from_utf8(bytes)
      .ok()
      .and_then(|s| s.trim().parse().ok())
      .ok_or_else(|| Error::Decode {
        column: column.name,
        detail: format!("non-numeric text {:?}", String::from_utf8_lossy(bytes)),
      }),
    ValueRef::Blob(_) => Err(Error::Decode {
      column: column.name,
      detail: "blob in numeric column".to_owned(),
    }),
  }
}
