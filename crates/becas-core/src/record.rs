//! The three persisted entities and their list projections.
//!
//! Table and column names are shared with databases created by earlier
//! deployments and must not change.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  entity::{Column, Entity, Field, FieldReader, NaturalKey, Reference},
};

// ─── Worker ──────────────────────────────────────────────────────────────────

/// A sponsoring staff member (`trabajadores`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
  pub section:       String,
  pub paternal_name: String,
  pub maternal_name: String,
  pub given_names:   String,
  pub curp:          String,
  pub position_code: String,
  pub location:      String,
  /// Empty when the sheet has no phone.
  pub phone:         String,
  pub email:         String,
}

impl Worker {
  pub fn full_name(&self) -> String {
    full_name(&self.given_names, &self.paternal_name, &self.maternal_name)
  }
}

impl Entity for Worker {
  const KIND: &'static str = "worker";
  const TABLE: &'static str = "trabajadores";
  const COLUMNS: &'static [Column] = &[
    Column::text("seccion"),
    Column::text("apellido_paterno"),
    Column::text("apellido_materno"),
    Column::text("nombres"),
    Column::text("curp"),
    Column::text("codigo_de_puesto"),
    Column::text("lugar_de_adscripcion"),
    Column::text("telefono"),
    Column::text("correo_electronico"),
  ];
  const KEY_COLUMNS: &'static [&'static str] = &["curp"];

  fn fields(&self) -> Vec<Field> {
    vec![
      Field::Text(self.section.clone()),
      Field::Text(self.paternal_name.clone()),
      Field::Text(self.maternal_name.clone()),
      Field::Text(self.given_names.clone()),
      Field::Text(self.curp.clone()),
      Field::Text(self.position_code.clone()),
      Field::Text(self.location.clone()),
      Field::Text(self.phone.clone()),
      Field::Text(self.email.clone()),
    ]
  }

  fn from_fields(fields: Vec<Field>) -> Result<Self> {
    let mut r = FieldReader::<Self>::new(fields);
    Ok(Self {
      section:       r.text()?,
      paternal_name: r.text()?,
      maternal_name: r.text()?,
      given_names:   r.text()?,
      curp:          r.text()?,
      position_code: r.text()?,
      location:      r.text()?,
      phone:         r.text()?,
      email:         r.text()?,
    })
  }

  fn key(&self) -> NaturalKey { NaturalKey::single(&self.curp) }
}

// ─── Recipient ───────────────────────────────────────────────────────────────

/// A scholarship holder sponsored by a [`Worker`] (`becarios`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
  pub worker_curp:   String,
  pub paternal_name: String,
  pub maternal_name: String,
  pub given_names:   String,
  pub curp:          String,
  pub birth_date:    String,
  pub sex:           String,
}

impl Recipient {
  pub fn full_name(&self) -> String {
    full_name(&self.given_names, &self.paternal_name, &self.maternal_name)
  }
}

impl Entity for Recipient {
  const KIND: &'static str = "recipient";
  const TABLE: &'static str = "becarios";
  const COLUMNS: &'static [Column] = &[
    Column::text("curp_trabajador"),
    Column::text("apellido_paterno"),
    Column::text("apellido_materno"),
    Column::text("nombres"),
    Column::text("curp"),
    Column::text("fecha_de_nacimiento"),
    Column::text("sexo"),
  ];
  const KEY_COLUMNS: &'static [&'static str] = &["curp"];
  const PARENT: Option<Reference> = Some(Reference {
    table:  Worker::TABLE,
    column: "curp",
  });

  fn fields(&self) -> Vec<Field> {
    vec![
      Field::Text(self.worker_curp.clone()),
      Field::Text(self.paternal_name.clone()),
      Field::Text(self.maternal_name.clone()),
      Field::Text(self.given_names.clone()),
      Field::Text(self.curp.clone()),
      Field::Text(self.birth_date.clone()),
      Field::Text(self.sex.clone()),
    ]
  }

  fn from_fields(fields: Vec<Field>) -> Result<Self> {
    let mut r = FieldReader::<Self>::new(fields);
    Ok(Self {
      worker_curp:   r.text()?,
      paternal_name: r.text()?,
      maternal_name: r.text()?,
      given_names:   r.text()?,
      curp:          r.text()?,
      birth_date:    r.text()?,
      sex:           r.text()?,
    })
  }

  fn key(&self) -> NaturalKey { NaturalKey::single(&self.curp) }

  fn parent_key(&self) -> Option<String> { Some(self.worker_curp.clone()) }
}

// ─── YearlyRecord ────────────────────────────────────────────────────────────

/// One recipient's academic entry for a given year (`datos_becario`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
  pub recipient_curp: String,
  /// Four-digit year, stored as text.
  pub year:           String,
  /// Free text; whether a scholarship was granted the previous year.
  pub prior_grant:    String,
  pub grade:          String,
  pub average:        f64,
}

impl Entity for YearlyRecord {
  const KIND: &'static str = "yearly record";
  const TABLE: &'static str = "datos_becario";
  const COLUMNS: &'static [Column] = &[
    Column::text("curp_becario"),
    Column::text("anio"),
    Column::text("anterior_obtuvo_beca"),
    Column::text("grado_cursado"),
    Column::real("promedio"),
  ];
  const KEY_COLUMNS: &'static [&'static str] = &["curp_becario", "anio"];
  const PARENT: Option<Reference> = Some(Reference {
    table:  Recipient::TABLE,
    column: "curp",
  });

  fn fields(&self) -> Vec<Field> {
    vec![
      Field::Text(self.recipient_curp.clone()),
      Field::Text(self.year.clone()),
      Field::Text(self.prior_grant.clone()),
      Field::Text(self.grade.clone()),
      Field::Real(self.average),
    ]
  }

  fn from_fields(fields: Vec<Field>) -> Result<Self> {
    let mut r = FieldReader::<Self>::new(fields);
    Ok(Self {
      recipient_curp: r.text()?,
      year:           r.text()?,
      prior_grant:    r.text()?,
      grade:          r.text()?,
      average:        r.real()?,
    })
  }

  fn key(&self) -> NaturalKey { NaturalKey::pair(&self.recipient_curp, &self.year) }

  fn parent_key(&self) -> Option<String> { Some(self.recipient_curp.clone()) }
}

// ─── Listings ────────────────────────────────────────────────────────────────

/// One line of the worker list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerListing {
  pub full_name: String,
  pub curp:      String,
  pub email:     String,
  pub phone:     String,
}

impl WorkerListing {
  /// `[full_name, curp, email, phone]`, the shape the list page consumes.
  pub fn into_row(self) -> [String; 4] {
    [self.full_name, self.curp, self.email, self.phone]
  }
}

/// One line of the recipient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientListing {
  pub full_name:   String,
  pub curp:        String,
  pub worker_curp: String,
}

impl RecipientListing {
  /// `[full_name, curp, worker_curp]`.
  pub fn into_row(self) -> [String; 3] {
    [self.full_name, self.curp, self.worker_curp]
  }
}

/// `"<given> <paternal> <maternal>"`, the same concatenation the list
/// queries perform.
pub fn full_name(given: &str, paternal: &str, maternal: &str) -> String {
  format!("{given} {paternal} {maternal}")
}
