//! Maps one spreadsheet row onto the entities it describes.
//!
//! The column positions below are fixed by the workbook the registry office
//! produces; a row is a plain sequence of cell texts.

use crate::{Error, Recipient, Result, Worker, YearlyRecord};

/// Number of columns a complete row carries. Shorter rows are padded.
pub const COLUMN_COUNT: usize = 19;

/// First-cell value that marks the header row.
pub const HEADER_SENTINEL: &str = "NO";

/// Zero-based column positions.
pub mod col {
  pub const NUMBER: usize = 0;
  pub const SECTION: usize = 1;
  pub const WORKER_PATERNAL: usize = 2;
  pub const WORKER_MATERNAL: usize = 3;
  pub const WORKER_NAMES: usize = 4;
  pub const WORKER_CURP: usize = 5;
  pub const POSITION_CODE: usize = 6;
  pub const LOCATION: usize = 7;
  pub const EMAIL: usize = 8;
  pub const RECIPIENT_PATERNAL: usize = 9;
  pub const RECIPIENT_MATERNAL: usize = 10;
  pub const RECIPIENT_NAMES: usize = 11;
  pub const RECIPIENT_CURP: usize = 12;
  pub const BIRTH_DATE: usize = 13;
  pub const SEX: usize = 14;
  pub const PRIOR_GRANT: usize = 15;
  pub const GRADE: usize = 16;
  pub const AVERAGE: usize = 17;
  pub const PHONE: usize = 18;
}

/// Why a row produced no entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  Header,
  MissingWorkerCurp,
}

/// A recipient together with this year's academic record.
#[derive(Debug, Clone, PartialEq)]
pub struct Scholarship {
  pub recipient: Recipient,
  pub record:    YearlyRecord,
}

/// The outcome of mapping a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedRow {
  Skip(SkipReason),
  /// `scholarship` is `None` when the recipient CURP cell is empty.
  Record {
    worker:      Worker,
    scholarship: Option<Scholarship>,
  },
}

/// Map `cells` to entities, stamping the yearly record with `year`.
///
/// CURP cells are trimmed; every other cell is kept as read.
pub fn map_row(cells: &[String], year: i32) -> Result<MappedRow> {
  let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");
  let owned = |i: usize| cell(i).to_owned();

  if cell(col::NUMBER) == HEADER_SENTINEL {
    return Ok(MappedRow::Skip(SkipReason::Header));
  }

  let worker_curp = cell(col::WORKER_CURP).trim();
  if worker_curp.is_empty() {
    return Ok(MappedRow::Skip(SkipReason::MissingWorkerCurp));
  }

  let average = parse_average(worker_curp, cell(col::AVERAGE))?;

  let worker = Worker {
    section:       owned(col::SECTION),
    paternal_name: owned(col::WORKER_PATERNAL),
    maternal_name: owned(col::WORKER_MATERNAL),
    given_names:   owned(col::WORKER_NAMES),
    curp:          worker_curp.to_owned(),
    position_code: owned(col::POSITION_CODE),
    location:      owned(col::LOCATION),
    phone:         owned(col::PHONE),
    email:         owned(col::EMAIL),
  };

  let recipient_curp = cell(col::RECIPIENT_CURP).trim();
  let scholarship = (!recipient_curp.is_empty()).then(|| Scholarship {
    recipient: Recipient {
      worker_curp:   worker_curp.to_owned(),
      paternal_name: owned(col::RECIPIENT_PATERNAL),
      maternal_name: owned(col::RECIPIENT_MATERNAL),
      given_names:   owned(col::RECIPIENT_NAMES),
      curp:          recipient_curp.to_owned(),
      birth_date:    owned(col::BIRTH_DATE),
      sex:           owned(col::SEX),
    },
    record:    YearlyRecord {
      recipient_curp: recipient_curp.to_owned(),
      year:           year.to_string(),
      prior_grant:    owned(col::PRIOR_GRANT),
      grade:          owned(col::GRADE),
      average,
    },
  });

  Ok(MappedRow::Record { worker, scholarship })
}

/// An empty cell is a zero average; anything else must parse to a finite
/// number. SQLite stores NaN as NULL, so it could never round-trip.
fn parse_average(curp: &str, raw: &str) -> Result<f64> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(0.0);
  }
  let invalid = |source| Error::InvalidAverage {
    curp: curp.to_owned(),
    value: raw.to_owned(),
    source,
  };
  match raw.parse::<f64>() {
    Ok(value) if value.is_finite() => Ok(value),
    Ok(_) => Err(invalid(None)),
    Err(e) => Err(invalid(Some(e))),
  }
}
