//! Error types for `becas-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The average cell of a spreadsheet row is not a finite number.
  ///
  /// `source` is `None` when the text parsed but named NaN or infinity.
  #[error("invalid average {value:?} for worker {curp}")]
  InvalidAverage {
    curp:   String,
    value:  String,
    #[source]
    source: Option<std::num::ParseFloatError>,
  },

  #[error("{kind}: missing value for column {column}")]
  MissingField {
    kind:   &'static str,
    column: &'static str,
  },

  #[error("{kind}: column {column} holds the wrong type of value")]
  FieldType {
    kind:   &'static str,
    column: &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
