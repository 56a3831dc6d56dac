//! Spreadsheet ingestion for the scholarship registry.
//!
//! [`ingest`] reads one sheet of an uploaded workbook and reconciles every
//! row against a [`becas_core::store::RecordStore`], stopping at the first
//! row that fails.

mod driver;
pub mod error;
pub mod spreadsheet;

pub use driver::{IngestOptions, IngestReport, ingest, ingest_rows};
pub use error::{Error, Result};
