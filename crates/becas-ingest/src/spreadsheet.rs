//! Reads a worksheet as rows of cell text.
//!
//! Cell positions are preserved: rows and columns in front of the sheet's
//! used range are padded back in, so index `n` of a row is always column
//! `n` of the sheet and row `n` of the result is sheet row `n + 1`.

use std::path::Path;

use becas_core::row::{HEADER_SENTINEL, col};
use calamine::{Data, Reader, open_workbook_auto};
use serde::Serialize;

use crate::{Error, Result};

/// Load every row of `sheet` from the workbook at `path`.
///
/// Works with any format `calamine` recognises (xlsx, xls, ods). The
/// workbook is closed before this returns.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>> {
  let mut workbook = open_workbook_auto(path).map_err(|source| Error::Open {
    path: path.to_path_buf(),
    source,
  })?;

  if !workbook.sheet_names().iter().any(|name| name == sheet) {
    return Err(Error::SheetNotFound(sheet.to_owned()));
  }

  let range = workbook
    .worksheet_range(sheet)
    .map_err(|source| Error::Read { sheet: sheet.to_owned(), source })?;

  let (top, left) = range
    .start()
    .map(|(r, c)| (r as usize, c as usize))
    .unwrap_or((0, 0));

  let mut rows = vec![Vec::new(); top];
  rows.extend(range.rows().map(|cells| {
    std::iter::repeat_n(String::new(), left)
      .chain(cells.iter().map(cell_text))
      .collect::<Vec<_>>()
  }));
  Ok(rows)
}

/// Render a cell the way it reads in the sheet.
///
/// Whole numbers lose their fractional part (`12.0` reads `"12"`), dates
/// render as `YYYY-MM-DD`, and error cells read as empty.
pub fn cell_text(cell: &Data) -> String {
  match cell {
    Data::Empty | Data::Error(_) => String::new(),
    Data::String(s) => s.clone(),
    Data::Int(i) => i.to_string(),
    Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
    Data::Float(f) => f.to_string(),
    Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_owned(),
    Data::DateTime(dt) => match dt.as_datetime() {
      Some(d) => d.format("%Y-%m-%d").to_string(),
      None => dt.as_f64().to_string(),
    },
    Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
  }
}

/// What [`dump_sheet`] found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
  pub sheet:          String,
  pub total_rows:     usize,
  /// Non-header rows carrying a worker CURP.
  pub rows_with_curp: usize,
  /// Width of the first row.
  pub columns:        usize,
}

/// Summarise a sheet without touching any store.
pub fn dump_sheet(path: &Path, sheet: &str) -> Result<SheetSummary> {
  let rows = read_sheet(path, sheet)?;
  let rows_with_curp = rows
    .iter()
    .filter(|r| r.first().map(String::as_str) != Some(HEADER_SENTINEL))
    .filter(|r| r.get(col::WORKER_CURP).is_some_and(|c| !c.trim().is_empty()))
    .count();

  Ok(SheetSummary {
    sheet: sheet.to_owned(),
    total_rows: rows.len(),
    rows_with_curp,
    columns: rows.first().map_or(0, Vec::len),
  })
}
