//! Schema-less loading of one delimited file.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::{Error, Result};

/// Number of leading columns kept from every file.
pub const TABLE_WIDTH: usize = 3;

/// Candidate separators, in order of preference.
const DELIMITERS: [u8; 2] = [b',', b'\t'];

/// A file read into at most [`TABLE_WIDTH`] string columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
  pub delimiter: u8,
  /// Field names of the first row, when that row was judged a header.
  pub header:    Option<Vec<String>>,
  /// Column count after truncation; may be below [`TABLE_WIDTH`].
  pub width:     usize,
  /// Data rows, each exactly `width` fields long.
  pub rows:      Vec<Vec<String>>,
  /// One-line load summary for the caller's log.
  pub message:   String,
}

impl LoadedTable {
  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// Read `path`, sniffing its delimiter and header row.
///
/// When `index_column` is set, the first column is a row index and is
/// discarded before anything else looks at the row.
pub fn load_table(path: impl AsRef<Path>, index_column: bool) -> Result<LoadedTable> {
  let path = path.as_ref();
  if !path.exists() {
    return Err(Error::PathNotFound(path.to_path_buf()));
  }
  let data = std::fs::read(path)?;

  let (delimiter, first) = sniff_delimiter(&data, index_column)?;
  let has_header = looks_like_header(&first);
  let width = first.len().min(TABLE_WIDTH);

  let mut reader = ReaderBuilder::new()
    .delimiter(delimiter)
    .has_headers(false)
    .flexible(true)
    .from_reader(data.as_slice());

  let mut records = reader.records();
  let header = if has_header {
    records
      .next()
      .transpose()?
      .map(|r| fields(&r, index_column, Some(width)))
  } else {
    None
  };

  let rows = records
    .map(|r| r.map(|r| fields(&r, index_column, Some(width))))
    .collect::<Result<Vec<_>, csv::Error>>()?;

  let message = format!("Got next table from path - ({}, {width})", rows.len());
  tracing::debug!(
    path = %path.display(),
    delimiter = %char::from(delimiter).escape_default(),
    has_header,
    "sniffed table layout"
  );

  Ok(LoadedTable { delimiter, header, width, rows, message })
}

/// Pick the first delimiter that splits the first row into at least two
/// columns. Falls back to the last candidate when none does.
fn sniff_delimiter(data: &[u8], index_column: bool) -> Result<(u8, Vec<String>)> {
  let mut fallback = None;
  for delimiter in DELIMITERS {
    let mut reader = ReaderBuilder::new()
      .delimiter(delimiter)
      .has_headers(false)
      .flexible(true)
      .from_reader(data);

    let Some(first) = reader.records().next().transpose()? else {
      return Err(Error::Empty);
    };
    let first = fields(&first, index_column, None);
    if first.len() >= 2 {
      return Ok((delimiter, first));
    }
    fallback = Some((delimiter, first));
  }
  fallback.ok_or(Error::Empty)
}

/// Field names carry no digits; a row with any digit anywhere is data.
pub(crate) fn looks_like_header(names: &[String]) -> bool {
  !names.iter().flat_map(|n| n.chars()).any(|c| c.is_ascii_digit())
}

/// Drop the index column if present. With a `width`, keep exactly that many
/// fields, padding short rows with empty strings; without one, keep them all.
fn fields(record: &StringRecord, index_column: bool, width: Option<usize>) -> Vec<String> {
  let kept = record.iter().skip(usize::from(index_column));
  let Some(width) = width else {
    return kept.map(str::to_owned).collect();
  };
  let mut out: Vec<String> = kept.take(width).map(str::to_owned).collect();
  out.resize(width, String::new());
  out
}
