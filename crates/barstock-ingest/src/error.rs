//! Error type for `barstock-ingest`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("path {0:?} does not exist")]
  PathNotFound(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("absent some fields in table: found {found} column(s), need 3")]
  TooFewColumns { found: usize },

  #[error("table holds no rows")]
  Empty,

  /// A value with no parseable leading token. Fatal for the whole file.
  #[error("cannot coerce {column} in row {row}: {value:?}")]
  Coercion {
    column: &'static str,
    row:    usize,
    value:  String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
