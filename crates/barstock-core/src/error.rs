//! Error types for `barstock-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("column not found: {0:?}")]
  MissingColumn(String),

  #[error("column {column:?} holds a non-numeric value in row {row}")]
  NotNumeric { column: String, row: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
