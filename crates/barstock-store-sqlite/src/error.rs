//! Error type for `barstock-store-sqlite`.

use barstock_core::Dimension;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A fact row references a name that has no surrogate id even after the
  /// dimension was topped up.
  #[error("{dimension} has no id for name {name:?}")]
  UnresolvedName { dimension: Dimension, name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
