//! Error type for `barstock-etl`.
//!
//! These never escape [`Pipeline::run`](crate::Pipeline::run); they are
//! turned into messages on the run summary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Ingest(#[from] barstock_ingest::Error),

  #[error("{0}")]
  Report(#[from] barstock_report::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("no configured bar matches file name {0:?}")]
  NoBarForFile(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
