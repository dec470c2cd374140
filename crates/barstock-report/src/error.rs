//! Error type for `barstock-report`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("table error: {0}")]
  Table(#[from] barstock_core::Error),

  #[error("spreadsheet error: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),

  /// Row or column index beyond what a worksheet can address.
  #[error("table does not fit a worksheet at index {0}")]
  TooLarge(usize),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
