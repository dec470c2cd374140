//! Reading point-of-sale and stock exports into cleaned records.
//!
//! [`load_table`] sniffs the delimiter and header of one delimited file and
//! keeps its first three columns; [`clean_transactions`] and [`clean_stocks`]
//! bind those columns to a fact schema and coerce their values.

mod clean;
mod loader;

pub mod error;

pub use clean::{clean_stocks, clean_transactions, leading_token, parse_datetime};
pub use error::{Error, Result};
pub use loader::{LoadedTable, TABLE_WIDTH, load_table};
