//! SQLite backend for the bar stock pipeline.
//!
//! Wraps [`tokio_rusqlite`]. Every operation opens its own connection to the
//! database file, runs, and closes it again; nothing is held between calls.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::{GENERAL_STATS_QUERY, SCHEMA};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
