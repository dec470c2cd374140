//! Core types and trait definitions for the bar stock pipeline.
//!
//! This crate is free of CSV, HTTP and database dependencies. The ingest,
//! storage, lookup and reporting crates all depend on it.

// Native `async fn` in traits; the returned futures carry explicit `Send`
// bounds in the trait signatures.
#![allow(async_fn_in_trait)]

pub mod dimension;
pub mod error;
pub mod lookup;
pub mod record;
pub mod store;
pub mod table;

pub use dimension::{Dimension, FactKind};
pub use error::{Error, Result};
pub use table::{Table, Value};
