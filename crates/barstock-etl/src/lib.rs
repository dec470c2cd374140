//! Bar stock ETL: loads per-bar transaction and stock files into SQLite,
//! back-fills drink glass types from the cocktail catalogue, and writes the
//! general statistics and procurement spreadsheets.
//!
//! [`Pipeline::run`] drives the whole thing and returns a [`RunSummary`]
//! describing what happened to every script, file, lookup and report.

pub mod config;
pub mod enrich;
pub mod error;
pub mod outcome;
pub mod pipeline;

#[cfg(test)]
mod testing;

pub use config::{BarFile, PipelineConfig};
pub use enrich::{API_PAUSE, GlassTypeEnricher};
pub use error::{Error, Result};
pub use outcome::{
  EnrichmentOutcome, EnrichmentSummary, FileOutcome, FileStatus, ReportOutcome, RunSummary,
  ScriptOutcome,
};
pub use pipeline::{Pipeline, RunOptions};
