//! Derived reporting spreadsheets.
//!
//! [`ReportBuilder`] runs the analytical query against a [`BarStore`], writes
//! the result as the general statistics workbook, and derives the procurement
//! shortfall workbook from it. Both file names carry the report date.

pub mod error;
pub mod procurement;
pub mod xlsx;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use barstock_core::store::BarStore;
use chrono::{Local, NaiveDate};

/// Files written by one [`ReportBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
  pub general:          PathBuf,
  pub general_rows:     usize,
  pub procurement:      PathBuf,
  pub procurement_rows: usize,
}

/// Result of a report run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reports {
  Written(ReportFiles),
  /// The analytical query returned no rows; nothing was written.
  Empty,
}

#[derive(Debug, Clone)]
pub struct ReportBuilder {
  output_dir: PathBuf,
  date:       NaiveDate,
}

impl ReportBuilder {
  /// Reports dated today, written to `output_dir`.
  pub fn new(output_dir: impl Into<PathBuf>) -> Self {
    Self { output_dir: output_dir.into(), date: Local::now().date_naive() }
  }

  pub fn with_date(mut self, date: NaiveDate) -> Self {
    self.date = date;
    self
  }

  pub fn output_dir(&self) -> &Path { &self.output_dir }

  /// `general_stats_for_<YYYYMMDD>.xlsx`
  pub fn general_path(&self) -> PathBuf {
    self
      .output_dir
      .join(format!("general_stats_for_{}.xlsx", self.date.format("%Y%m%d")))
  }

  /// `need_for_procurement_for_<YYYYMMDD>.xlsx`
  pub fn procurement_path(&self) -> PathBuf {
    self
      .output_dir
      .join(format!("need_for_procurement_for_{}.xlsx", self.date.format("%Y%m%d")))
  }

  pub async fn build<S: BarStore>(&self, store: &S, query: String) -> Result<Reports> {
    let stats = store
      .query_table(query)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    if stats.is_empty() {
      tracing::warn!("Problem with retrieving data about current statistic");
      return Ok(Reports::Empty);
    }

    let general = self.general_path();
    xlsx::write_xlsx(&stats, &general)?;
    tracing::info!(
      "Got and Saved next general stats table: {:?}:{}",
      stats.shape(),
      general.display()
    );

    let shortfall = procurement::procurement(&stats)?;
    let procurement = self.procurement_path();
    xlsx::write_xlsx(&shortfall, &procurement)?;
    tracing::info!(
      "Got and Saved next procurement info: {:?}:{}",
      shortfall.shape(),
      procurement.display()
    );

    Ok(Reports::Written(ReportFiles {
      general,
      general_rows: stats.len(),
      procurement,
      procurement_rows: shortfall.len(),
    }))
  }
}
