//! Structured results of a pipeline run.
//!
//! Every step reports here instead of aborting the run, so callers (and
//! tests) can see which files, scripts and lookups failed and why.

use std::path::PathBuf;

use barstock_core::FactKind;
use barstock_report::ReportFiles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
  pub path:  PathBuf,
  /// `None` on success.
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
  Loaded { rows: usize },
  Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
  pub path:   PathBuf,
  pub kind:   FactKind,
  /// Bar the file was attributed to; transaction files only.
  pub bar:    Option<String>,
  pub status: FileStatus,
}

impl FileOutcome {
  pub fn is_loaded(&self) -> bool { matches!(self.status, FileStatus::Loaded { .. }) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
  /// Drinks that had no glass type at the start of the pass.
  pub candidates: usize,
  /// Drinks the catalogue resolved to a glass name.
  pub resolved:   usize,
  /// Drink rows written back with a glass type.
  pub upserted:   usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
  Done(EnrichmentSummary),
  Failed { reason: String },
  Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
  Written(ReportFiles),
  /// The analytical query returned nothing.
  Empty,
  Failed { reason: String },
  Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
  pub scripts:            Vec<ScriptOutcome>,
  pub files:              Vec<FileOutcome>,
  pub transactions_total: Option<i64>,
  pub stocks_total:       Option<i64>,
  pub enrichment:         EnrichmentOutcome,
  pub reports:            ReportOutcome,
}

impl RunSummary {
  pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
    self.files.iter().filter(|f| !f.is_loaded())
  }

  /// One closing log line per step.
  pub fn log(&self) {
    let failed_scripts = self.scripts.iter().filter(|s| s.error.is_some()).count();
    tracing::info!(
      "Schema scripts: {} run, {failed_scripts} failed",
      self.scripts.len()
    );

    let failed = self.failed_files().count();
    tracing::info!(
      "Input files: {} loaded, {failed} failed",
      self.files.len() - failed
    );
    for f in self.failed_files() {
      if let FileStatus::Failed { reason } = &f.status {
        tracing::warn!("  {} ({}): {reason}", f.path.display(), f.kind);
      }
    }

    match &self.enrichment {
      EnrichmentOutcome::Done(s) => tracing::info!(
        "Glass types: {} candidate(s), {} resolved, {} updated",
        s.candidates,
        s.resolved,
        s.upserted
      ),
      EnrichmentOutcome::Failed { reason } => {
        tracing::warn!("Glass types: enrichment failed: {reason}")
      }
      EnrichmentOutcome::Skipped => tracing::info!("Glass types: skipped"),
    }

    match &self.reports {
      ReportOutcome::Written(r) => tracing::info!(
        "Reports: {} ({} rows), {} ({} rows)",
        r.general.display(),
        r.general_rows,
        r.procurement.display(),
        r.procurement_rows
      ),
      ReportOutcome::Empty => tracing::warn!("Reports: no data, nothing written"),
      ReportOutcome::Failed { reason } => tracing::warn!("Reports: failed: {reason}"),
      ReportOutcome::Skipped => tracing::info!("Reports: skipped"),
    }
  }
}
