//! The orchestrator: schema, loads, enrichment, reports, in that order.

use std::path::{Path, PathBuf};

use barstock_cocktaildb::CocktailDbClient;
use barstock_core::{FactKind, lookup::GlassLookup, store::BarStore};
use barstock_ingest::{clean_stocks, clean_transactions, load_table};
use barstock_report::{ReportBuilder, Reports};
use barstock_store_sqlite::{GENERAL_STATS_QUERY, SqliteStore};
use chrono::{Local, NaiveDate};

use crate::{
  Error, Result,
  config::PipelineConfig,
  enrich::GlassTypeEnricher,
  outcome::{
    EnrichmentOutcome, FileOutcome, FileStatus, ReportOutcome, RunSummary, ScriptOutcome,
  },
};

/// Steps that can be switched off from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
  pub skip_enrichment: bool,
  pub skip_reports:    bool,
}

pub struct Pipeline<S, L> {
  config:   PipelineConfig,
  store:    S,
  enricher: GlassTypeEnricher<L>,
  reports:  ReportBuilder,
  options:  RunOptions,
}

impl Pipeline<SqliteStore, CocktailDbClient> {
  /// The production wiring: SQLite at `db_name`, the HTTP catalogue at
  /// `cocktaildb_url`.
  pub fn from_config(config: PipelineConfig) -> barstock_cocktaildb::Result<Self> {
    let store = SqliteStore::new(&config.db_name);
    let lookup = CocktailDbClient::new(&config.cocktaildb_url)?;
    Ok(Self::new(config, store, lookup))
  }
}

impl<S: BarStore, L: GlassLookup> Pipeline<S, L> {
  pub fn new(config: PipelineConfig, store: S, lookup: L) -> Self {
    let enricher = GlassTypeEnricher::new(lookup).with_pause(config.api_pause());
    let reports = ReportBuilder::new(&config.output_dir);
    Self { config, store, enricher, reports, options: RunOptions::default() }
  }

  pub fn with_options(mut self, options: RunOptions) -> Self {
    self.options = options;
    self
  }

  /// Date stamped into report file names; today by default.
  pub fn with_report_date(mut self, date: NaiveDate) -> Self {
    self.reports = self.reports.with_date(date);
    self
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn report_builder(&self) -> &ReportBuilder { &self.reports }

  /// Run every step. Nothing in here aborts the run; failures end up in the
  /// returned summary.
  pub async fn run(&self) -> RunSummary {
    let scripts = self.provision_schema().await;

    let mut files = self.load_transactions().await;
    let transactions_total = self.count(FactKind::Transaction).await;

    files.extend(self.load_stocks().await);
    let stocks_total = self.count(FactKind::Stock).await;

    let enrichment = if self.options.skip_enrichment {
      EnrichmentOutcome::Skipped
    } else {
      self.enrich().await
    };

    let reports = if self.options.skip_reports {
      ReportOutcome::Skipped
    } else {
      self.report().await
    };

    RunSummary { scripts, files, transactions_total, stocks_total, enrichment, reports }
  }

  // ─── Schema ────────────────────────────────────────────────────────────────

  /// Execute every `.SQL` file in the queries directory, in name order.
  pub async fn provision_schema(&self) -> Vec<ScriptOutcome> {
    let dir = &self.config.queries_dir;
    let scripts = match sorted_files(dir, |name| name.contains(".SQL")).await {
      Ok(scripts) => scripts,
      Err(e) => {
        tracing::warn!("Cannot read queries directory {}: {e}", dir.display());
        return Vec::new();
      }
    };

    let mut outcomes = Vec::with_capacity(scripts.len());
    for path in scripts {
      let error = match self.run_script(&path).await {
        Ok(()) => {
          tracing::info!("Executed script {}", path.display());
          None
        }
        Err(e) => {
          tracing::warn!("Script {} failed: {e}", path.display());
          Some(e.to_string())
        }
      };
      outcomes.push(ScriptOutcome { path, error });
    }
    outcomes
  }

  async fn run_script(&self, path: &Path) -> Result<()> {
    let sql = tokio::fs::read_to_string(path).await?;
    self.store.execute_script(sql).await.map_err(Error::store)
  }

  // ─── Loads ─────────────────────────────────────────────────────────────────

  /// Load every file in the transactions directory, attributing each to the
  /// bar named by its file name.
  pub async fn load_transactions(&self) -> Vec<FileOutcome> {
    let mut outcomes = Vec::new();
    for path in self.input_files(&self.config.transactions_dir).await {
      tracing::info!("Defined next file in transactions: {}", path.display());
      let name = file_name(&path);
      let bar = self.config.bar_for_file(&name).map(str::to_owned);

      let result = match &bar {
        Some(bar) => self.load_transaction_file(&path, bar).await,
        None => Err(Error::NoBarForFile(name)),
      };
      outcomes.push(file_outcome(path, FactKind::Transaction, bar, result));
    }
    outcomes
  }

  async fn load_transaction_file(&self, path: &Path, bar: &str) -> Result<usize> {
    let table = load_table(path, true)?;
    tracing::info!("{}", table.message);
    let records = clean_transactions(table)?;
    self
      .store
      .insert_bar_transactions(bar.to_owned(), records)
      .await
      .map_err(Error::store)
  }

  /// Load every file in the stocks directory. All rows of one file share a
  /// single `modifiedon` stamp.
  pub async fn load_stocks(&self) -> Vec<FileOutcome> {
    let mut outcomes = Vec::new();
    for path in self.input_files(&self.config.stocks_dir).await {
      tracing::info!("Defined next file in stocks: {}", path.display());
      let result = self.load_stock_file(&path).await;
      outcomes.push(file_outcome(path, FactKind::Stock, None, result));
    }
    outcomes
  }

  async fn load_stock_file(&self, path: &Path) -> Result<usize> {
    let table = load_table(path, false)?;
    tracing::info!("{}", table.message);
    let records = clean_stocks(table)?;
    self
      .store
      .insert_stocks(records, Local::now().naive_local())
      .await
      .map_err(Error::store)
  }

  async fn input_files(&self, dir: &Path) -> Vec<PathBuf> {
    match sorted_files(dir, |_| true).await {
      Ok(files) => files,
      Err(e) => {
        tracing::warn!("Cannot read input directory {}: {e}", dir.display());
        Vec::new()
      }
    }
  }

  async fn count(&self, kind: FactKind) -> Option<i64> {
    match self.store.count(kind).await {
      Ok(n) => {
        tracing::info!("Total rows in {}: {n}", kind.table());
        Some(n)
      }
      Err(e) => {
        tracing::warn!("Cannot count rows in {}: {e}", kind.table());
        None
      }
    }
  }

  // ─── Enrichment and reports ────────────────────────────────────────────────

  pub async fn enrich(&self) -> EnrichmentOutcome {
    match self.enricher.enrich(&self.store).await {
      Ok(summary) => EnrichmentOutcome::Done(summary),
      Err(e) => {
        tracing::warn!("Glass type enrichment failed: {e}");
        EnrichmentOutcome::Failed { reason: e.to_string() }
      }
    }
  }

  pub async fn report(&self) -> ReportOutcome {
    match self.build_reports().await {
      Ok(Reports::Written(files)) => ReportOutcome::Written(files),
      Ok(Reports::Empty) => ReportOutcome::Empty,
      Err(e) => {
        tracing::warn!("Report generation failed: {e}");
        ReportOutcome::Failed { reason: e.to_string() }
      }
    }
  }

  async fn build_reports(&self) -> Result<Reports> {
    let query = match &self.config.report_query {
      Some(path) => tokio::fs::read_to_string(path).await?,
      None => GENERAL_STATS_QUERY.to_owned(),
    };
    Ok(self.reports.build(&self.store, query).await?)
  }
}

fn file_outcome(
  path: PathBuf,
  kind: FactKind,
  bar: Option<String>,
  result: Result<usize>,
) -> FileOutcome {
  let status = match result {
    Ok(rows) => {
      tracing::info!("Loaded {rows} row(s) from {}", path.display());
      FileStatus::Loaded { rows }
    }
    Err(e) => {
      tracing::warn!("Problem with {}: {e}", path.display());
      FileStatus::Failed { reason: e.to_string() }
    }
  };
  FileOutcome { path, kind, bar, status }
}

fn file_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default()
}

/// Regular files in `dir` whose names pass `keep`, sorted by path.
async fn sorted_files(
  dir: &Path,
  keep: impl Fn(&str) -> bool,
) -> std::io::Result<Vec<PathBuf>> {
  let mut entries = tokio::fs::read_dir(dir).await?;
  let mut files = Vec::new();
  while let Some(entry) = entries.next_entry().await? {
    if !entry.file_type().await?.is_file() {
      continue;
    }
    let path = entry.path();
    if keep(&file_name(&path)) {
      files.push(path);
    }
  }
  files.sort();
  Ok(files)
}
