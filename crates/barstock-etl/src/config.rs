//! Pipeline configuration.
//!
//! Read from an optional TOML file, then the unprefixed `DB_NAME`,
//! `TMP_DIR_TRANSACTIONS` and `TMP_DIR_STOCKS` variables older deployments
//! set, then `BARSTOCK_*` environment variables (e.g. `BARSTOCK_DB_NAME`).
//! Later sources win.

use std::{path::{Path, PathBuf}, time::Duration};

use barstock_cocktaildb::DEFAULT_BASE_URL;
use serde::Deserialize;

/// Maps input files to bars: a transaction file belongs to the first bar
/// whose `pattern` occurs in its file name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BarFile {
  pub pattern: String,
  pub bar:     String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
  /// SQLite database file.
  pub db_name:          PathBuf,
  /// One CSV per bar.
  pub transactions_dir: PathBuf,
  pub stocks_dir:       PathBuf,
  /// Every file whose name contains `.SQL` is run before loading.
  #[serde(default = "default_queries_dir")]
  pub queries_dir:      PathBuf,
  #[serde(default = "default_output_dir")]
  pub output_dir:       PathBuf,
  /// Replaces the built-in analytical query when set.
  #[serde(default)]
  pub report_query:     Option<PathBuf>,
  #[serde(default = "default_cocktaildb_url")]
  pub cocktaildb_url:   String,
  #[serde(default = "default_api_pause_ms")]
  pub api_pause_ms:     u64,
  #[serde(default = "default_bar_files")]
  pub bar_files:        Vec<BarFile>,
}

/// Unprefixed variables mapped onto their config keys.
pub const LEGACY_ENV: [(&str, &str); 3] = [
  ("DB_NAME", "db_name"),
  ("TMP_DIR_TRANSACTIONS", "transactions_dir"),
  ("TMP_DIR_STOCKS", "stocks_dir"),
];

impl PipelineConfig {
  /// Load from `path` and the process environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let vars = std::env::vars_os()
      .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
    Self::load_with_env(path, vars)
  }

  /// Load from `path` and the given environment variables.
  pub fn load_with_env(
    path: &Path,
    vars: impl IntoIterator<Item = (String, String)>,
  ) -> Result<Self, config::ConfigError> {
    let vars: config::Map<String, String> = vars.into_iter().collect();
    let legacy: config::Map<String, String> = LEGACY_ENV
      .iter()
      .filter_map(|(var, key)| vars.get(*var).map(|v| ((*key).to_owned(), v.clone())))
      .collect();

    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::default().source(Some(legacy)))
      .add_source(
        config::Environment::with_prefix("BARSTOCK")
          .try_parsing(true)
          .source(Some(vars)),
      )
      .build()?
      .try_deserialize()
  }

  /// Bar name for a transaction file, matched on its file name.
  pub fn bar_for_file(&self, file_name: &str) -> Option<&str> {
    self
      .bar_files
      .iter()
      .find(|b| file_name.contains(&b.pattern))
      .map(|b| b.bar.as_str())
  }

  pub fn api_pause(&self) -> Duration { Duration::from_millis(self.api_pause_ms) }
}

fn default_queries_dir() -> PathBuf { PathBuf::from("queries") }

fn default_output_dir() -> PathBuf { PathBuf::from(".") }

fn default_cocktaildb_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_api_pause_ms() -> u64 { 1000 }

fn default_bar_files() -> Vec<BarFile> {
  [("budapest", "budapest"), ("london", "london"), ("ny", "new york")]
    .into_iter()
    .map(|(pattern, bar)| BarFile { pattern: pattern.into(), bar: bar.into() })
    .collect()
}
