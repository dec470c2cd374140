//! Test doubles shared by the enricher and pipeline tests.

use std::{
  collections::{HashMap, HashSet},
  sync::Mutex,
};

use barstock_core::lookup::{Cocktail, GlassLookup};
use barstock_store_sqlite::SqliteStore;
use tempfile::TempDir;

#[derive(Debug, thiserror::Error)]
#[error("catalogue unavailable")]
pub struct Unavailable;

/// In-memory catalogue that records every name it is asked for.
#[derive(Debug, Default)]
pub struct FakeLookup {
  hits:    HashMap<String, Vec<Cocktail>>,
  failing: HashSet<String>,
  calls:   Mutex<Vec<String>>,
}

impl FakeLookup {
  pub fn hit(mut self, query: &str, hits: Vec<Cocktail>) -> Self {
    self.hits.insert(query.to_owned(), hits);
    self
  }

  pub fn failing(mut self, query: &str) -> Self {
    self.failing.insert(query.to_owned());
    self
  }

  pub fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }
}

impl GlassLookup for FakeLookup {
  type Error = Unavailable;

  async fn search(&self, drink_name: String) -> Result<Vec<Cocktail>, Unavailable> {
    self.calls.lock().unwrap().push(drink_name.clone());
    if self.failing.contains(&drink_name) {
      return Err(Unavailable);
    }
    Ok(self.hits.get(&drink_name).cloned().unwrap_or_default())
  }
}

/// A store on a fresh temporary file with the bundled schema applied.
pub async fn temp_store() -> (TempDir, SqliteStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = SqliteStore::new(dir.path().join("bars.db"));
  store.init_default_schema().await.expect("schema");
  (dir, store)
}
