//! Back-filling drink glass types from the cocktail catalogue.

use std::{collections::BTreeSet, time::Duration};

use barstock_core::{
  Dimension,
  lookup::{GlassLookup, exact_match_glass},
  record::Drink,
  store::BarStore,
};

use crate::{Error, Result, outcome::EnrichmentSummary};

/// Pause after every catalogue request, hit or miss.
pub const API_PAUSE: Duration = Duration::from_secs(1);

/// Sequential, rate-limited glass type resolution.
///
/// Drinks the catalogue does not know stay unresolved and are picked up again
/// on the next run.
#[derive(Debug, Clone)]
pub struct GlassTypeEnricher<L> {
  lookup: L,
  pause:  Duration,
}

impl<L: GlassLookup> GlassTypeEnricher<L> {
  pub fn new(lookup: L) -> Self { Self { lookup, pause: API_PAUSE } }

  pub fn with_pause(mut self, pause: Duration) -> Self {
    self.pause = pause;
    self
  }

  pub fn lookup(&self) -> &L { &self.lookup }

  /// Look each drink up by name, one request at a time. Returns the drinks
  /// that resolved, paired with their lower-cased glass name.
  pub async fn resolve(&self, drinks: Vec<Drink>) -> Vec<(Drink, String)> {
    let mut staged = Vec::new();
    for drink in drinks {
      match self.lookup.search(drink.name.clone()).await {
        Ok(hits) => match exact_match_glass(&hits, &drink.name) {
          Some(glass) => {
            let glass = glass.to_lowercase();
            tracing::debug!(drink = %drink.name, %glass, "resolved glass type");
            staged.push((drink, glass));
          }
          None => tracing::debug!(drink = %drink.name, "no exact match in catalogue"),
        },
        Err(e) => {
          tracing::warn!(drink = %drink.name, "Problem with retrieving data from API: {e}")
        }
      }
      tokio::time::sleep(self.pause).await;
    }
    staged
  }

  /// One enrichment pass over every drink without a glass type.
  pub async fn enrich<S: BarStore>(&self, store: &S) -> Result<EnrichmentSummary> {
    let drinks = store
      .drinks_missing_glass_type()
      .await
      .map_err(Error::store)?;
    if drinks.is_empty() {
      tracing::info!("All data - glass types updated");
      return Ok(EnrichmentSummary::default());
    }

    let candidates = drinks.len();
    tracing::info!("Starting updating glass_type_id through {candidates} values");
    let staged = self.resolve(drinks).await;
    tracing::info!("Received {} values from API", staged.len());

    let mut summary = EnrichmentSummary { candidates, resolved: staged.len(), upserted: 0 };
    if staged.is_empty() {
      return Ok(summary);
    }

    let names: BTreeSet<String> = staged.iter().map(|(_, g)| g.clone()).collect();
    store
      .resolve_or_insert(Dimension::GlassType, names.into_iter().collect())
      .await
      .map_err(Error::store)?;
    let glass_ids = store
      .lookup_map(Dimension::GlassType)
      .await
      .map_err(Error::store)?;

    let updates = staged
      .into_iter()
      .map(|(drink, glass)| Drink { glass_type_id: glass_ids.get(&glass).copied(), ..drink })
      .collect();
    summary.upserted = store
      .upsert_drink_glass_types(updates)
      .await
      .map_err(Error::store)?;
    tracing::info!("Updated glasses types for drinks: {}", summary.upserted);

    Ok(summary)
  }
}

#[cfg(test)]
mod tests {
  use barstock_core::{Value, lookup::Cocktail, record::TransactionRecord};

  use super::*;
  use crate::testing::{FakeLookup, temp_store};

  fn cocktail(name: &str, glass: &str) -> Cocktail {
    Cocktail { name: name.into(), glass: Some(glass.into()) }
  }

  async fn with_drinks(names: &[&str]) -> (tempfile::TempDir, barstock_store_sqlite::SqliteStore) {
    let (dir, store) = temp_store().await;
    let records = names
      .iter()
      .map(|n| TransactionRecord { datetime: None, drink: n.to_string(), amount: 1.0 })
      .collect();
    store
      .insert_bar_transactions("london".into(), records)
      .await
      .unwrap();
    (dir, store)
  }

  fn enricher(lookup: FakeLookup) -> GlassTypeEnricher<FakeLookup> {
    GlassTypeEnricher::new(lookup).with_pause(Duration::ZERO)
  }

  #[tokio::test]
  async fn mojito_resolves_to_lowercased_glass() {
    let (_dir, store) = with_drinks(&["Mojito"]).await;
    let lookup = FakeLookup::default().hit("Mojito", vec![cocktail("Mojito", "Highball Glass")]);
    let e = enricher(lookup);

    let summary = e.enrich(&store).await.unwrap();
    assert_eq!(summary, EnrichmentSummary { candidates: 1, resolved: 1, upserted: 1 });

    let glasses = store.lookup_map(Dimension::GlassType).await.unwrap();
    assert_eq!(glasses.len(), 1);
    let glass_id = glasses["highball glass"];

    assert!(store.drinks_missing_glass_type().await.unwrap().is_empty());
    let t = store
      .query_table("SELECT name, glass_type_id FROM drinks".into())
      .await
      .unwrap();
    assert_eq!(t.rows, vec![vec![Value::from("Mojito"), Value::from(glass_id)]]);
    assert_eq!(e.lookup.calls(), vec!["Mojito".to_owned()]);
  }

  #[tokio::test]
  async fn unmatched_names_stay_unresolved() {
    let (_dir, store) = with_drinks(&["Mojito"]).await;
    let lookup = FakeLookup::default().hit("Mojito", vec![
      cocktail("Mojito Blanco", "Collins Glass"),
      cocktail("mojito", "Highball Glass"),
    ]);

    let summary = enricher(lookup).enrich(&store).await.unwrap();
    assert_eq!(summary, EnrichmentSummary { candidates: 1, resolved: 0, upserted: 0 });
    assert!(store.lookup_map(Dimension::GlassType).await.unwrap().is_empty());
    assert_eq!(store.drinks_missing_glass_type().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn lookup_errors_do_not_abort_the_batch() {
    let (_dir, store) = with_drinks(&["Mojito", "Negroni", "Zombie"]).await;
    let lookup = FakeLookup::default()
      .failing("Mojito")
      .hit("Negroni", vec![cocktail("Negroni", "Old-Fashioned Glass")])
      .hit("Zombie", vec![cocktail("Zombie", "Highball glass")]);
    let e = enricher(lookup);

    let summary = e.enrich(&store).await.unwrap();
    assert_eq!(summary, EnrichmentSummary { candidates: 3, resolved: 2, upserted: 2 });
    assert_eq!(e.lookup.calls().len(), 3);

    let missing = store.drinks_missing_glass_type().await.unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].name, "Mojito");
  }

  #[tokio::test]
  async fn shared_glass_is_inserted_once() {
    let (_dir, store) = with_drinks(&["Mojito", "Zombie"]).await;
    let lookup = FakeLookup::default()
      .hit("Mojito", vec![cocktail("Mojito", "Highball glass")])
      .hit("Zombie", vec![cocktail("Zombie", "HIGHBALL GLASS")]);

    let summary = enricher(lookup).enrich(&store).await.unwrap();
    assert_eq!(summary.upserted, 2);
    assert_eq!(store.lookup_map(Dimension::GlassType).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn nothing_to_do_makes_no_calls() {
    let (_dir, store) = temp_store().await;
    let e = enricher(FakeLookup::default());
    let summary = e.enrich(&store).await.unwrap();
    assert_eq!(summary, EnrichmentSummary::default());
    assert!(e.lookup.calls().is_empty());
  }

  #[tokio::test]
  async fn second_pass_only_retries_unresolved() {
    let (_dir, store) = with_drinks(&["Mojito", "Negroni"]).await;
    let lookup = FakeLookup::default().hit("Mojito", vec![cocktail("Mojito", "Highball glass")]);
    let e = enricher(lookup);

    e.enrich(&store).await.unwrap();
    let summary = e.enrich(&store).await.unwrap();
    assert_eq!(summary, EnrichmentSummary { candidates: 1, resolved: 0, upserted: 0 });
    assert_eq!(e.lookup.calls(), vec!["Mojito", "Negroni", "Negroni"]);
  }
}
