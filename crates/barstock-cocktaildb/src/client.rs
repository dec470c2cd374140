//! Async HTTP client for the cocktail catalogue's JSON API.

use std::time::Duration;

use barstock_core::lookup::{Cocktail, GlassLookup};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// Client for `GET {base_url}/search.php?s=<name>`.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct CocktailDbClient {
  client:   Client,
  base_url: String,
}

impl CocktailDbClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `GET /search.php?s=<name>`, spaces in the name sent as underscores.
  pub async fn search_by_name(&self, drink_name: &str) -> Result<Vec<Cocktail>> {
    let query = drink_name.replace(' ', "_");
    tracing::debug!(drink = drink_name, "GET /search.php?s={query}");

    let resp = self
      .client
      .get(self.url("/search.php"))
      .query(&[("s", query.as_str())])
      .send()
      .await?;

    if resp.status() != StatusCode::OK {
      return Err(Error::Status(resp.status()));
    }
    let body: SearchResponse = resp.json().await?;
    Ok(body.into_cocktails())
  }
}

impl GlassLookup for CocktailDbClient {
  type Error = Error;

  async fn search(&self, drink_name: String) -> Result<Vec<Cocktail>> {
    self.search_by_name(&drink_name).await
  }
}

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchResponse {
  #[serde(default)]
  drinks: Option<Drinks>,
}

/// `drinks` is an array on a hit and `null` (or occasionally a string) on a
/// miss.
#[derive(Deserialize)]
#[serde(untagged)]
enum Drinks {
  List(Vec<RawDrink>),
  Other(serde_json::Value),
}

#[derive(Deserialize)]
struct RawDrink {
  #[serde(rename = "strDrink")]
  name:  Option<String>,
  #[serde(rename = "strGlass")]
  glass: Option<String>,
}

impl SearchResponse {
  fn into_cocktails(self) -> Vec<Cocktail> {
    let Some(Drinks::List(drinks)) = self.drinks else {
      return Vec::new();
    };
    drinks
      .into_iter()
      .filter_map(|d| d.name.map(|name| Cocktail { name, glass: d.glass }))
      .collect()
  }
}

/// Decode a search response body into catalogue entries.
pub fn parse_search(body: &str) -> Result<Vec<Cocktail>> {
  let resp: SearchResponse = serde_json::from_str(body)?;
  Ok(resp.into_cocktails())
}
