//! The `GlassLookup` trait: search an external cocktail catalogue by name.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// One search hit from the cocktail catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cocktail {
  pub name:  String,
  pub glass: Option<String>,
}

/// A catalogue searchable by drink name.
///
/// A search may return near matches; callers pick the entry whose name is
/// exactly the one they asked for. "Nothing found" is an empty vector, not an
/// error.
pub trait GlassLookup: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn search(
    &self,
    drink_name: String,
  ) -> impl Future<Output = Result<Vec<Cocktail>, Self::Error>> + Send + '_;
}

/// Glass of the first entry whose name equals `drink_name` exactly.
pub fn exact_match_glass<'a>(
  hits: &'a [Cocktail],
  drink_name: &str,
) -> Option<&'a str> {
  hits
    .iter()
    .find(|c| c.name == drink_name)
    .and_then(|c| c.glass.as_deref())
}
