//! Typed identifiers for the dimension and fact tables.
//!
//! Every table and column name the pipeline writes to is resolved here, at
//! compile time, rather than substituted into SQL from string-keyed maps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A natural-key dimension: a table of `(id, name)` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
  Bar,
  Drink,
  GlassType,
}

impl Dimension {
  pub const ALL: [Dimension; 3] =
    [Dimension::Bar, Dimension::Drink, Dimension::GlassType];

  /// Table holding the dimension rows.
  pub fn table(self) -> &'static str {
    match self {
      Dimension::Bar => "bars",
      Dimension::Drink => "drinks",
      Dimension::GlassType => "glasstype",
    }
  }

  /// Foreign-key column that fact rows use to reference this dimension.
  pub fn key_column(self) -> &'static str {
    match self {
      Dimension::Bar => "bars_id",
      Dimension::Drink => "drink_id",
      Dimension::GlassType => "glass_type_id",
    }
  }
}

impl fmt::Display for Dimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.table())
  }
}

/// An append-only fact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
  Transaction,
  Stock,
}

impl FactKind {
  pub fn table(self) -> &'static str {
    match self {
      FactKind::Transaction => "bars_transactions",
      FactKind::Stock => "stocks",
    }
  }

  /// Canonical names bound to the three retained input columns.
  pub fn columns(self) -> [&'static str; 3] {
    match self {
      FactKind::Transaction => ["datetime", "drink_id", "amount"],
      FactKind::Stock => ["glass_type_id", "stock", "bars_id"],
    }
  }
}

impl fmt::Display for FactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.table())
  }
}
