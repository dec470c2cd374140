//! Domain records: dimension rows and cleaned fact rows.
//!
//! Fact records still reference their dimensions by natural-key name; the
//! store resolves names to surrogate ids at insert time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ─── Dimensions ──────────────────────────────────────────────────────────────

/// A drink row. `glass_type_id` stays `None` until enrichment resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
  pub id:            i64,
  pub name:          String,
  pub glass_type_id: Option<i64>,
}

// ─── Facts ───────────────────────────────────────────────────────────────────

/// One cleaned point-of-sale line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
  /// `None` when the source value could not be parsed as a date/time.
  pub datetime: Option<NaiveDateTime>,
  pub drink:    String,
  pub amount:   f64,
}

/// One cleaned stock reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
  pub glass_type: String,
  pub stock:      i64,
  pub bar:        String,
}
