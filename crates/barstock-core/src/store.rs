//! The `BarStore` trait: the relational sink and dimension mapper contract.
//!
//! Implemented by storage backends (e.g. `barstock-store-sqlite`). The
//! enricher, report builder and orchestrator depend on this abstraction, not
//! on a concrete backend.

use std::{collections::HashMap, future::Future};

use chrono::NaiveDateTime;

use crate::{
  dimension::{Dimension, FactKind},
  record::{Drink, StockRecord, TransactionRecord},
  table::Table,
};

/// Abstraction over the relational store the pipeline loads into.
///
/// Dimension rows and fact rows are never updated or deleted; the only
/// mutation of an existing row is back-filling `Drink::glass_type_id`.
pub trait BarStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Scripts and ad-hoc queries ────────────────────────────────────────

  /// Run a DDL/DML script (possibly several statements) and commit it.
  fn execute_script(
    &self,
    sql: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Run an arbitrary `SELECT` and read the full result into memory.
  fn query_table(
    &self,
    sql: String,
  ) -> impl Future<Output = Result<Table, Self::Error>> + Send + '_;

  /// `SELECT count(*)` over a fact table.
  fn count(
    &self,
    kind: FactKind,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Dimensions ────────────────────────────────────────────────────────

  /// Insert every name not already present in `dimension`, by exact match.
  /// Names already present are skipped, never duplicated. Returns the number
  /// of rows inserted.
  fn resolve_or_insert(
    &self,
    dimension: Dimension,
    names: Vec<String>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// The full, freshly-queried `name → id` mapping for `dimension`.
  fn lookup_map(
    &self,
    dimension: Dimension,
  ) -> impl Future<Output = Result<HashMap<String, i64>, Self::Error>> + Send + '_;

  // ── Facts: append-only writes ─────────────────────────────────────────

  /// Insert the transactions of one bar, creating the bar and any unseen
  /// drinks first. Returns the number of fact rows written.
  fn insert_bar_transactions(
    &self,
    bar: String,
    records: Vec<TransactionRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Insert stock readings stamped with `modified_on`, creating unseen bars
  /// and glass types first. Returns the number of fact rows written.
  fn insert_stocks(
    &self,
    records: Vec<StockRecord>,
    modified_on: NaiveDateTime,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Enrichment ────────────────────────────────────────────────────────

  /// Drinks whose `glass_type_id` is still `NULL`.
  fn drinks_missing_glass_type(
    &self,
  ) -> impl Future<Output = Result<Vec<Drink>, Self::Error>> + Send + '_;

  /// Upsert `(id, name, glass_type_id)` keyed on id; an existing row keeps
  /// its id and name and only takes the new `glass_type_id`. Returns the
  /// number of rows written.
  fn upsert_drink_glass_types(
    &self,
    drinks: Vec<Drink>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
