//! Integration tests for `SqliteStore` against an on-disk database.
//!
//! Every store operation opens its own connection, so an in-memory database
//! would vanish between calls; each test gets a fresh temporary file instead.

use barstock_core::{
  Dimension, FactKind, Value,
  record::{Drink, StockRecord, TransactionRecord},
  store::BarStore,
};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use crate::{Error, GENERAL_STATS_QUERY, SqliteStore};

async fn store() -> (TempDir, SqliteStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = SqliteStore::new(dir.path().join("bars.db"));
  store.init_default_schema().await.expect("schema");
  (dir, store)
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2024, 3, day)
    .unwrap()
    .and_hms_opt(hour, 0, 0)
    .unwrap()
}

fn sale(day: u32, drink: &str, amount: f64) -> TransactionRecord {
  TransactionRecord {
    datetime: Some(at(day, 20)),
    drink:    drink.into(),
    amount,
  }
}

fn stock(glass: &str, stock: i64, bar: &str) -> StockRecord {
  StockRecord { glass_type: glass.into(), stock, bar: bar.into() }
}

fn names(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }

// ─── Scripts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_is_idempotent() {
  let (_dir, s) = store().await;
  s.init_default_schema().await.unwrap();
  assert_eq!(s.count(FactKind::Transaction).await.unwrap(), 0);
  assert_eq!(s.count(FactKind::Stock).await.unwrap(), 0);
  for dimension in Dimension::ALL {
    assert!(s.lookup_map(dimension).await.unwrap().is_empty());
  }
}

#[tokio::test]
async fn bad_script_reports_failure() {
  let (_dir, s) = store().await;
  let err = s.execute_script("CREATE TABLE (".into()).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn query_table_materialises_columns_and_rows() {
  let (_dir, s) = store().await;
  let t = s
    .query_table("SELECT 1 AS one, 'two' AS two, NULL AS three, 4.5 AS four".into())
    .await
    .unwrap();
  assert_eq!(t.columns, vec!["one", "two", "three", "four"]);
  assert_eq!(t.rows, vec![vec![
    Value::Integer(1),
    Value::Text("two".into()),
    Value::Null,
    Value::Real(4.5),
  ]]);
}

#[tokio::test]
async fn query_table_failure_is_an_error() {
  let (_dir, s) = store().await;
  assert!(s.query_table("SELECT * FROM nowhere".into()).await.is_err());
}

// ─── Dimensions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_or_insert_never_duplicates() {
  let (_dir, s) = store().await;

  let n = s
    .resolve_or_insert(Dimension::Bar, names(&["london", "london", "budapest"]))
    .await
    .unwrap();
  assert_eq!(n, 2);

  let n = s
    .resolve_or_insert(Dimension::Bar, names(&["london"]))
    .await
    .unwrap();
  assert_eq!(n, 0);

  let map = s.lookup_map(Dimension::Bar).await.unwrap();
  assert_eq!(map.len(), 2);
  assert!(map.contains_key("london"));
  assert!(map.contains_key("budapest"));
}

#[tokio::test]
async fn names_are_case_sensitive() {
  let (_dir, s) = store().await;
  s.resolve_or_insert(Dimension::Drink, names(&["Mojito", "mojito"]))
    .await
    .unwrap();
  let map = s.lookup_map(Dimension::Drink).await.unwrap();
  assert_eq!(map.len(), 2);
  assert_ne!(map["Mojito"], map["mojito"]);
}

#[tokio::test]
async fn lookup_map_sees_later_inserts() {
  let (_dir, s) = store().await;
  assert!(s.lookup_map(Dimension::GlassType).await.unwrap().is_empty());

  s.resolve_or_insert(Dimension::GlassType, names(&["highball glass"]))
    .await
    .unwrap();
  let map = s.lookup_map(Dimension::GlassType).await.unwrap();
  assert_eq!(map.len(), 1);
  assert!(map.contains_key("highball glass"));
}

#[tokio::test]
async fn empty_name_list_is_a_no_op() {
  let (_dir, s) = store().await;
  assert_eq!(s.resolve_or_insert(Dimension::Bar, vec![]).await.unwrap(), 0);
}

// ─── Facts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn transactions_create_bar_and_drinks() {
  let (_dir, s) = store().await;

  let n = s
    .insert_bar_transactions("london".into(), vec![
      sale(1, "Mojito", 2.0),
      sale(1, "Negroni", 1.0),
      sale(2, "Mojito", 3.0),
    ])
    .await
    .unwrap();
  assert_eq!(n, 3);
  assert_eq!(s.count(FactKind::Transaction).await.unwrap(), 3);

  let bars = s.lookup_map(Dimension::Bar).await.unwrap();
  assert_eq!(bars.len(), 1);
  let drinks = s.lookup_map(Dimension::Drink).await.unwrap();
  assert_eq!(drinks.len(), 2);

  // A second file for the same bar reuses its id.
  s.insert_bar_transactions("london".into(), vec![sale(3, "Mojito", 1.0)])
    .await
    .unwrap();
  assert_eq!(s.lookup_map(Dimension::Bar).await.unwrap(), bars);
  assert_eq!(s.lookup_map(Dimension::Drink).await.unwrap(), drinks);
}

#[tokio::test]
async fn unparseable_datetime_is_stored_as_null() {
  let (_dir, s) = store().await;
  let mut r = sale(1, "Mojito", 1.0);
  r.datetime = None;
  s.insert_bar_transactions("ny".into(), vec![r]).await.unwrap();

  let t = s
    .query_table("SELECT datetime, amount FROM bars_transactions".into())
    .await
    .unwrap();
  assert_eq!(t.rows, vec![vec![Value::Null, Value::Real(1.0)]]);
}

#[tokio::test]
async fn stocks_create_bars_and_glass_types() {
  let (_dir, s) = store().await;
  let n = s
    .insert_stocks(
      vec![stock("highball", 3, "london"), stock("pint", 10, "budapest")],
      at(1, 9),
    )
    .await
    .unwrap();
  assert_eq!(n, 2);
  assert_eq!(s.count(FactKind::Stock).await.unwrap(), 2);
  assert_eq!(s.lookup_map(Dimension::Bar).await.unwrap().len(), 2);
  assert_eq!(s.lookup_map(Dimension::GlassType).await.unwrap().len(), 2);

  let t = s
    .query_table("SELECT modifiedon FROM stocks LIMIT 1".into())
    .await
    .unwrap();
  assert_eq!(t.rows[0][0], Value::Text("2024-03-01T09:00:00.000000".into()));
}

// ─── Enrichment ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_only_changes_glass_type() {
  let (_dir, s) = store().await;
  s.insert_bar_transactions("london".into(), vec![
    sale(1, "Mojito", 1.0),
    sale(1, "Negroni", 1.0),
  ])
  .await
  .unwrap();

  let missing = s.drinks_missing_glass_type().await.unwrap();
  assert_eq!(missing.len(), 2);
  assert!(missing.iter().all(|d| d.glass_type_id.is_none()));

  s.resolve_or_insert(Dimension::GlassType, names(&["highball glass"]))
    .await
    .unwrap();
  let glass_id = s.lookup_map(Dimension::GlassType).await.unwrap()["highball glass"];

  let mojito = missing.iter().find(|d| d.name == "Mojito").unwrap().clone();
  let n = s
    .upsert_drink_glass_types(vec![
      Drink { glass_type_id: Some(glass_id), ..mojito.clone() },
      // Unresolved drinks are skipped.
      Drink { id: 999, name: "Ghost".into(), glass_type_id: None },
    ])
    .await
    .unwrap();
  assert_eq!(n, 1);

  let missing = s.drinks_missing_glass_type().await.unwrap();
  assert_eq!(missing.len(), 1);
  assert_eq!(missing[0].name, "Negroni");

  let t = s
    .query_table(format!(
      "SELECT id, name, glass_type_id FROM drinks WHERE id = {}",
      mojito.id
    ))
    .await
    .unwrap();
  assert_eq!(t.rows, vec![vec![
    Value::Integer(mojito.id),
    Value::Text("Mojito".into()),
    Value::Integer(glass_id),
  ]]);
}

#[tokio::test]
async fn upsert_with_nothing_resolved_writes_nothing() {
  let (_dir, s) = store().await;
  let n = s
    .upsert_drink_glass_types(vec![Drink { id: 1, name: "Mojito".into(), glass_type_id: None }])
    .await
    .unwrap();
  assert_eq!(n, 0);
}

// ─── General stats query ─────────────────────────────────────────────────────

async fn assign_glass(s: &SqliteStore, drink: &str, glass: &str) {
  s.resolve_or_insert(Dimension::GlassType, names(&[glass]))
    .await
    .unwrap();
  let glass_id = s.lookup_map(Dimension::GlassType).await.unwrap()[glass];
  let drink_id = s.lookup_map(Dimension::Drink).await.unwrap()[drink];
  s.upsert_drink_glass_types(vec![Drink {
    id:            drink_id,
    name:          drink.into(),
    glass_type_id: Some(glass_id),
  }])
  .await
  .unwrap();
}

#[tokio::test]
async fn general_stats_round_trip() {
  let (_dir, s) = store().await;
  s.insert_bar_transactions("BarA".into(), vec![
    sale(1, "Mojito", 9.0),
    sale(2, "Mojito", 2.0),
    sale(2, "Mojito", 3.0),
  ])
  .await
  .unwrap();
  assign_glass(&s, "Mojito", "highball").await;
  s.insert_stocks(vec![stock("highball", 7, "BarA")], at(1, 8))
    .await
    .unwrap();
  s.insert_stocks(vec![stock("highball", 3, "BarA")], at(2, 8))
    .await
    .unwrap();

  let t = s.query_table(GENERAL_STATS_QUERY.into()).await.unwrap();
  assert_eq!(t.columns, vec![
    "bar_name",
    "coctail_name",
    "glass",
    "current_stock_glasses",
    "last_date_consumption",
  ]);
  assert_eq!(t.rows, vec![vec![
    Value::Text("BarA".into()),
    Value::Text("Mojito".into()),
    Value::Text("highball".into()),
    Value::Integer(3),
    Value::Real(5.0),
  ]]);
}

#[tokio::test]
async fn general_stats_skips_drinks_without_glass() {
  let (_dir, s) = store().await;
  s.insert_bar_transactions("BarA".into(), vec![sale(1, "Mojito", 1.0)])
    .await
    .unwrap();
  s.insert_stocks(vec![stock("highball", 3, "BarA")], at(1, 8))
    .await
    .unwrap();

  let t = s.query_table(GENERAL_STATS_QUERY.into()).await.unwrap();
  assert!(t.is_empty());
}
