//! Binding loaded columns to a fact schema and coercing their values.
//!
//! Coercion is all-or-nothing: one bad `amount` or `stock` fails the file.
//! An unparseable transaction timestamp is not an error; the row is kept with
//! no timestamp.

use barstock_core::{
  FactKind,
  record::{StockRecord, TransactionRecord},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{Error, LoadedTable, Result, TABLE_WIDTH};

const DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %I:%M:%S %p",
  "%Y-%m-%d %I:%M %p",
  "%Y/%m/%d %H:%M:%S",
  "%Y/%m/%d %H:%M",
  "%Y%m%d %H:%M:%S",
  "%Y%m%d %H:%M",
  "%Y%m%dT%H%M%S",
  "%d.%m.%Y %H:%M:%S",
  "%d.%m.%Y %H:%M",
  "%m/%d/%Y %H:%M:%S",
  "%m/%d/%Y %H:%M",
  "%m/%d/%Y %I:%M:%S %p",
  "%m/%d/%Y %I:%M %p",
  "%b %d, %Y %H:%M:%S",
  "%b %d, %Y %H:%M",
  "%b %d, %Y %I:%M %p",
  "%d %b %Y %H:%M:%S",
  "%d %b %Y %H:%M",
];

/// Formats carrying a UTC offset; the wall-clock time is kept as written.
const OFFSET_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S%.f%z",
  "%Y-%m-%d %H:%M:%S%.f %z",
  "%Y-%m-%dT%H:%M:%S%.f%z",
  "%Y-%m-%d %H:%M%z",
  "%Y-%m-%dT%H:%M%z",
];

const DATE_FORMATS: &[&str] = &[
  "%Y-%m-%d",
  "%Y/%m/%d",
  "%Y%m%d",
  "%d.%m.%Y",
  "%m/%d/%Y",
  "%b %d, %Y",
  "%d %b %Y",
];

/// Zone names that only restate UTC.
const UTC_SUFFIXES: &[&str] = &[" UTC", " GMT", "Z"];

/// Bind `(datetime, drink_id, amount)` and coerce amounts to `f64`.
pub fn clean_transactions(table: LoadedTable) -> Result<Vec<TransactionRecord>> {
  let [_, _, amount_col] = FactKind::Transaction.columns();
  check_shape(&table)?;

  let records = table
    .rows
    .into_iter()
    .enumerate()
    .map(|(i, row)| -> Result<TransactionRecord> {
      let [datetime, drink, amount]: [String; TABLE_WIDTH] = into_triple(row);
      let amount = leading_token(&amount)
        .and_then(|t| t.parse::<f64>().ok())
        .ok_or(Error::Coercion { column: amount_col, row: i + 1, value: amount })?;
      Ok(TransactionRecord { datetime: parse_datetime(&datetime), drink, amount })
    })
    .collect::<Result<Vec<_>>>()?;

  tracing::debug!("Got next table for {} - ({}, 3)", FactKind::Transaction, records.len());
  Ok(records)
}

/// Bind `(glass_type_id, stock, bars_id)` and coerce stock to `i64`.
///
/// Glass type names are lower-cased so they share keys with names resolved
/// from the cocktail catalogue.
pub fn clean_stocks(table: LoadedTable) -> Result<Vec<StockRecord>> {
  let [_, stock_col, _] = FactKind::Stock.columns();
  check_shape(&table)?;

  let records = table
    .rows
    .into_iter()
    .enumerate()
    .map(|(i, row)| -> Result<StockRecord> {
      let [glass_type, stock, bar]: [String; TABLE_WIDTH] = into_triple(row);
      let stock = leading_token(&stock)
        .and_then(|t| t.parse::<i64>().ok())
        .ok_or(Error::Coercion { column: stock_col, row: i + 1, value: stock })?;
      Ok(StockRecord { glass_type: glass_type.to_lowercase(), stock, bar })
    })
    .collect::<Result<Vec<_>>>()?;

  tracing::debug!("Got next table for {} - ({}, 3)", FactKind::Stock, records.len());
  Ok(records)
}

/// First whitespace-delimited token: `"12 units"` → `"12"`.
pub fn leading_token(s: &str) -> Option<&str> { s.split_whitespace().next() }

/// Lenient timestamp parsing; `None` when no known format matches.
///
/// Values with an explicit offset keep their local wall-clock time, so a sale
/// stays on the calendar day it was rung up.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
  let s = s.trim();
  if s.is_empty() {
    return None;
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.naive_local());
  }
  if let Some(dt) = OFFSET_FORMATS
    .iter()
    .find_map(|f| DateTime::parse_from_str(s, f).ok())
  {
    return Some(dt.naive_local());
  }

  let s = UTC_SUFFIXES
    .iter()
    .find_map(|z| s.strip_suffix(z))
    .map_or(s, str::trim_end);
  DATETIME_FORMATS
    .iter()
    .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    .or_else(|| {
      DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

fn check_shape(table: &LoadedTable) -> Result<()> {
  if table.width < TABLE_WIDTH {
    return Err(Error::TooFewColumns { found: table.width });
  }
  if table.is_empty() {
    return Err(Error::Empty);
  }
  Ok(())
}

fn into_triple(row: Vec<String>) -> [String; TABLE_WIDTH] {
  let mut it = row.into_iter();
  std::array::from_fn(|_| it.next().unwrap_or_default())
}
