//! Saldo and the procurement shortfall list.
//!
//! `saldo = current_stock_glasses - last_date_consumption`. Rows with a
//! negative saldo are summed per (bar, glass); everything else is dropped.

use std::collections::BTreeMap;

use barstock_core::{Error as TableError, Table, Value};

use crate::Result;

pub const BAR_COLUMN: &str = "bar_name";
pub const GLASS_COLUMN: &str = "glass";
pub const STOCK_COLUMN: &str = "current_stock_glasses";
pub const CONSUMPTION_COLUMN: &str = "last_date_consumption";
pub const SALDO_COLUMN: &str = "saldo_glasses";

/// Saldo for every row; `None` where stock or consumption is missing.
pub fn saldo(table: &Table) -> Result<Vec<Option<f64>>> {
  let stock_idx = table.column_index(STOCK_COLUMN)?;
  let used_idx = table.column_index(CONSUMPTION_COLUMN)?;

  table
    .rows
    .iter()
    .enumerate()
    .map(|(i, row)| -> Result<Option<f64>> {
      let stock = numeric(&row[stock_idx], STOCK_COLUMN, i)?;
      let used = numeric(&row[used_idx], CONSUMPTION_COLUMN, i)?;
      Ok(stock.zip(used).map(|(s, u)| s - u))
    })
    .collect()
}

/// Negative saldo summed per `(bar_name, glass)`, ordered by key.
pub fn procurement(table: &Table) -> Result<Table> {
  let bar = table.column_index(BAR_COLUMN)?;
  let glass = table.column_index(GLASS_COLUMN)?;
  let saldos = saldo(table)?;

  let mut groups: BTreeMap<(String, String), f64> = BTreeMap::new();
  for (row, saldo) in table.rows.iter().zip(saldos) {
    let Some(saldo) = saldo.filter(|s| *s < 0.0) else {
      continue;
    };
    if row[bar].is_null() || row[glass].is_null() {
      continue;
    }
    *groups
      .entry((row[bar].to_string(), row[glass].to_string()))
      .or_default() += saldo;
  }

  let mut out = Table::new(vec![
    BAR_COLUMN.to_owned(),
    GLASS_COLUMN.to_owned(),
    SALDO_COLUMN.to_owned(),
  ]);
  for ((bar, glass), saldo) in groups {
    out.push_row(vec![Value::Text(bar), Value::Text(glass), Value::Real(saldo)]);
  }
  Ok(out)
}

fn numeric(v: &Value, column: &str, row: usize) -> Result<Option<f64>> {
  if v.is_null() {
    return Ok(None);
  }
  v.as_f64()
    .map(Some)
    .ok_or_else(|| TableError::NotNumeric { column: column.to_owned(), row }.into())
}
