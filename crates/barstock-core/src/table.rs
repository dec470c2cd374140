//! A fully materialised query result.
//!
//! [`Table`] is what an arbitrary `SELECT` becomes once it has been read into
//! memory. Each query call returns its own table; nothing is cached.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single cell, mirroring SQLite's storage classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

impl Value {
  pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

  /// Numeric view of the cell. Text is parsed; `Null` and unparseable text
  /// yield `None`.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Null => None,
      Value::Integer(i) => Some(*i as f64),
      Value::Real(r) => Some(*r),
      Value::Text(s) => s.trim().parse().ok(),
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => Ok(()),
      Value::Integer(i) => write!(f, "{i}"),
      Value::Real(r) => write!(f, "{r}"),
      Value::Text(s) => f.write_str(s),
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Value::Text(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Value::Text(s) }
}

impl From<i64> for Value {
  fn from(i: i64) -> Self { Value::Integer(i) }
}

impl From<f64> for Value {
  fn from(r: f64) -> Self { Value::Real(r) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Value::Null, Into::into) }
}

/// Named columns over rectangular rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<Value>>,
}

impl Table {
  pub fn new(columns: Vec<String>) -> Self {
    Self { columns, rows: Vec::new() }
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// `(rows, columns)`, for log lines.
  pub fn shape(&self) -> (usize, usize) { (self.rows.len(), self.columns.len()) }

  pub fn column_index(&self, name: &str) -> Result<usize> {
    self
      .columns
      .iter()
      .position(|c| c == name)
      .ok_or_else(|| Error::MissingColumn(name.to_owned()))
  }

  /// Append a row. Short rows are padded with `Null`, long rows truncated.
  pub fn push_row(&mut self, mut row: Vec<Value>) {
    row.resize(self.columns.len(), Value::Null);
    self.rows.push(row);
  }
}
