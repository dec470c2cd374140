//! Encoding helpers between domain values and SQLite column values.
//!
//! Timestamps are stored as ISO 8601 text without an offset. Stock readings
//! carry a fixed six-digit fraction so that `MAX(modifiedon)` orders them
//! correctly as text.

use barstock_core::Value;
use chrono::NaiveDateTime;
use rusqlite::types::ValueRef;

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: NaiveDateTime) -> String {
  dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn encode_stamp(dt: NaiveDateTime) -> String {
  dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

// ─── Value ───────────────────────────────────────────────────────────────────

pub fn decode_value(v: ValueRef<'_>) -> Value {
  match v {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => Value::Integer(i),
    ValueRef::Real(r) => Value::Real(r),
    ValueRef::Text(t) | ValueRef::Blob(t) => {
      Value::Text(String::from_utf8_lossy(t).into_owned())
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn timestamps() {
    let dt = NaiveDate::from_ymd_opt(2024, 2, 29)
      .unwrap()
      .and_hms_micro_opt(23, 5, 7, 42)
      .unwrap();
    assert_eq!(encode_dt(dt), "2024-02-29T23:05:07");
    assert_eq!(encode_stamp(dt), "2024-02-29T23:05:07.000042");
  }

  #[test]
  fn values() {
    assert_eq!(decode_value(ValueRef::Null), Value::Null);
    assert_eq!(decode_value(ValueRef::Integer(4)), Value::Integer(4));
    assert_eq!(decode_value(ValueRef::Text(b"pint")), Value::Text("pint".into()));
  }
}
