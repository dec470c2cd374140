//! [`SqliteStore`], the SQLite implementation of [`BarStore`].

use std::{
  collections::{BTreeSet, HashMap},
  path::{Path, PathBuf},
};

use barstock_core::{
  Dimension, FactKind, Table,
  record::{Drink, StockRecord, TransactionRecord},
  store::BarStore,
};
use chrono::NaiveDateTime;

use crate::{
  Error, Result,
  encode::{decode_value, encode_dt, encode_stamp},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A bar stock store backed by a single SQLite file.
///
/// Holds only the path. Each operation opens a fresh connection and closes it
/// before returning, so there is never more than one open handle per call.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// Create the bundled default tables.
  pub async fn init_default_schema(&self) -> Result<()> {
    self.execute_script(SCHEMA.to_owned()).await
  }

  /// Open a connection, run `f` on it, close it.
  async fn with_conn<F, R>(&self, what: &'static str, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let result = async {
      let conn = tokio_rusqlite::Connection::open(&self.path).await?;
      let out = conn.call(f).await?;
      conn.close().await?;
      Ok::<_, tokio_rusqlite::Error>(out)
    }
    .await;

    result.map_err(|e| {
      tracing::warn!(db = %self.path.display(), "Problem with {what}: {e}");
      Error::Database(e)
    })
  }

  fn resolve(
    map: &HashMap<String, i64>,
    dimension: Dimension,
    name: &str,
  ) -> Result<i64> {
    map.get(name).copied().ok_or_else(|| Error::UnresolvedName {
      dimension,
      name: name.to_owned(),
    })
  }
}

fn unique(names: impl IntoIterator<Item = String>) -> Vec<String> {
  names.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

// ─── BarStore impl ───────────────────────────────────────────────────────────

impl BarStore for SqliteStore {
  type Error = Error;

  // ── Scripts and ad-hoc queries ────────────────────────────────────────────

  async fn execute_script(&self, sql: String) -> Result<()> {
    tracing::debug!("executing script:\n{sql}");
    self
      .with_conn("query to DB", move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await
  }

  async fn query_table(&self, sql: String) -> Result<Table> {
    self
      .with_conn("retrieving data from DB", move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> =
          stmt.column_names().into_iter().map(str::to_owned).collect();
        let width = columns.len();
        let mut table = Table::new(columns);

        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
          let values = (0..width)
            .map(|i| row.get_ref(i).map(decode_value))
            .collect::<rusqlite::Result<Vec<_>>>()?;
          table.push_row(values);
        }
        Ok(table)
      })
      .await
  }

  async fn count(&self, kind: FactKind) -> Result<i64> {
    let sql = format!("SELECT count(*) AS total_count FROM {}", kind.table());
    self
      .with_conn("counting rows", move |conn| {
        Ok(conn.query_row(&sql, [], |r| r.get(0))?)
      })
      .await
  }

  // ── Dimensions ────────────────────────────────────────────────────────────

  async fn resolve_or_insert(&self, dimension: Dimension, names: Vec<String>) -> Result<usize> {
    if names.is_empty() {
      return Ok(0);
    }
    let names = unique(names);
    let sql = format!(
      "INSERT INTO {t} (name)
       SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM {t} WHERE name = ?1)",
      t = dimension.table(),
    );

    let inserted = self
      .with_conn("inserting dimension names", move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(&sql)?;
          for name in &names {
            inserted += stmt.execute(rusqlite::params![name])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    if inserted > 0 {
      tracing::info!("Inserted {inserted} new name(s) into {dimension}");
    }
    Ok(inserted)
  }

  async fn lookup_map(&self, dimension: Dimension) -> Result<HashMap<String, i64>> {
    let sql = format!("SELECT name, id FROM {}", dimension.table());
    self
      .with_conn("retrieving map from DB", move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let pairs = stmt
          .query_map([], |row| {
            Ok((row.get::<_, Option<String>>(0)?, row.get::<_, i64>(1)?))
          })?
          .filter_map(|r| r.map(|(name, id)| name.map(|n| (n, id))).transpose())
          .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(pairs)
      })
      .await
  }

  // ── Facts: append-only writes ─────────────────────────────────────────────

  async fn insert_bar_transactions(
    &self,
    bar:     String,
    records: Vec<TransactionRecord>,
  ) -> Result<usize> {
    self.resolve_or_insert(Dimension::Bar, vec![bar.clone()]).await?;
    let bars = self.lookup_map(Dimension::Bar).await?;
    let bar_id = Self::resolve(&bars, Dimension::Bar, &bar)?;

    self
      .resolve_or_insert(Dimension::Drink, unique(records.iter().map(|r| r.drink.clone())))
      .await?;
    let drinks = self.lookup_map(Dimension::Drink).await?;

    let rows = records
      .iter()
      .map(|r| -> Result<_> {
        Ok((
          r.datetime.map(encode_dt),
          Self::resolve(&drinks, Dimension::Drink, &r.drink)?,
          r.amount,
        ))
      })
      .collect::<Result<Vec<_>>>()?;

    let sql = format!(
      "INSERT INTO {} (datetime, {}, amount, {}) VALUES (?1, ?2, ?3, ?4)",
      FactKind::Transaction.table(),
      Dimension::Drink.key_column(),
      Dimension::Bar.key_column(),
    );
    self
      .with_conn("inserting transactions", move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(&sql)?;
          for (datetime, drink_id, amount) in &rows {
            stmt.execute(rusqlite::params![datetime, drink_id, amount, bar_id])?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await
  }

  async fn insert_stocks(
    &self,
    records:     Vec<StockRecord>,
    modified_on: NaiveDateTime,
  ) -> Result<usize> {
    self
      .resolve_or_insert(Dimension::Bar, unique(records.iter().map(|r| r.bar.clone())))
      .await?;
    let bars = self.lookup_map(Dimension::Bar).await?;

    self
      .resolve_or_insert(
        Dimension::GlassType,
        unique(records.iter().map(|r| r.glass_type.clone())),
      )
      .await?;
    let glasses = self.lookup_map(Dimension::GlassType).await?;

    let rows = records
      .iter()
      .map(|r| -> Result<_> {
        Ok((
          Self::resolve(&glasses, Dimension::GlassType, &r.glass_type)?,
          r.stock,
          Self::resolve(&bars, Dimension::Bar, &r.bar)?,
        ))
      })
      .collect::<Result<Vec<_>>>()?;

    let stamp = encode_stamp(modified_on);
    let sql = format!(
      "INSERT INTO {} ({}, stock, {}, modifiedon) VALUES (?1, ?2, ?3, ?4)",
      FactKind::Stock.table(),
      Dimension::GlassType.key_column(),
      Dimension::Bar.key_column(),
    );
    self
      .with_conn("inserting stocks", move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(&sql)?;
          for (glass_type_id, stock, bars_id) in &rows {
            stmt.execute(rusqlite::params![glass_type_id, stock, bars_id, stamp])?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await
  }

  // ── Enrichment ────────────────────────────────────────────────────────────

  async fn drinks_missing_glass_type(&self) -> Result<Vec<Drink>> {
    self
      .with_conn("retrieving new drinks", |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, glass_type_id
           FROM drinks
           WHERE glass_type_id IS NULL
           ORDER BY id",
        )?;
        let drinks = stmt
          .query_map([], |row| {
            Ok(Drink {
              id:            row.get(0)?,
              name:          row.get(1)?,
              glass_type_id: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(drinks)
      })
      .await
  }

  async fn upsert_drink_glass_types(&self, drinks: Vec<Drink>) -> Result<usize> {
    let rows: Vec<(i64, String, i64)> = drinks
      .into_iter()
      .filter_map(|d| d.glass_type_id.map(|g| (d.id, d.name, g)))
      .collect();
    if rows.is_empty() {
      return Ok(0);
    }

    self
      .with_conn("upserting drinks", move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO drinks (id, name, glass_type_id)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id)
             DO UPDATE SET glass_type_id = excluded.glass_type_id",
          )?;
          for (id, name, glass_type_id) in &rows {
            stmt.execute(rusqlite::params![id, name, glass_type_id])?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await
  }
}
