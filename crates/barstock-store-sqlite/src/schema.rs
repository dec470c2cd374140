//! Bundled SQL for the bar stock store.
//!
//! The pipeline provisions its tables from the `.SQL` files in its queries
//! directory; [`SCHEMA`] is the copy shipped in this repository.

/// Default DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = include_str!("../../../queries/create_tables.SQL");

/// Current glass stock against the most recent day of consumption.
///
/// One row per (bar, drink, glass). `current_stock_glasses` is the latest
/// stock reading for the bar and glass; `last_date_consumption` is the summed
/// amount of the drink on the bar's most recent transaction date.
pub const GENERAL_STATS_QUERY: &str = "
WITH last_day AS (
    SELECT bars_id, MAX(date(datetime)) AS day
    FROM bars_transactions
    WHERE datetime IS NOT NULL
    GROUP BY bars_id
),
consumption AS (
    SELECT t.bars_id, t.drink_id, SUM(t.amount) AS amount
    FROM bars_transactions t
    JOIN last_day l ON l.bars_id = t.bars_id AND date(t.datetime) = l.day
    GROUP BY t.bars_id, t.drink_id
),
latest_stock AS (
    SELECT s.bars_id, s.glass_type_id, SUM(s.stock) AS stock
    FROM stocks s
    JOIN (
        SELECT bars_id, glass_type_id, MAX(modifiedon) AS at
        FROM stocks
        GROUP BY bars_id, glass_type_id
    ) m ON m.bars_id = s.bars_id
       AND m.glass_type_id = s.glass_type_id
       AND m.at = s.modifiedon
    GROUP BY s.bars_id, s.glass_type_id
)
SELECT
    b.name      AS bar_name,
    d.name      AS coctail_name,
    g.name      AS glass,
    st.stock    AS current_stock_glasses,
    c.amount    AS last_date_consumption
FROM consumption c
JOIN bars         b  ON b.id = c.bars_id
JOIN drinks       d  ON d.id = c.drink_id
JOIN glasstype    g  ON g.id = d.glass_type_id
JOIN latest_stock st ON st.bars_id = c.bars_id AND st.glass_type_id = g.id
ORDER BY b.name, g.name, d.name;
";
