use chrono::NaiveDate;
use common::models::Bar;
use sqlx::SqlitePool;

type BarRow = (
    NaiveDate,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
);

pub struct BarsRepository;

impl BarsRepository {
    /// Upserts bars keyed by (symbol, date).
    pub async fn insert_batch(pool: &SqlitePool, bars: &[Bar]) -> Result<(), sqlx::Error> {
        if bars.is_empty() {
            return Ok(());
        }

        let mut tx = pool.begin().await?;

        for bar in bars {
            sqlx::query(
                r#"
                    INSERT INTO daily_bars (symbol, date, open, high, low, close, volume)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    ON CONFLICT(symbol, date) DO UPDATE SET
                        open = excluded.open,
                        high = excluded.high,
                        low = excluded.low,
                        close = excluded.close,
                        volume = excluded.volume
                "#,
            )
            .bind(&bar.symbol)
            .bind(bar.date)
            .bind(bar.open)
            .bind(bar.high)
            .bind(bar.low)
            .bind(bar.close)
            .bind(bar.volume)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_symbols(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT symbol FROM daily_bars ORDER BY symbol")
            .fetch_all(pool)
            .await
    }

    /// The `limit` most recent bars on or before `as_of`, returned oldest first.
    /// NULL cells come back as NaN so the scanners can reject them.
    pub async fn recent_bars(
        pool: &SqlitePool,
        symbol: &str,
        as_of: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Bar>, sqlx::Error> {
        let rows = sqlx::query_as::<_, BarRow>(
            r#"
                SELECT date, open, high, low, close, volume
                FROM daily_bars
                WHERE symbol = ? AND date <= ?
                ORDER BY date DESC
                LIMIT ?
            "#,
        )
        .bind(symbol)
        .bind(as_of)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;

        let mut bars: Vec<Bar> = rows
            .into_iter()
            .map(|(date, open, high, low, close, volume)| Bar {
                symbol: symbol.to_string(),
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(f64::NAN),
            })
            .collect();
        bars.reverse();
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn bar(symbol: &str, day: u32, close: f64) -> Bar {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        Bar::new(symbol, date, close, close + 1.0, close - 1.0, close, 1_000.0)
    }

    #[tokio::test]
    async fn test_recent_bars_are_ordered_and_limited() {
        let db = Database::in_memory().await.unwrap();
        let bars: Vec<Bar> = (1..=10).map(|d| bar("AAPL", d, 100.0 + d as f64)).collect();
        BarsRepository::insert_batch(db.pool(), &bars).await.unwrap();

        let as_of = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        let fetched = BarsRepository::recent_bars(db.pool(), "AAPL", as_of, 5)
            .await
            .unwrap();

        let days: Vec<u32> = fetched.iter().map(|b| chrono::Datelike::day(&b.date)).collect();
        assert_eq!(days, vec![4, 5, 6, 7, 8]);
        assert_eq!(fetched[4].close, 108.0);
        assert_eq!(fetched[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_insert_batch_upserts_and_lists_symbols() {
        let db = Database::in_memory().await.unwrap();
        BarsRepository::insert_batch(db.pool(), &[bar("MSFT", 1, 10.0), bar("AAPL", 1, 20.0)])
            .await
            .unwrap();
        BarsRepository::insert_batch(db.pool(), &[bar("MSFT", 1, 11.0)])
            .await
            .unwrap();

        let symbols = BarsRepository::list_symbols(db.pool()).await.unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);

        let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let msft = BarsRepository::recent_bars(db.pool(), "MSFT", as_of, 10)
            .await
            .unwrap();
        assert_eq!(msft.len(), 1);
        assert_eq!(msft[0].close, 11.0);
    }

    #[tokio::test]
    async fn test_null_cells_decode_as_nan() {
        let db = Database::in_memory().await.unwrap();
        sqlx::query("INSERT INTO daily_bars (symbol, date, open, high, low, close, volume) VALUES ('BAD', '2025-03-03', 1.0, 2.0, 0.5, NULL, 100.0)")
            .execute(db.pool())
            .await
            .unwrap();

        let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let bars = BarsRepository::recent_bars(db.pool(), "BAD", as_of, 10)
            .await
            .unwrap();
        assert_eq!(bars.len(), 1);
        assert!(bars[0].close.is_nan());
        assert!(!bars[0].is_finite());
    }
}
