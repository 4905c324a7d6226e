use chrono::NaiveDate;
use common::models::{ScannerName, SignalRecord};
use sqlx::SqlitePool;

use crate::error::StorageError;

type ResultRow = (String, String, String, f64, String, NaiveDate);

/// Overview of the whole results table, as shown on the stats page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsStats {
    pub total_results: i64,
    pub unique_symbols: i64,
    pub num_scanners: i64,
    pub last_scan_date: Option<NaiveDate>,
    pub per_scanner: Vec<(String, i64)>,
    /// The ten most recent scan dates.
    pub per_date: Vec<(NaiveDate, i64)>,
    /// Symbols flagged by more than one scanner, most scanners first.
    pub top_picks: Vec<(String, i64)>,
}

pub struct ScannerResultsRepository;

impl ScannerResultsRepository {
    /// Deletes every row of `scan_date` and inserts `records`, inside one transaction.
    pub async fn replace_for_date(
        pool: &SqlitePool,
        scan_date: NaiveDate,
        records: &[SignalRecord],
    ) -> Result<u64, StorageError> {
        if let Some(stray) = records.iter().find(|r| r.scan_date != scan_date) {
            return Err(StorageError::ScanDateMismatch {
                symbol: stray.symbol.clone(),
                expected: scan_date,
                found: stray.scan_date,
            });
        }

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM scanner_results WHERE scan_date = ?")
            .bind(scan_date)
            .execute(&mut *tx)
            .await?;

        let mut written = 0;
        for record in records {
            written += sqlx::query(
                r#"
                    INSERT INTO scanner_results (
                        symbol, scanner_name, signal, strength, quality, scan_date
                    ) VALUES (?, ?, ?, ?, ?, ?)
                    ON CONFLICT(symbol, scanner_name, scan_date) DO UPDATE SET
                        signal = excluded.signal,
                        strength = excluded.strength,
                        quality = excluded.quality
                "#,
            )
            .bind(&record.symbol)
            .bind(record.scanner_name.as_str())
            .bind(record.signal.as_str())
            .bind(record.strength)
            .bind(record.quality.as_str())
            .bind(record.scan_date)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    /// Rows of one scanner on one date, strongest first.
    pub async fn results_for(
        pool: &SqlitePool,
        scanner: ScannerName,
        scan_date: NaiveDate,
    ) -> Result<Vec<SignalRecord>, StorageError> {
        let rows = sqlx::query_as::<_, ResultRow>(
            r#"
                SELECT symbol, scanner_name, signal, strength, quality, scan_date
                FROM scanner_results
                WHERE scanner_name = ? AND scan_date = ?
                ORDER BY strength DESC, symbol
            "#,
        )
        .bind(scanner.as_str())
        .bind(scan_date)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(decode_row).collect()
    }

    pub async fn for_date(
        pool: &SqlitePool,
        scan_date: NaiveDate,
    ) -> Result<Vec<SignalRecord>, StorageError> {
        let rows = sqlx::query_as::<_, ResultRow>(
            r#"
                SELECT symbol, scanner_name, signal, strength, quality, scan_date
                FROM scanner_results
                WHERE scan_date = ?
                ORDER BY symbol, scanner_name
            "#,
        )
        .bind(scan_date)
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(decode_row).collect()
    }

    pub async fn top_signals(
        pool: &SqlitePool,
        scan_date: NaiveDate,
        limit: u32,
    ) -> Result<Vec<SignalRecord>, StorageError> {
        let rows = sqlx::query_as::<_, ResultRow>(
            r#"
                SELECT symbol, scanner_name, signal, strength, quality, scan_date
                FROM scanner_results
                WHERE scan_date = ?
                ORDER BY strength DESC, symbol, scanner_name
                LIMIT ?
            "#,
        )
        .bind(scan_date)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(decode_row).collect()
    }

    pub async fn latest_scan_date(pool: &SqlitePool) -> Result<Option<NaiveDate>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<NaiveDate>>("SELECT MAX(scan_date) FROM scanner_results")
            .fetch_one(pool)
            .await
    }

    pub async fn count_for_date(pool: &SqlitePool, scan_date: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM scanner_results WHERE scan_date = ?")
            .bind(scan_date)
            .fetch_one(pool)
            .await
    }

    pub async fn stats(pool: &SqlitePool) -> Result<ResultsStats, sqlx::Error> {
        let (total_results, unique_symbols, num_scanners) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
                SELECT COUNT(*), COUNT(DISTINCT symbol), COUNT(DISTINCT scanner_name)
                FROM scanner_results
            "#,
        )
        .fetch_one(pool)
        .await?;

        let last_scan_date = Self::latest_scan_date(pool).await?;

        let per_scanner = sqlx::query_as::<_, (String, i64)>(
            r#"
                SELECT scanner_name, COUNT(*) AS count
                FROM scanner_results
                GROUP BY scanner_name
                ORDER BY count DESC, scanner_name
            "#,
        )
        .fetch_all(pool)
        .await?;

        let per_date = sqlx::query_as::<_, (NaiveDate, i64)>(
            r#"
                SELECT scan_date, COUNT(*)
                FROM scanner_results
                GROUP BY scan_date
                ORDER BY scan_date DESC
                LIMIT 10
            "#,
        )
        .fetch_all(pool)
        .await?;

        let top_picks = sqlx::query_as::<_, (String, i64)>(
            r#"
                SELECT symbol, COUNT(DISTINCT scanner_name) AS scanner_count
                FROM scanner_results
                GROUP BY symbol
                HAVING COUNT(DISTINCT scanner_name) > 1
                ORDER BY scanner_count DESC, symbol
                LIMIT 20
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(ResultsStats {
            total_results,
            unique_symbols,
            num_scanners,
            last_scan_date,
            per_scanner,
            per_date,
            top_picks,
        })
    }
}

fn decode_row(row: ResultRow) -> Result<SignalRecord, StorageError> {
    let (symbol, scanner_name, signal, strength, quality, scan_date) = row;
    Ok(SignalRecord {
        symbol,
        scanner_name: scanner_name.parse()?,
        signal: signal.parse()?,
        strength,
        quality: quality.parse()?,
        scan_date,
    })
}
