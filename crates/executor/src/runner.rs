use std::sync::Arc;

use chrono::NaiveDate;
use common::config::ScanConfig;
use common::models::RunSummary;
use storage::{BarSource, Database, ResultsWriter, SqliteBarSource};
use strategy::Scanner;
use tokio::sync::watch;
use tracing::warn;

use crate::error::RunError;
use crate::scan_date::resolve_scan_date;
use crate::services::scan_service::ScanService;

/// What the `run` command was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    pub date: Option<NaiveDate>,
    pub today: NaiveDate,
    pub backfill: bool,
}

/// One full scan against `db`. `Ok` whenever the results were written, however many
/// symbols were skipped; the binary turns any `Err` into a non-zero exit.
pub async fn run_scan(
    db: &Database,
    config: &ScanConfig,
    request: RunRequest,
    cancel: watch::Receiver<bool>,
) -> Result<RunSummary, RunError> {
    let scan_date = resolve_scan_date(
        request.date,
        request.today,
        config.allow_backfill || request.backfill,
    )?;

    let source = Arc::new(SqliteBarSource::new(db.clone(), config.max_bars));
    let symbols = source.list_symbols().await.map_err(RunError::Fetch)?;
    if symbols.is_empty() {
        warn!("No symbols in daily_bars; the run will clear results for {}", scan_date);
    }

    ScanService::new(source, Arc::new(ResultsWriter::new(db.clone())), Scanner::all())
        .with_concurrency(config.concurrency)
        .with_stale_after(config.stale_after_days)
        .run(&symbols, scan_date, cancel)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use common::config::{DEFAULT_MAX_BARS, DEFAULT_STALE_DAYS};
    use common::models::{Bar, ScannerName};
    use storage::repositories::{BarsRepository, ScannerResultsRepository};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn config() -> ScanConfig {
        ScanConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            concurrency: 2,
            max_bars: DEFAULT_MAX_BARS,
            stale_after_days: DEFAULT_STALE_DAYS,
            allow_backfill: false,
        }
    }

    fn request(date: Option<NaiveDate>, backfill: bool) -> RunRequest {
        RunRequest {
            date,
            today: today(),
            backfill,
        }
    }

    /// 30 flat bars ending on `end` with a 10x volume spike on the last one.
    fn spike(symbol: &str, end: NaiveDate) -> Vec<Bar> {
        (0..30u64)
            .map(|i| {
                let date = end - Days::new(29 - i);
                let volume = if i == 29 { 10_000_000.0 } else { 1_000_000.0 };
                Bar::new(symbol, date, 100.0, 100.5, 99.5, 100.0, volume)
            })
            .collect()
    }

    fn no_cancel() -> watch::Receiver<bool> {
        watch::channel(false).1
    }

    #[tokio::test]
    async fn test_skipped_symbols_still_succeed() {
        let db = Database::in_memory().await.unwrap();
        let scan_date = today() - Days::new(10);
        BarsRepository::insert_batch(db.pool(), &spike("AAPL", scan_date)).await.unwrap();
        // listed after the scan date, so nothing can be fetched for it
        let listed_later = spike("NEWCO", scan_date + Days::new(40));
        BarsRepository::insert_batch(db.pool(), &listed_later).await.unwrap();

        let summary = run_scan(&db, &config(), request(Some(scan_date), true), no_cancel())
            .await
            .unwrap();

        assert_eq!(summary.scan_date, scan_date);
        assert_eq!(summary.symbols_total, 2);
        assert_eq!(summary.symbols_skipped, 1);
        assert_eq!(summary.count_for(ScannerName::ExplosiveVolume10x), 1);
        assert_eq!(
            ScannerResultsRepository::count_for_date(db.pool(), scan_date).await.unwrap(),
            summary.total_signals as i64
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_an_error() {
        let db = Database::in_memory().await.unwrap();
        BarsRepository::insert_batch(db.pool(), &spike("AAPL", today())).await.unwrap();
        sqlx::raw_sql(
            r#"
                CREATE TRIGGER reject_results BEFORE INSERT ON scanner_results
                BEGIN
                    SELECT RAISE(ABORT, 'results table is read-only');
                END;
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = run_scan(&db, &config(), request(None, false), no_cancel())
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Write { scan_date, .. } if scan_date == today()));
    }

    #[tokio::test]
    async fn test_scan_date_rules_apply() {
        let db = Database::in_memory().await.unwrap();

        let future = run_scan(&db, &config(), request(Some(today() + Days::new(1)), true), no_cancel()).await;
        assert!(matches!(future, Err(RunError::ScanDate(_))));

        let past = today() - Days::new(3);
        let refused = run_scan(&db, &config(), request(Some(past), false), no_cancel()).await;
        assert!(matches!(refused, Err(RunError::ScanDate(_))));

        let mut backfill_config = config();
        backfill_config.allow_backfill = true;
        let allowed = run_scan(&db, &backfill_config, request(Some(past), false), no_cancel())
            .await
            .unwrap();
        assert_eq!(allowed.scan_date, past);
        assert_eq!(allowed.symbols_total, 0);
    }
}
