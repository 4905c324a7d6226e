use async_trait::async_trait;
use chrono::NaiveDate;
use common::models::SignalRecord;
use tracing::info;

use crate::date_locks::DateLocks;
use crate::db::Database;
use crate::error::StorageError;
use crate::repositories::ScannerResultsRepository;
use crate::traits::ResultSink;

/// Sole writer of `scanner_results`. Writes for one scan date are serialized.
#[derive(Clone, Debug)]
pub struct ResultsWriter {
    db: Database,
    locks: DateLocks,
}

impl ResultsWriter {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            locks: DateLocks::new(),
        }
    }
}

#[async_trait]
impl ResultSink for ResultsWriter {
    async fn replace_for_date(
        &self,
        scan_date: NaiveDate,
        records: &[SignalRecord],
    ) -> Result<u64, StorageError> {
        let _guard = self.locks.lock(scan_date).await;
        let written =
            ScannerResultsRepository::replace_for_date(self.db.pool(), scan_date, records).await?;
        info!("Saved {} scanner results for {}", written, scan_date);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{ScannerName, Signal};
    use std::collections::BTreeSet;

    fn batch(symbols: &[&str], date: NaiveDate) -> Vec<SignalRecord> {
        symbols
            .iter()
            .map(|s| SignalRecord::new(*s, ScannerName::ExplosiveVolume3x, Signal::Bullish, 70.0, date))
            .collect()
    }

    #[tokio::test]
    async fn test_concurrent_writes_for_one_date_never_mix() {
        let db = Database::in_memory().await.unwrap();
        let writer = ResultsWriter::new(db.clone());
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();

        let first = batch(&["AAPL", "MSFT", "NVDA"], date);
        let second = batch(&["TSLA", "AMD"], date);

        let (w1, w2) = (writer.clone(), writer.clone());
        let (f1, f2) = (first.clone(), second.clone());
        let a = tokio::spawn(async move { w1.replace_for_date(date, &f1).await });
        let b = tokio::spawn(async move { w2.replace_for_date(date, &f2).await });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let stored: BTreeSet<String> = ScannerResultsRepository::for_date(db.pool(), date)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.symbol)
            .collect();
        let first_set: BTreeSet<String> = first.into_iter().map(|r| r.symbol).collect();
        let second_set: BTreeSet<String> = second.into_iter().map(|r| r.symbol).collect();

        assert!(stored == first_set || stored == second_set);
    }
}
