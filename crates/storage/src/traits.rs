use async_trait::async_trait;
use chrono::NaiveDate;
use common::models::{Bar, SignalRecord};

use crate::error::StorageError;

/// Read-only access to historical daily bars.
#[async_trait]
pub trait BarSource: Send + Sync {
    async fn list_symbols(&self) -> Result<Vec<String>, StorageError>;

    /// Bars dated on or before `as_of`, oldest first.
    async fn get_bars(&self, symbol: &str, as_of: NaiveDate) -> Result<Vec<Bar>, StorageError>;
}

/// The single writer of `scanner_results`.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Replaces every row of `scan_date` with `records` in one step and returns the rows written.
    async fn replace_for_date(
        &self,
        scan_date: NaiveDate,
        records: &[SignalRecord],
    ) -> Result<u64, StorageError>;
}
