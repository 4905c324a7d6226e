use chrono::NaiveDate;
use storage::StorageError;
use thiserror::Error;

use crate::scan_date::ScanDateError;

/// Run-fatal failures. Per-symbol problems never surface here; they are counted in the summary.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to list symbols: {0}")]
    Fetch(#[source] StorageError),
    #[error("Failed to write results for {scan_date}: {source}")]
    Write {
        scan_date: NaiveDate,
        #[source]
        source: StorageError,
    },
    #[error("Run cancelled, nothing was written")]
    Cancelled,
    #[error(transparent)]
    ScanDate(#[from] ScanDateError),
}
