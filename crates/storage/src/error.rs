use chrono::NaiveDate;
use common::models::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),
    #[error("Record for {symbol} is dated {found}, batch is for {expected}")]
    ScanDateMismatch {
        symbol: String,
        expected: NaiveDate,
        found: NaiveDate,
    },
    #[error("Unreadable scanner_results row: {0}")]
    Decode(#[from] ParseError),
}
