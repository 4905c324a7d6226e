use async_trait::async_trait;
use chrono::NaiveDate;
use common::models::Bar;
use tracing::debug;

use crate::db::Database;
use crate::error::StorageError;
use crate::repositories::BarsRepository;
use crate::traits::BarSource;

/// `BarSource` over the `daily_bars` table.
#[derive(Clone, Debug)]
pub struct SqliteBarSource {
    db: Database,
    max_bars: u32,
}

impl SqliteBarSource {
    pub fn new(db: Database, max_bars: u32) -> Self {
        Self { db, max_bars }
    }
}

#[async_trait]
impl BarSource for SqliteBarSource {
    async fn list_symbols(&self) -> Result<Vec<String>, StorageError> {
        Ok(BarsRepository::list_symbols(self.db.pool()).await?)
    }

    async fn get_bars(&self, symbol: &str, as_of: NaiveDate) -> Result<Vec<Bar>, StorageError> {
        let bars = BarsRepository::recent_bars(self.db.pool(), symbol, as_of, self.max_bars).await?;
        if bars.is_empty() {
            return Err(StorageError::SymbolNotFound(symbol.to_string()));
        }
        debug!("Fetched {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}
