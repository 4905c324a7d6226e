use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use common::config::DEFAULT_STALE_DAYS;
use common::models::{RunSummary, SignalRecord};
use futures_util::{StreamExt, stream};
use storage::{BarSource, ResultSink};
use strategy::{Scanner, SymbolScan, evaluate_all};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::RunError;

const PROGRESS_EVERY: usize = 50;

enum SymbolOutcome {
    Scanned { symbol: String, scan: SymbolScan },
    Stale { symbol: String, last: NaiveDate },
    Skipped { symbol: String, reason: String },
    Cancelled,
}

/// Runs every scanner over every symbol, then hands the whole batch to the
/// results sink in a single replace-for-date call.
pub struct ScanService {
    source: Arc<dyn BarSource>,
    sink: Arc<dyn ResultSink>,
    scanners: Arc<[Scanner]>,
    concurrency: usize,
    stale_after_days: i64,
}

impl ScanService {
    pub fn new(source: Arc<dyn BarSource>, sink: Arc<dyn ResultSink>, scanners: Vec<Scanner>) -> Self {
        Self {
            source,
            sink,
            scanners: scanners.into(),
            concurrency: 4,
            stale_after_days: DEFAULT_STALE_DAYS,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_stale_after(mut self, days: i64) -> Self {
        self.stale_after_days = days;
        self
    }

    /// One full run for `scan_date`. Setting `cancel` to true stops the run between
    /// symbols and discards everything collected so far.
    pub async fn run(
        &self,
        symbols: &[String],
        scan_date: NaiveDate,
        cancel: watch::Receiver<bool>,
    ) -> Result<RunSummary, RunError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        let mut summary = RunSummary::new(run_id, scan_date, symbols.len());
        let mut batch: Vec<SignalRecord> = Vec::new();

        info!(
            "Run {}: scanning {} symbols with {} scanners for {}",
            run_id,
            symbols.len(),
            self.scanners.len(),
            scan_date
        );

        let mut outcomes = stream::iter(symbols.iter().cloned())
            .map(|symbol| self.scan_symbol(symbol, scan_date, cancel.clone()))
            .buffer_unordered(self.concurrency);

        let mut done = 0;
        while let Some(outcome) = outcomes.next().await {
            if *cancel.borrow() {
                warn!("Run {} cancelled after {} symbols", run_id, done);
                return Err(RunError::Cancelled);
            }

            match outcome {
                SymbolOutcome::Scanned { symbol, scan } => {
                    for (scanner, err) in &scan.failures {
                        debug!("Skipping {} for {}: {}", scanner, symbol, err);
                    }
                    summary.record_symbol(&scan.records, scan.failures.len());
                    batch.extend(scan.records);
                }
                SymbolOutcome::Stale { symbol, last } => {
                    debug!("Skipping {}: last bar {} is stale", symbol, last);
                    summary.record_stale();
                }
                SymbolOutcome::Skipped { symbol, reason } => {
                    warn!("Skipping {}: {}", symbol, reason);
                    summary.record_skipped();
                }
                SymbolOutcome::Cancelled => {
                    warn!("Run {} cancelled after {} symbols", run_id, done);
                    return Err(RunError::Cancelled);
                }
            }

            done += 1;
            if done % PROGRESS_EVERY == 0 {
                info!(
                    "Processed {}/{} symbols... ({} signals found)",
                    done,
                    symbols.len(),
                    batch.len()
                );
            }
        }
        drop(outcomes);

        if *cancel.borrow() {
            return Err(RunError::Cancelled);
        }

        summary.rows_written = self
            .sink
            .replace_for_date(scan_date, &batch)
            .await
            .map_err(|source| RunError::Write { scan_date, source })?;
        summary.elapsed = started.elapsed();

        info!(
            "Run {} complete: {} signals, {} skipped, {} stale in {:.2}s",
            run_id,
            summary.total_signals,
            summary.symbols_skipped,
            summary.symbols_stale,
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }

    async fn scan_symbol(
        &self,
        symbol: String,
        scan_date: NaiveDate,
        cancel: watch::Receiver<bool>,
    ) -> SymbolOutcome {
        if *cancel.borrow() {
            return SymbolOutcome::Cancelled;
        }

        let bars = match self.source.get_bars(&symbol, scan_date).await {
            Ok(bars) => bars,
            Err(e) => {
                return SymbolOutcome::Skipped {
                    symbol,
                    reason: e.to_string(),
                };
            }
        };

        let Some(last) = bars.last().map(|b| b.date) else {
            return SymbolOutcome::Skipped {
                symbol,
                reason: "no bars".to_string(),
            };
        };
        if scan_date.signed_duration_since(last).num_days() > self.stale_after_days {
            return SymbolOutcome::Stale { symbol, last };
        }

        let scanners = self.scanners.clone();
        let task_symbol = symbol.clone();
        let evaluated = tokio::task::spawn_blocking(move || {
            evaluate_all(&scanners, &task_symbol, &bars, scan_date)
        })
        .await;

        match evaluated {
            Ok(scan) => SymbolOutcome::Scanned { symbol, scan },
            Err(e) => SymbolOutcome::Skipped {
                symbol,
                reason: format!("evaluation aborted: {}", e),
            },
        }
    }
}
