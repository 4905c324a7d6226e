use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::signal::{Quality, ScannerName, Signal, SignalRecord};

/// Aggregate counts of one scan run. Every update is a plain increment, so the
/// order in which symbols complete does not change the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub scan_date: NaiveDate,
    pub symbols_total: usize,
    pub symbols_processed: usize,
    pub symbols_signaled: usize,
    /// Symbols the market data source could not supply.
    pub symbols_skipped: usize,
    pub symbols_stale: usize,
    /// Symbol/scanner pairs rejected for bad data.
    pub data_quality_skips: usize,
    pub total_signals: usize,
    pub per_scanner: BTreeMap<ScannerName, usize>,
    pub per_signal: BTreeMap<Signal, usize>,
    pub per_quality: BTreeMap<Quality, usize>,
    pub rows_written: u64,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(run_id: Uuid, scan_date: NaiveDate, symbols_total: usize) -> Self {
        Self {
            run_id,
            scan_date,
            symbols_total,
            symbols_processed: 0,
            symbols_signaled: 0,
            symbols_skipped: 0,
            symbols_stale: 0,
            data_quality_skips: 0,
            total_signals: 0,
            per_scanner: BTreeMap::new(),
            per_signal: BTreeMap::new(),
            per_quality: BTreeMap::new(),
            rows_written: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Folds in the outcome of one fully evaluated symbol.
    pub fn record_symbol(&mut self, records: &[SignalRecord], data_quality_skips: usize) {
        self.symbols_processed += 1;
        self.data_quality_skips += data_quality_skips;
        if !records.is_empty() {
            self.symbols_signaled += 1;
        }
        for record in records {
            self.total_signals += 1;
            *self.per_scanner.entry(record.scanner_name).or_default() += 1;
            *self.per_signal.entry(record.signal).or_default() += 1;
            *self.per_quality.entry(record.quality).or_default() += 1;
        }
    }

    pub fn record_skipped(&mut self) {
        self.symbols_skipped += 1;
    }

    pub fn record_stale(&mut self) {
        self.symbols_stale += 1;
    }

    pub fn count_for(&self, scanner: ScannerName) -> usize {
        self.per_scanner.get(&scanner).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Run {} for {}: {} symbols, {} processed, {} skipped, {} stale, {} data-quality skips",
            self.run_id,
            self.scan_date,
            self.symbols_total,
            self.symbols_processed,
            self.symbols_skipped,
            self.symbols_stale,
            self.data_quality_skips,
        )?;
        writeln!(
            f,
            "{} signals on {} symbols, {} rows written in {:.2}s",
            self.total_signals,
            self.symbols_signaled,
            self.rows_written,
            self.elapsed.as_secs_f64(),
        )?;
        for (scanner, count) in &self.per_scanner {
            writeln!(f, "  {:<26} {}", scanner.as_str(), count)?;
        }
        for (quality, count) in self.per_quality.iter().rev() {
            writeln!(f, "  {:<26} {}", quality.as_str(), count)?;
        }
        Ok(())
    }
}
