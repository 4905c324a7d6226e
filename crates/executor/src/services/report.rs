//! Plain-text views of the results table for the `stats` and `top` commands.

use std::fmt::Write;

use common::models::{ScannerName, SignalRecord};
use storage::repositories::ResultsStats;

pub fn format_stats(stats: &ResultsStats) -> String {
    let mut out = String::new();
    let last = stats
        .last_scan_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());

    let _ = writeln!(out, "Total results:   {}", stats.total_results);
    let _ = writeln!(out, "Unique symbols:  {}", stats.unique_symbols);
    let _ = writeln!(out, "Scanners active: {}", stats.num_scanners);
    let _ = writeln!(out, "Last scan:       {}", last);

    if !stats.per_scanner.is_empty() {
        let _ = writeln!(out, "\nBy scanner:");
        for (scanner, count) in &stats.per_scanner {
            let label = scanner
                .parse::<ScannerName>()
                .map(|name| name.description())
                .unwrap_or("");
            let _ = writeln!(out, "  {:<26} {:>6}  {}", scanner, count, label);
        }
    }

    if !stats.per_date.is_empty() {
        let _ = writeln!(out, "\nRecent scan dates:");
        for (date, count) in &stats.per_date {
            let _ = writeln!(out, "  {}  {:>6}", date, count);
        }
    }

    if !stats.top_picks.is_empty() {
        let _ = writeln!(out, "\nFlagged by several scanners:");
        for (symbol, scanners) in &stats.top_picks {
            let _ = writeln!(out, "  {:<10} {} scanners", symbol, scanners);
        }
    }
    out
}

pub fn format_top(records: &[SignalRecord]) -> String {
    if records.is_empty() {
        return "No signals.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<10} {:<26} {:<8} {:>8}  {}",
        "#", "SYMBOL", "SCANNER", "SIGNAL", "STRENGTH", "QUALITY"
    );
    for (rank, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<10} {:<26} {:<8} {:>8.1}  {}",
            rank + 1,
            record.symbol,
            record.scanner_name.as_str(),
            record.signal.as_str(),
            record.strength,
            record.quality.as_str()
        );
    }
    out
}
