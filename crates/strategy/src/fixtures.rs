use chrono::{Days, NaiveDate};
use common::models::Bar;

pub const SYMBOL: &str = "TEST";

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Bars where each open is the previous close and the range is half a percent either side.
pub fn series(closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
    assert_eq!(closes.len(), volumes.len());
    let mut prev_close = closes.first().copied().unwrap_or(0.0);
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            let open = prev_close;
            prev_close = close;
            Bar::new(
                SYMBOL,
                start_date() + Days::new(i as u64),
                open,
                open.max(close) * 1.005,
                open.min(close) * 0.995,
                close,
                volume,
            )
        })
        .collect()
}

pub fn flat(n: usize, price: f64, volume: f64) -> Vec<Bar> {
    series(&vec![price; n], &vec![volume; n])
}

/// `flat` with the last bar's close and volume replaced.
pub fn flat_then(n: usize, price: f64, volume: f64, last_close: f64, last_volume: f64) -> Vec<Bar> {
    let mut closes = vec![price; n];
    let mut volumes = vec![volume; n];
    if let (Some(c), Some(v)) = (closes.last_mut(), volumes.last_mut()) {
        *c = last_close;
        *v = last_volume;
    }
    series(&closes, &volumes)
}
