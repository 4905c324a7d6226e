use common::models::Bar;
use ta::Next;
use ta::indicators::{
    AverageTrueRange, Maximum, RelativeStrengthIndex, SimpleMovingAverage, TrueRange,
};

use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

/// The last `n` elements (or all of them when shorter).
pub fn tail<T>(values: &[T], n: usize) -> &[T] {
    &values[values.len().saturating_sub(n)..]
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub fn volumes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}

/// Mean of the final `period` values, `None` until that many exist.
pub fn sma_last(values: &[f64], period: usize) -> Result<Option<f64>, ScanError> {
    if values.len() < period {
        return Ok(None);
    }
    let mut sma = SimpleMovingAverage::new(period).map_err(ScanError::indicator)?;
    Ok(tail(values, period).iter().map(|v| sma.next(*v)).last())
}

/// Rolling mean aligned with `values`; entries before the first full window are `None`.
pub fn rolling_sma(values: &[f64], period: usize) -> Result<Vec<Option<f64>>, ScanError> {
    let mut sma = SimpleMovingAverage::new(period).map_err(ScanError::indicator)?;
    Ok(values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let out = sma.next(*v);
            (i + 1 >= period).then_some(out)
        })
        .collect())
}

pub fn max_last(values: &[f64], period: usize) -> Result<Option<f64>, ScanError> {
    if values.is_empty() {
        return Ok(None);
    }
    let mut max = Maximum::new(period).map_err(ScanError::indicator)?;
    Ok(tail(values, period).iter().map(|v| max.next(*v)).last())
}

pub fn rsi_last(values: &[f64], period: usize) -> Result<Option<f64>, ScanError> {
    if values.len() <= period {
        return Ok(None);
    }
    let mut rsi = RelativeStrengthIndex::new(period).map_err(ScanError::indicator)?;
    Ok(values.iter().map(|v| rsi.next(*v)).last())
}

pub fn atr_last(bars: &[Bar], period: usize) -> Result<Option<f64>, ScanError> {
    if bars.len() <= period {
        return Ok(None);
    }
    let mut atr = AverageTrueRange::new(period).map_err(ScanError::indicator)?;
    Ok(bars.iter().map(|b| atr.next(b)).last())
}

/// Supertrend direction per bar, with the ATR taken as a simple mean of the true range.
/// Bars before index `period` have no direction.
pub fn supertrend(bars: &[Bar], period: usize, multiplier: f64) -> Result<Vec<Option<Trend>>, ScanError> {
    let mut true_range = TrueRange::new();
    let ranges: Vec<f64> = bars.iter().map(|b| true_range.next(b)).collect();
    let atr = rolling_sma(&ranges, period)?;

    let mut directions = vec![None; bars.len()];
    let mut line = 0.0;

    for i in period..bars.len() {
        let Some(avg_range) = atr[i] else { continue };
        let bar = &bars[i];
        let mid = (bar.high + bar.low) / 2.0;
        let upper = mid + multiplier * avg_range;
        let lower = mid - multiplier * avg_range;

        let (next_line, trend) = match directions[i - 1] {
            None => {
                if bar.close <= upper {
                    (upper, Trend::Down)
                } else {
                    (lower, Trend::Up)
                }
            }
            Some(Trend::Up) => {
                // lower band only ratchets up while the trend holds
                let floor = if lower > line { lower } else { line };
                if bar.close <= floor {
                    (upper, Trend::Down)
                } else {
                    (floor, Trend::Up)
                }
            }
            Some(Trend::Down) => {
                let ceiling = if upper < line { upper } else { line };
                if bar.close >= ceiling {
                    (lower, Trend::Up)
                } else {
                    (ceiling, Trend::Down)
                }
            }
        };
        line = next_line;
        directions[i] = Some(trend);
    }
    Ok(directions)
}
