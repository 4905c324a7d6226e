use common::models::{Bar, Signal};

use crate::error::ScanError;
use crate::indicators::{mean, tail, volumes};

const LOOKBACK: usize = 20;
const SURGE_MULTIPLE: f64 = 3.0;
const MIN_PRICE_CHANGE_PCT: f64 = 2.0;

pub const MIN_BARS: usize = LOOKBACK + 1;
pub const WINDOW: usize = MIN_BARS;

/// Today's volume over the mean of the previous 20 bars. `None` when that mean is zero.
fn volume_ratio(bars: &[Bar]) -> Option<f64> {
    let recent = tail(bars, LOOKBACK + 1);
    let (today, prior) = recent.split_last()?;
    let avg_volume = mean(&volumes(prior))?;
    if avg_volume == 0.0 {
        return None;
    }
    Some(today.volume / avg_volume)
}

/// Volume at least `multiple` times the 20-bar average.
pub fn explosive(bars: &[Bar], multiple: f64) -> Result<Option<Signal>, ScanError> {
    Ok(volume_ratio(bars)
        .filter(|ratio| *ratio >= multiple)
        .map(|_| Signal::Bullish))
}

/// A 3x surge whose bar moved at least 2% open to close; direction follows the move.
pub fn surge_with_price(bars: &[Bar]) -> Result<Option<Signal>, ScanError> {
    let Some(ratio) = volume_ratio(bars) else {
        return Ok(None);
    };
    let Some(today) = bars.last() else {
        return Ok(None);
    };
    if ratio < SURGE_MULTIPLE || today.open <= 0.0 {
        return Ok(None);
    }

    let change = (today.close - today.open) / today.open * 100.0;
    if change.abs() < MIN_PRICE_CHANGE_PCT {
        return Ok(None);
    }
    Ok(Some(if change > 0.0 {
        Signal::Bullish
    } else {
        Signal::Bearish
    }))
}
