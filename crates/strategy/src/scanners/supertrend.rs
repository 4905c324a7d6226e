use common::models::{Bar, Signal};

use crate::error::ScanError;
use crate::indicators::{Trend, supertrend};

const ATR_PERIOD: usize = 10;
const MULTIPLIER: f64 = 3.0;

pub const MIN_BARS: usize = 50;
/// Enough history for the ATR bands to settle.
pub const WINDOW: usize = 100;

/// How recently the trend must have turned up for the signal to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    /// Up on the last bar, however long ago it flipped.
    Any,
    /// Flipped up on one of the last `n` bars.
    Within(usize),
}

pub fn bullish(bars: &[Bar], recency: Recency) -> Result<Option<Signal>, ScanError> {
    let directions = supertrend(bars, ATR_PERIOD, MULTIPLIER)?;
    if directions.last().copied().flatten() != Some(Trend::Up) {
        return Ok(None);
    }

    let hit = match recency {
        Recency::Any => true,
        Recency::Within(n) => {
            let start = directions.len().saturating_sub(n).max(1);
            (start..directions.len())
                .any(|i| directions[i] == Some(Trend::Up) && directions[i - 1] != Some(Trend::Up))
        }
    };

    Ok(hit.then_some(Signal::Bullish))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn decline(n: usize) -> Vec<f64> {
        (0..n).map(|i| 200.0 - i as f64).collect()
    }

    #[test]
    fn test_gap_on_last_bar_is_fresh() {
        let mut closes = decline(49);
        closes.push(300.0);
        let bars = fixtures::series(&closes, &vec![1_000.0; 50]);

        assert_eq!(bullish(&bars, Recency::Within(2)), Ok(Some(Signal::Bullish)));
        assert_eq!(bullish(&bars, Recency::Within(3)), Ok(Some(Signal::Bullish)));
        assert_eq!(bullish(&bars, Recency::Any), Ok(Some(Signal::Bullish)));
    }

    #[test]
    fn test_older_flip_is_only_bullish() {
        let mut closes = decline(45);
        closes.extend([300.0; 5]);
        let bars = fixtures::series(&closes, &vec![1_000.0; 50]);

        assert_eq!(bullish(&bars, Recency::Within(2)), Ok(None));
        assert_eq!(bullish(&bars, Recency::Within(3)), Ok(None));
        assert_eq!(bullish(&bars, Recency::Any), Ok(Some(Signal::Bullish)));
    }

    #[test]
    fn test_downtrend_is_quiet() {
        let bars = fixtures::series(&decline(60), &vec![1_000.0; 60]);
        assert_eq!(bullish(&bars, Recency::Any), Ok(None));
    }
}
