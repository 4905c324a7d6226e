use common::models::{Bar, Signal};

use crate::error::ScanError;
use crate::indicators::{closes, mean, sma_last, tail, volumes};

pub const WINDOW: usize = 30;
const TREND_PERIOD: usize = 20;

pub const MIN_BARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    OneDay,
    ThreeDay,
    FiveDay,
}

impl Horizon {
    fn bars(self) -> usize {
        match self {
            Self::OneDay => 1,
            Self::ThreeDay => 3,
            Self::FiveDay => 5,
        }
    }

    fn min_return_pct(self) -> f64 {
        match self {
            Self::OneDay => 4.0,
            Self::ThreeDay => 6.0,
            Self::FiveDay => 8.0,
        }
    }
}

/// Stockbee-style burst: price over SMA20 and a horizon return above threshold,
/// confirmed by volume against the 20-bar average.
pub fn burst(bars: &[Bar], horizon: Horizon) -> Result<Option<Signal>, ScanError> {
    let recent = tail(bars, WINDOW);
    let recent_closes = closes(recent);
    let recent_volumes = volumes(recent);

    let Some(sma20) = sma_last(&recent_closes, TREND_PERIOD)? else {
        return Ok(None);
    };
    let (Some(&price), Some(&volume)) = (recent_closes.last(), recent_volumes.last()) else {
        return Ok(None);
    };
    let Some(avg_volume) = mean(tail(&recent_volumes, TREND_PERIOD)) else {
        return Ok(None);
    };
    if avg_volume == 0.0 || price < sma20 {
        return Ok(None);
    }

    let change = pct_change(&recent_closes, horizon.bars());
    if change < horizon.min_return_pct() {
        return Ok(None);
    }

    let confirmed = match horizon {
        Horizon::OneDay => volume / avg_volume >= 2.0,
        Horizon::ThreeDay => mean(tail(&recent_volumes, 3)).is_some_and(|v| v >= avg_volume * 1.5),
        Horizon::FiveDay => mean(tail(&recent_volumes, 5)).is_some_and(|v| v >= avg_volume * 1.3),
    };

    Ok(confirmed.then_some(Signal::Bullish))
}

/// Percent change of the last close over the close `bars_back` bars earlier; 0 when unavailable.
fn pct_change(closes: &[f64], bars_back: usize) -> f64 {
    let n = closes.len();
    if n <= bars_back {
        return 0.0;
    }
    let (then, now) = (closes[n - 1 - bars_back], closes[n - 1]);
    if then > 0.0 {
        (now - then) / then * 100.0
    } else {
        0.0
    }
}
