use common::models::{Bar, Signal};

use crate::error::ScanError;
use crate::indicators::{closes, max_last, mean, sma_last, tail};

const LOOKBACK: usize = 20;
pub const WINDOW: usize = 50;
const VOLUME_MULTIPLIER: f64 = 1.5;

pub const MIN_BARS: usize = LOOKBACK + 20;

/// Close above the prior 20-bar high on 1.5x volume, above SMA10 and SMA20, with SMA10 over SMA20.
pub fn qullamaggie(bars: &[Bar]) -> Result<Option<Signal>, ScanError> {
    let window = tail(bars, WINDOW);
    let Some((today, history)) = window.split_last() else {
        return Ok(None);
    };
    if history.len() < LOOKBACK {
        return Ok(None);
    }
    let prior = tail(history, LOOKBACK);

    let highs: Vec<f64> = prior.iter().map(|b| b.high).collect();
    let prior_volumes: Vec<f64> = prior.iter().map(|b| b.volume).collect();
    let (Some(prev_high), Some(avg_volume)) = (max_last(&highs, LOOKBACK)?, mean(&prior_volumes)) else {
        return Ok(None);
    };

    let window_closes = closes(window);
    let (Some(sma10), Some(sma20)) = (sma_last(&window_closes, 10)?, sma_last(&window_closes, 20)?) else {
        return Ok(None);
    };

    let breakout = today.close > prev_high
        && today.volume > avg_volume * VOLUME_MULTIPLIER
        && today.close > sma10
        && today.close > sma20
        && sma10 > sma20;

    Ok(breakout.then_some(Signal::Bullish))
}
