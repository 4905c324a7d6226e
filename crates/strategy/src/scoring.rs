//! Strength score (0-100) attached to every detected signal.
//!
//! Starts from 50 and adjusts for volume confirmation, trend context, RSI,
//! volatility and recent consolidation over the last 20 bars.

use common::models::{Bar, Signal};

use crate::error::ScanError;
use crate::indicators::{atr_last, closes, mean, rsi_last, tail, volumes};

const BASE_SCORE: f64 = 50.0;
const WINDOW: usize = 20;
const RSI_PERIOD: usize = 14;
const ATR_PERIOD: usize = 14;

pub fn pattern_strength(bars: &[Bar], signal: Signal) -> Result<f64, ScanError> {
    let recent = tail(bars, WINDOW);
    let recent_closes = closes(recent);
    let recent_volumes = volumes(recent);
    let Some(&price) = recent_closes.last() else {
        return Ok(BASE_SCORE);
    };

    let mut score = BASE_SCORE;
    score += volume_points(&recent_volumes);
    score += trend_points(&recent_closes, price, signal);

    if let Some(rsi) = rsi_last(&closes(bars), RSI_PERIOD)? {
        score += rsi_points(rsi, signal);
    }

    if price > 0.0 {
        if let Some(atr) = atr_last(recent, ATR_PERIOD)? {
            score += volatility_points(atr / price * 100.0);
        }
        score += consolidation_points(tail(&recent_closes, 5), price);
    }

    Ok(score.clamp(0.0, 100.0))
}

fn volume_points(volumes: &[f64]) -> f64 {
    let Some((&today, prior)) = volumes.split_last() else {
        return 0.0;
    };
    let Some(avg) = mean(prior) else {
        return 0.0;
    };
    if today > avg * 1.5 {
        20.0
    } else if today > avg * 1.2 {
        10.0
    } else if today < avg * 0.5 {
        -20.0
    } else {
        0.0
    }
}

fn trend_points(closes: &[f64], price: f64, signal: Signal) -> f64 {
    let Some(sma) = mean(closes) else {
        return 0.0;
    };
    let above = price > sma * 1.02;
    let below = price < sma * 0.98;
    match signal {
        Signal::Bullish if above => 15.0,
        Signal::Bullish if below => 5.0,
        Signal::Bearish if below => 15.0,
        Signal::Bearish if above => 5.0,
        _ => 0.0,
    }
}

fn rsi_points(rsi: f64, signal: Signal) -> f64 {
    match signal {
        Signal::Bullish if rsi > 30.0 && rsi < 50.0 => 10.0,
        Signal::Bullish if rsi > 70.0 => -10.0,
        Signal::Bearish if rsi > 50.0 && rsi < 70.0 => 10.0,
        Signal::Bearish if rsi < 30.0 => -10.0,
        _ => 0.0,
    }
}

fn volatility_points(atr_pct: f64) -> f64 {
    if atr_pct > 1.0 && atr_pct < 3.0 {
        5.0
    } else if atr_pct > 5.0 {
        -5.0
    } else {
        0.0
    }
}

fn consolidation_points(last_closes: &[f64], price: f64) -> f64 {
    if last_closes.is_empty() {
        return 0.0;
    }
    let high = last_closes.iter().copied().fold(f64::MIN, f64::max);
    let low = last_closes.iter().copied().fold(f64::MAX, f64::min);
    let range = (high - low) / price;
    if range < 0.03 {
        10.0
    } else if range > 0.10 {
        -5.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use common::models::Quality;

    #[test]
    fn test_spike_on_tight_base_scores_strong() {
        let bars = fixtures::flat_then(30, 100.0, 1_000_000.0, 100.0, 10_000_000.0);
        let strength = pattern_strength(&bars, Signal::Bullish).unwrap();
        assert!(strength >= 80.0, "strength {}", strength);
        assert_eq!(Quality::from_strength(strength), Quality::Strong);
    }

    #[test]
    fn test_thin_volume_is_penalised() {
        let spike = fixtures::flat_then(30, 100.0, 1_000.0, 100.0, 5_000.0);
        let thin = fixtures::flat_then(30, 100.0, 1_000.0, 100.0, 100.0);
        let strong = pattern_strength(&spike, Signal::Bullish).unwrap();
        let weak = pattern_strength(&thin, Signal::Bullish).unwrap();
        assert!(weak < strong);
        assert_eq!(strong - weak, 40.0);
    }

    #[test]
    fn test_score_stays_in_bounds() {
        let whipsaw: Vec<f64> = (0..60)
            .map(|i| if i % 2 == 0 { 100.0 } else { 130.0 })
            .collect();
        let volumes: Vec<f64> = (0..60).map(|i| 1_000.0 + (i * 37 % 11) as f64 * 400.0).collect();
        let bars = fixtures::series(&whipsaw, &volumes);

        for signal in [Signal::Bullish, Signal::Bearish, Signal::Neutral] {
            let strength = pattern_strength(&bars, signal).unwrap();
            assert!((0.0..=100.0).contains(&strength), "{:?}: {}", signal, strength);
        }
        assert_eq!(pattern_strength(&[], Signal::Bullish), Ok(BASE_SCORE));
    }

    #[test]
    fn test_point_tables() {
        assert_eq!(volatility_points(2.0), 5.0);
        assert_eq!(volatility_points(6.0), -5.0);
        assert_eq!(volatility_points(4.0), 0.0);
        assert_eq!(rsi_points(40.0, Signal::Bullish), 10.0);
        assert_eq!(rsi_points(75.0, Signal::Bullish), -10.0);
        assert_eq!(rsi_points(60.0, Signal::Bearish), 10.0);
        assert_eq!(rsi_points(40.0, Signal::Neutral), 0.0);
        assert_eq!(consolidation_points(&[100.0, 101.0, 100.5], 100.0), 10.0);
        assert_eq!(consolidation_points(&[], 100.0), 0.0);
    }
}
