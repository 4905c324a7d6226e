use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown scanner name: {0}")]
    UnknownScanner(String),
    #[error("unknown signal: {0}")]
    UnknownSignal(String),
    #[error("unknown quality: {0}")]
    UnknownQuality(String),
}

/// The fixed set of scanners persisted in `scanner_results.scanner_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScannerName {
    #[serde(rename = "QULLAMAGGIE_BREAKOUT")]
    QullamaggieBreakout,
    #[serde(rename = "MOMENTUM_BURST_1D")]
    MomentumBurst1d,
    #[serde(rename = "MOMENTUM_BURST_3D")]
    MomentumBurst3d,
    #[serde(rename = "MOMENTUM_BURST_5D")]
    MomentumBurst5d,
    #[serde(rename = "SUPERTREND_BULLISH")]
    SupertrendBullish,
    #[serde(rename = "SUPERTREND_FRESH")]
    SupertrendFresh,
    #[serde(rename = "SUPERTREND_RECENT")]
    SupertrendRecent,
    #[serde(rename = "EXPLOSIVE_VOLUME_3X")]
    ExplosiveVolume3x,
    #[serde(rename = "EXPLOSIVE_VOLUME_5X")]
    ExplosiveVolume5x,
    #[serde(rename = "EXPLOSIVE_VOLUME_10X")]
    ExplosiveVolume10x,
    #[serde(rename = "VOLUME_SURGE_WITH_PRICE")]
    VolumeSurgeWithPrice,
}

impl ScannerName {
    pub const ALL: [ScannerName; 11] = [
        Self::QullamaggieBreakout,
        Self::MomentumBurst1d,
        Self::MomentumBurst3d,
        Self::MomentumBurst5d,
        Self::SupertrendBullish,
        Self::SupertrendFresh,
        Self::SupertrendRecent,
        Self::ExplosiveVolume3x,
        Self::ExplosiveVolume5x,
        Self::ExplosiveVolume10x,
        Self::VolumeSurgeWithPrice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QullamaggieBreakout => "QULLAMAGGIE_BREAKOUT",
            Self::MomentumBurst1d => "MOMENTUM_BURST_1D",
            Self::MomentumBurst3d => "MOMENTUM_BURST_3D",
            Self::MomentumBurst5d => "MOMENTUM_BURST_5D",
            Self::SupertrendBullish => "SUPERTREND_BULLISH",
            Self::SupertrendFresh => "SUPERTREND_FRESH",
            Self::SupertrendRecent => "SUPERTREND_RECENT",
            Self::ExplosiveVolume3x => "EXPLOSIVE_VOLUME_3X",
            Self::ExplosiveVolume5x => "EXPLOSIVE_VOLUME_5X",
            Self::ExplosiveVolume10x => "EXPLOSIVE_VOLUME_10X",
            Self::VolumeSurgeWithPrice => "VOLUME_SURGE_WITH_PRICE",
        }
    }

    /// Human label shown next to results.
    pub fn description(&self) -> &'static str {
        match self {
            Self::QullamaggieBreakout => "Qullamaggie Breakout",
            Self::MomentumBurst1d => "Momentum Burst (1-Day)",
            Self::MomentumBurst3d => "Momentum Burst (3-Day)",
            Self::MomentumBurst5d => "Momentum Burst (5-Day)",
            Self::SupertrendBullish => "SuperTrend Bullish",
            Self::SupertrendFresh => "SuperTrend Fresh (1 Day)",
            Self::SupertrendRecent => "SuperTrend Recent (2 Days)",
            Self::ExplosiveVolume3x => "Explosive Volume (3x Average)",
            Self::ExplosiveVolume5x => "Explosive Volume (5x Average)",
            Self::ExplosiveVolume10x => "Explosive Volume (10x Average)",
            Self::VolumeSurgeWithPrice => "Volume Surge + Price Move (3x + 2%)",
        }
    }
}

impl fmt::Display for ScannerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScannerName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownScanner(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bullish" => Ok(Self::Bullish),
            "bearish" => Ok(Self::Bearish),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseError::UnknownSignal(s.to_string())),
        }
    }
}

/// Coarse bucket over strength. Variant order is the bucket order, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    VeryWeak,
    Weak,
    Moderate,
    Good,
    Strong,
}

/// Lower bound (inclusive) of each bucket, checked top-down.
const QUALITY_THRESHOLDS: [(f64, Quality); 4] = [
    (80.0, Quality::Strong),
    (60.0, Quality::Good),
    (40.0, Quality::Moderate),
    (20.0, Quality::Weak),
];

impl Quality {
    /// Total step function; anything below every threshold (NaN included) is `VeryWeak`.
    pub fn from_strength(strength: f64) -> Self {
        QUALITY_THRESHOLDS
            .iter()
            .find(|(floor, _)| strength >= *floor)
            .map(|(_, quality)| *quality)
            .unwrap_or(Quality::VeryWeak)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryWeak => "very_weak",
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Good => "good",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_weak" => Ok(Self::VeryWeak),
            "weak" => Ok(Self::Weak),
            "moderate" => Ok(Self::Moderate),
            "good" => Ok(Self::Good),
            "strong" => Ok(Self::Strong),
            _ => Err(ParseError::UnknownQuality(s.to_string())),
        }
    }
}

/// One row of `scanner_results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub symbol: String,
    pub scanner_name: ScannerName,
    pub signal: Signal,
    pub strength: f64,
    pub quality: Quality,
    pub scan_date: NaiveDate,
}

impl SignalRecord {
    /// Clamps strength into [0, 100] and derives the quality bucket from it.
    pub fn new(
        symbol: impl Into<String>,
        scanner_name: ScannerName,
        signal: Signal,
        strength: f64,
        scan_date: NaiveDate,
    ) -> Self {
        let strength = if strength.is_nan() {
            0.0
        } else {
            strength.clamp(0.0, 100.0)
        };
        Self {
            symbol: symbol.into(),
            scanner_name,
            signal,
            strength,
            quality: Quality::from_strength(strength),
            scan_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_buckets() {
        assert_eq!(Quality::from_strength(100.0), Quality::Strong);
        assert_eq!(Quality::from_strength(80.0), Quality::Strong);
        assert_eq!(Quality::from_strength(79.9), Quality::Good);
        assert_eq!(Quality::from_strength(60.0), Quality::Good);
        assert_eq!(Quality::from_strength(40.0), Quality::Moderate);
        assert_eq!(Quality::from_strength(20.0), Quality::Weak);
        assert_eq!(Quality::from_strength(19.99), Quality::VeryWeak);
        assert_eq!(Quality::from_strength(0.0), Quality::VeryWeak);
        assert_eq!(Quality::from_strength(f64::NAN), Quality::VeryWeak);
    }

    #[test]
    fn test_quality_is_monotonic_over_strength() {
        let mut previous = Quality::from_strength(0.0);
        for step in 0..=1000 {
            let strength = step as f64 / 10.0;
            let quality = Quality::from_strength(strength);
            assert!(
                quality >= previous,
                "strength {} gave {:?} after {:?}",
                strength,
                quality,
                previous
            );
            previous = quality;
        }
    }

    #[test]
    fn test_scanner_name_round_trips_through_text() {
        for name in ScannerName::ALL {
            assert_eq!(name.as_str().parse::<ScannerName>(), Ok(name));
        }
        assert_eq!(
            "explosive_volume_10x".parse::<ScannerName>(),
            Ok(ScannerName::ExplosiveVolume10x)
        );
        assert!("CUP_AND_HANDLE".parse::<ScannerName>().is_err());
    }

    #[test]
    fn test_scanner_name_serializes_as_column_value() {
        let json = serde_json::to_string(&ScannerName::MomentumBurst3d).unwrap();
        assert_eq!(json, "\"MOMENTUM_BURST_3D\"");
        let json = serde_json::to_string(&Quality::VeryWeak).unwrap();
        assert_eq!(json, "\"very_weak\"");
    }

    #[test]
    fn test_signal_record_clamps_strength() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let record = SignalRecord::new(
            "AAPL",
            ScannerName::ExplosiveVolume3x,
            Signal::Bullish,
            135.0,
            date,
        );
        assert_eq!(record.strength, 100.0);
        assert_eq!(record.quality, Quality::Strong);

        let record = SignalRecord::new("AAPL", ScannerName::ExplosiveVolume3x, Signal::Bullish, -4.0, date);
        assert_eq!(record.strength, 0.0);
        assert_eq!(record.quality, Quality::VeryWeak);
    }
}
