pub mod breakout;
pub mod momentum;
pub mod supertrend;
pub mod volume;

use chrono::NaiveDate;
use common::models::{Bar, ScannerName, Signal, SignalRecord};

use crate::error::ScanError;
use crate::indicators::tail;
use crate::scoring::pattern_strength;
use crate::validation::validate_window;
use momentum::Horizon;
use supertrend::Recency;

/// A scanner unit. Dispatch is a match over the closed `ScannerName` set, and
/// evaluation is a pure function of the bar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scanner {
    name: ScannerName,
}

impl Scanner {
    pub fn new(name: ScannerName) -> Self {
        Self { name }
    }

    /// One scanner per name, in `ScannerName::ALL` order.
    pub fn all() -> Vec<Scanner> {
        ScannerName::ALL.into_iter().map(Self::new).collect()
    }

    pub fn name(&self) -> ScannerName {
        self.name
    }

    /// Shortest window this scanner evaluates; anything shorter yields no signal.
    pub fn min_bars(&self) -> usize {
        match self.name {
            ScannerName::QullamaggieBreakout => breakout::MIN_BARS,
            ScannerName::MomentumBurst1d
            | ScannerName::MomentumBurst3d
            | ScannerName::MomentumBurst5d => momentum::MIN_BARS,
            ScannerName::SupertrendBullish
            | ScannerName::SupertrendFresh
            | ScannerName::SupertrendRecent => supertrend::MIN_BARS,
            ScannerName::ExplosiveVolume3x
            | ScannerName::ExplosiveVolume5x
            | ScannerName::ExplosiveVolume10x
            | ScannerName::VolumeSurgeWithPrice => volume::MIN_BARS,
        }
    }

    /// Trailing bars this scanner and its score read. Older bars are never looked at.
    pub fn window(&self) -> usize {
        match self.name {
            ScannerName::QullamaggieBreakout => breakout::WINDOW,
            ScannerName::MomentumBurst1d
            | ScannerName::MomentumBurst3d
            | ScannerName::MomentumBurst5d => momentum::WINDOW,
            ScannerName::SupertrendBullish
            | ScannerName::SupertrendFresh
            | ScannerName::SupertrendRecent => supertrend::WINDOW,
            ScannerName::ExplosiveVolume3x
            | ScannerName::ExplosiveVolume5x
            | ScannerName::ExplosiveVolume10x
            | ScannerName::VolumeSurgeWithPrice => volume::WINDOW,
        }
    }

    fn detect(&self, bars: &[Bar]) -> Result<Option<Signal>, ScanError> {
        match self.name {
            ScannerName::QullamaggieBreakout => breakout::qullamaggie(bars),
            ScannerName::MomentumBurst1d => momentum::burst(bars, Horizon::OneDay),
            ScannerName::MomentumBurst3d => momentum::burst(bars, Horizon::ThreeDay),
            ScannerName::MomentumBurst5d => momentum::burst(bars, Horizon::FiveDay),
            ScannerName::SupertrendBullish => supertrend::bullish(bars, Recency::Any),
            ScannerName::SupertrendFresh => supertrend::bullish(bars, Recency::Within(2)),
            ScannerName::SupertrendRecent => supertrend::bullish(bars, Recency::Within(3)),
            ScannerName::ExplosiveVolume3x => volume::explosive(bars, 3.0),
            ScannerName::ExplosiveVolume5x => volume::explosive(bars, 5.0),
            ScannerName::ExplosiveVolume10x => volume::explosive(bars, 10.0),
            ScannerName::VolumeSurgeWithPrice => volume::surge_with_price(bars),
        }
    }

    /// Evaluates the trailing `window()` bars. Short history is `Ok(None)`; malformed
    /// data inside the window is `Err(ScanError::DataQuality)`.
    pub fn evaluate(
        &self,
        symbol: &str,
        bars: &[Bar],
        scan_date: NaiveDate,
    ) -> Result<Option<SignalRecord>, ScanError> {
        if bars.len() < self.min_bars() {
            return Ok(None);
        }
        let window = tail(bars, self.window());
        validate_window(window)?;

        let Some(signal) = self.detect(window)? else {
            return Ok(None);
        };
        let strength = pattern_strength(window, signal)?;
        Ok(Some(SignalRecord::new(
            symbol,
            self.name,
            signal,
            strength,
            scan_date,
        )))
    }
}

/// Everything one symbol produced across a set of scanners.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolScan {
    pub records: Vec<SignalRecord>,
    pub failures: Vec<(ScannerName, ScanError)>,
}

pub fn evaluate_all(
    scanners: &[Scanner],
    symbol: &str,
    bars: &[Bar],
    scan_date: NaiveDate,
) -> SymbolScan {
    let mut scan = SymbolScan::default();
    for scanner in scanners {
        match scanner.evaluate(symbol, bars, scan_date) {
            Ok(Some(record)) => scan.records.push(record),
            Ok(None) => {}
            Err(e) => scan.failures.push((scanner.name(), e)),
        }
    }
    scan
}
