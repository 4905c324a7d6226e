use common::models::Bar;

use crate::error::ScanError;

/// Rejects windows with non-finite or negative values, or dates that do not strictly increase.
pub fn validate_window(bars: &[Bar]) -> Result<(), ScanError> {
    for bar in bars {
        if !bar.is_finite() {
            return Err(ScanError::DataQuality(format!(
                "non-finite value on {}",
                bar.date
            )));
        }
        if bar.open < 0.0 || bar.high < 0.0 || bar.low < 0.0 || bar.close < 0.0 || bar.volume < 0.0 {
            return Err(ScanError::DataQuality(format!(
                "negative value on {}",
                bar.date
            )));
        }
    }

    if let Some(pair) = bars.windows(2).find(|pair| pair[1].date <= pair[0].date) {
        return Err(ScanError::DataQuality(format!(
            "dates out of order: {} followed by {}",
            pair[0].date, pair[1].date
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_clean_window_passes() {
        assert_eq!(validate_window(&fixtures::flat(30, 50.0, 1_000.0)), Ok(()));
        assert_eq!(validate_window(&[]), Ok(()));
    }

    #[test]
    fn test_non_finite_values_fail() {
        let mut bars = fixtures::flat(30, 50.0, 1_000.0);
        bars[12].close = f64::NAN;
        assert!(matches!(validate_window(&bars), Err(ScanError::DataQuality(_))));

        let mut bars = fixtures::flat(30, 50.0, 1_000.0);
        bars[3].volume = f64::INFINITY;
        assert!(matches!(validate_window(&bars), Err(ScanError::DataQuality(_))));
    }

    #[test]
    fn test_unordered_dates_fail() {
        let mut bars = fixtures::flat(30, 50.0, 1_000.0);
        bars.swap(10, 11);
        assert!(matches!(validate_window(&bars), Err(ScanError::DataQuality(_))));

        let mut bars = fixtures::flat(30, 50.0, 1_000.0);
        bars[20].date = bars[19].date;
        assert!(matches!(validate_window(&bars), Err(ScanError::DataQuality(_))));
    }
}
