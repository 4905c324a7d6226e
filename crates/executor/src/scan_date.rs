use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScanDateError {
    #[error("Scan date {requested} is in the future (today is {today})")]
    Future { requested: NaiveDate, today: NaiveDate },
    #[error("Scan date {requested} is before today ({today}); backfill is disabled")]
    BackfillDisabled { requested: NaiveDate, today: NaiveDate },
}

/// Today unless a date is requested. Past dates need backfill enabled, future dates are refused.
pub fn resolve_scan_date(
    requested: Option<NaiveDate>,
    today: NaiveDate,
    allow_backfill: bool,
) -> Result<NaiveDate, ScanDateError> {
    match requested {
        None => Ok(today),
        Some(requested) if requested > today => Err(ScanDateError::Future { requested, today }),
        Some(requested) if requested < today && !allow_backfill => {
            Err(ScanDateError::BackfillDisabled { requested, today })
        }
        Some(requested) => Ok(requested),
    }
}
