use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Data quality: {0}")]
    DataQuality(String),
    #[error("Indicator error: {0}")]
    Indicator(String),
}

impl ScanError {
    pub(crate) fn indicator<E: std::fmt::Debug>(err: E) -> Self {
        Self::Indicator(format!("{:?}", err))
    }
}
