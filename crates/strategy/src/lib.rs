pub mod error;
pub mod indicators;
pub mod scanners;
pub mod scoring;
pub mod validation;

pub use error::ScanError;
pub use scanners::{Scanner, SymbolScan, evaluate_all};

#[cfg(test)]
pub(crate) mod fixtures;
