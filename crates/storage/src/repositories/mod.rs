pub mod bars_repo;
pub mod scanner_results_repo;

pub use bars_repo::BarsRepository;
pub use scanner_results_repo::{ResultsStats, ScannerResultsRepository};
