pub mod error;
pub mod runner;
pub mod scan_date;
pub mod services;

pub use error::RunError;
pub use runner::{RunRequest, run_scan};
pub use services::scan_service::ScanService;
