pub mod bar;
pub mod run_summary;
pub mod signal;

pub use bar::Bar;
pub use run_summary::RunSummary;
pub use signal::{ParseError, Quality, ScannerName, Signal, SignalRecord};
