pub mod date_locks;
pub mod db;
pub mod error;
pub mod market_data;
pub mod repositories;
pub mod results_writer;
pub mod traits;

pub use db::Database;
pub use error::StorageError;
pub use market_data::SqliteBarSource;
pub use results_writer::ResultsWriter;
pub use traits::{BarSource, ResultSink};
