mod report;
mod summary;

pub use report::{write_results, CSV_FILE};
pub use summary::write_summary;
