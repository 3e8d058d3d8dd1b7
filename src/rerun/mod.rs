//! Bulk course reruns.
//!
//! A rerun row asks for a copy of an existing course under a new key, with
//! its own display name and dates. Rows are checked in a fixed order and the
//! first failing check gives the row its status; valid rows are handed to the
//! authoring collaborator and reported as `Procesandose`.

pub mod batch;
pub mod processor;
pub mod row;
pub mod schedule;
pub mod status;

pub use batch::{PendingRerun, RerunBatch, RerunBatchBuilder, RerunReport, RerunRequest, RerunResponse};
pub use processor::{RerunOutcome, RerunProcessor};
pub use row::RerunRow;
pub use schedule::CourseScheduleRequest;
pub use status::RerunStatus;

/// Reader over an uploaded rerun file. The header line is discarded.
#[cfg(feature = "csv")]
pub fn read_rerun_csv<R: std::io::Read>(
    source: R,
) -> crate::item::csv::csv_reader::CsvItemReader<R> {
    crate::item::csv::csv_reader::CsvItemReaderBuilder::new().from_reader(source)
}
