//! Headers of the batch files, and the blank templates handed to operators.

use crate::{
    enroll::row::ENROLL_TEMPLATE_HEADER,
    rerun::row::{RERUN_COLUMNS, RERUN_HEADER},
};

/// Input columns of an enrollment file.
pub fn enroll_template_header() -> &'static [&'static str] {
    &ENROLL_TEMPLATE_HEADER
}

/// Input columns of a rerun file.
pub fn rerun_template_header() -> &'static [&'static str] {
    &RERUN_HEADER[..RERUN_COLUMNS]
}

#[cfg(feature = "csv")]
mod csv_output {
    use std::io::Write;

    use crate::{
        BatchError,
        core::item::ItemWriter,
        item::csv::csv_writer::CsvItemWriterBuilder,
    };

    /// Writes `header` followed by `rows` as a `;` delimited table and hands
    /// the underlying writer back.
    pub fn write_table<W: Write>(
        header: &[&str],
        rows: &[Vec<String>],
        writer: W,
    ) -> Result<W, BatchError> {
        let csv_writer = CsvItemWriterBuilder::new().from_writer(writer);

        ItemWriter::<&[&str]>::write(&csv_writer, &[header])?;
        ItemWriter::<Vec<String>>::write(&csv_writer, rows)?;
        ItemWriter::<Vec<String>>::flush(&csv_writer)?;

        csv_writer.into_inner()
    }

    /// A template is a table with a header and no rows.
    pub fn write_template<W: Write>(header: &[&str], writer: W) -> Result<W, BatchError> {
        write_table(header, &[], writer)
    }
}

#[cfg(feature = "csv")]
pub use csv_output::{write_table, write_template};
