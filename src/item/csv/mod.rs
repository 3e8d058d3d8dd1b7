//! CSV support for the batch files operators upload and download.
//!
//! Batch files are `;` delimited, start with a header line, and their rows do
//! not always have the number of columns the header announces. Both sides are
//! therefore flexible:
//!
//! 1. **CsvItemReader** discards the header and hands every row to the item
//!    type as raw fields (`From<Vec<String>>`), whatever its length.
//!
//! 2. **CsvItemWriter** serializes result rows, which may be longer than the
//!    input rows, with a CRLF terminator.
//!
//! # Example
//!
//! ```
//! use bulk_enroll_rs::item::csv::csv_reader::CsvItemReaderBuilder;
//! use bulk_enroll_rs::item::csv::csv_writer::CsvItemWriterBuilder;
//! use bulk_enroll_rs::core::item::{ItemReader, ItemWriter};
//!
//! let input = "Course Id;Nuevo Course Id\r\ncourse-v1:org+a+1;course-v1:org+a+2\r\n";
//! let reader = CsvItemReaderBuilder::new().from_reader(input.as_bytes());
//!
//! let writer = CsvItemWriterBuilder::new().from_writer(vec![]);
//! while let Some(mut row) = ItemReader::<Vec<String>>::read(&reader).unwrap() {
//!     row.push("Procesandose".to_string());
//!     writer.write(&[row]).unwrap();
//! }
//!
//! let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(output, "course-v1:org+a+1;course-v1:org+a+2;Procesandose\r\n");
//! ```

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;
