use std::{
    cell::RefCell,
    fs::File,
    io::{self, Write},
    path::Path,
    result,
};

use csv::{Terminator, Writer, WriterBuilder};
use serde::Serialize;

use crate::{
    BatchError,
    core::item::{ItemWriter, ItemWriterResult},
};

/// Writes rows as `;` delimited CSV records.
///
/// Each item is serialized as one record: a `Vec<String>` row becomes the
/// fields in order. Rows of different lengths are accepted.
pub struct CsvItemWriter<T: Write> {
    wrapper: RefCell<Writer<T>>,
}

impl<T: Write, R: Serialize> ItemWriter<R> for CsvItemWriter<T> {
    fn write(&self, items: &[R]) -> ItemWriterResult {
        let mut wrapper = self.wrapper.borrow_mut();
        for item in items {
            wrapper
                .serialize(item)
                .map_err(|error| BatchError::ItemWriter(error.to_string()))?;
        }
        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    ///
    /// Note that this also flushes the underlying writer.
    fn flush(&self) -> ItemWriterResult {
        self.wrapper
            .borrow_mut()
            .flush()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}

impl<T: Write> CsvItemWriter<T> {
    pub fn into_inner(self) -> result::Result<T, BatchError> {
        self.wrapper
            .into_inner()
            .into_inner()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}

pub struct CsvItemWriterBuilder {
    delimiter: u8,
    terminator: Terminator,
}

impl Default for CsvItemWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemWriterBuilder {
    /// Semicolon delimited, CRLF terminated, the layout spreadsheet tools
    /// expect for these files.
    pub fn new() -> CsvItemWriterBuilder {
        CsvItemWriterBuilder {
            delimiter: b';',
            terminator: Terminator::CRLF,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> CsvItemWriterBuilder {
        self.delimiter = delimiter;
        self
    }

    pub fn terminator(mut self, terminator: Terminator) -> CsvItemWriterBuilder {
        self.terminator = terminator;
        self
    }

    fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(false)
            .flexible(true);
        builder
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemWriter<File>, BatchError> {
        let wtr = self
            .writer_builder()
            .from_path(path)
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        Ok(CsvItemWriter {
            wrapper: RefCell::new(wtr),
        })
    }

    /// # Example
    ///
    /// ```
    /// # use std::error::Error;
    /// # use bulk_enroll_rs::{item::csv::csv_writer::CsvItemWriterBuilder, core::item::ItemWriter};
    /// # fn main() { example().unwrap(); }
    /// fn example() -> Result<(), Box<dyn Error>> {
    ///     let wtr = CsvItemWriterBuilder::new().from_writer(vec![]);
    ///
    ///     wtr.write(&[
    ///         vec!["Course Id", "Estado"],
    ///         vec!["course-v1:org+c+r", "Procesandose"],
    ///     ])?;
    ///
    ///     let data = String::from_utf8(wtr.into_inner()?)?;
    ///     assert_eq!(data, "Course Id;Estado\r\ncourse-v1:org+c+r;Procesandose\r\n");
    ///     Ok(())
    /// }
    /// ```
    pub fn from_writer<W: io::Write>(self, wtr: W) -> CsvItemWriter<W> {
        let wtr = self.writer_builder().from_writer(wtr);

        CsvItemWriter {
            wrapper: RefCell::new(wtr),
        }
    }
}
