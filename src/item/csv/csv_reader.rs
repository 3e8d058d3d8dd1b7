use csv::{ReaderBuilder, Trim};
use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

/// A CSV item reader that implements the `ItemReader` trait.
///
/// Batch files are loosely shaped: rows may be shorter or longer than the
/// header, so records are read flexibly and handed to the item type as raw
/// fields. Field values are not trimmed, rows are echoed back verbatim in the
/// result table.
///
/// Every line of the source is one item. A blank line is an item with no
/// fields, so the result table stays aligned with the uploaded file. A quoted
/// field may still span several lines.
///
/// # Type Parameters
///
/// - `R`: The type of reader providing the CSV data. Must implement `Read`.
///
/// # Examples
///
/// ```
/// use bulk_enroll_rs::item::csv::csv_reader::CsvItemReaderBuilder;
/// use bulk_enroll_rs::core::item::ItemReader;
///
/// let data = "email;names\nana@example.org;Ana\n\nluis@example.org";
///
/// let reader = CsvItemReaderBuilder::new()
///     .delimiter(b';')
///     .has_headers(true)
///     .from_reader(data.as_bytes());
///
/// let row: Vec<String> = reader.read().unwrap().unwrap();
/// assert_eq!(row, vec!["ana@example.org", "Ana"]);
///
/// let row: Vec<String> = reader.read().unwrap().unwrap();
/// assert!(row.is_empty());
///
/// let row: Vec<String> = reader.read().unwrap().unwrap();
/// assert_eq!(row, vec!["luis@example.org"]);
///
/// assert!(ItemReader::<Vec<String>>::read(&reader).unwrap().is_none());
/// ```
pub struct CsvItemReader<R> {
    /// Source of the lines
    ///
    /// Uses `RefCell` to provide interior mutability so we can consume lines
    /// while keeping the `read` method signature compatible with the
    /// `ItemReader` trait.
    source: RefCell<BufReader<R>>,
    delimiter: u8,
    header_pending: Cell<bool>,
}

/// Whether `text` stops inside a quoted field. A quote only opens a field
/// at its start, `""` inside a quoted field is an escaped quote.
fn ends_inside_quotes(text: &str, delimiter: u8) -> bool {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut after_close = false;
    for byte in text.bytes() {
        let quote = byte == b'"';
        if in_quotes {
            if quote {
                in_quotes = false;
                after_close = true;
            }
            continue;
        }
        if quote && (at_field_start || after_close) {
            in_quotes = true;
        }
        at_field_start = byte == delimiter || byte == b'\n';
        after_close = false;
    }
    in_quotes
}

impl<R: Read> CsvItemReader<R> {
    /// Next logical line without its terminator, `None` at end of input.
    ///
    /// Lines are joined while a quoted field is left open.
    fn next_line(&self) -> Result<Option<String>, BatchError> {
        let mut source = self.source.borrow_mut();
        let mut line = String::new();
        loop {
            let read = source
                .read_line(&mut line)
                .map_err(|error| BatchError::ItemReader(error.to_string()))?;
            if read == 0 || !ends_inside_quotes(&line, self.delimiter) {
                break;
            }
        }

        if line.is_empty() {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn parse(&self, line: &str) -> Result<Vec<String>, BatchError> {
        if line.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = ReaderBuilder::new()
            .trim(Trim::None)
            .delimiter(self.delimiter)
            .has_headers(false)
            // Row length is validated per row, not by the parser
            .flexible(true)
            .from_reader(line.as_bytes())
            .into_records();

        match records.next() {
            Some(Ok(record)) => Ok(record.iter().map(str::to_string).collect()),
            Some(Err(error)) => Err(BatchError::ItemReader(error.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

impl<R: Read, T: From<Vec<String>>> ItemReader<T> for CsvItemReader<R> {
    /// Reads the next row and converts its fields into `T`.
    ///
    /// # Returns
    /// - `Ok(Some(row))` if a line is read, blank lines give a row with no fields
    /// - `Ok(None)` if there are no more lines to read
    /// - `Err(BatchError::ItemReader(error))` if the line is not valid CSV or UTF-8
    fn read(&self) -> ItemReaderResult<T> {
        loop {
            let Some(line) = self.next_line()? else {
                return Ok(None);
            };
            if self.header_pending.replace(false) {
                continue;
            }
            return self.parse(&line).map(|fields| Some(T::from(fields)));
        }
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: semicolon (;)
/// - Lines: ended by `\r\n` or `\n`
/// - Headers: enabled, the header line is consumed and discarded
/// - Trimming: none
pub struct CsvItemReaderBuilder {
    /// The delimiter character (default: semicolon ';')
    delimiter: u8,
    /// Whether the first line is a header (default: true)
    has_headers: bool,
}

impl Default for CsvItemReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemReaderBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b';',
            has_headers: true,
        }
    }

    /// Sets the delimiter character for the CSV parsing.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether the first line is a header. The header is never returned
    /// as an item.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Creates a `CsvItemReader` from any source implementing `Read`.
    pub fn from_reader<R: Read>(self, rdr: R) -> CsvItemReader<R> {
        CsvItemReader {
            source: RefCell::new(BufReader::new(rdr)),
            delimiter: self.delimiter,
            header_pending: Cell::new(self.has_headers),
        }
    }

    /// Creates a `CsvItemReader` from a file path.
    ///
    /// # Errors
    /// Returns `BatchError::ItemReader` if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<File>, BatchError> {
        let file = File::open(path).map_err(|error| BatchError::ItemReader(error.to_string()))?;

        Ok(self.from_reader(file))
    }
}
