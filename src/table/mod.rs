//! Measurement tables read from loosely formatted delimited files.
//!
//! A [`MeasurementTable`] keeps the header exactly as found in the source and
//! one [`Record`] per data row, aligned with the header. Columns can only be
//! appended, never renamed or reordered.

pub mod dialect;

pub use dialect::{
    detect, detect_in_lines, detect_in_slice, sniff_line, DetectFailure, DetectOptions, Dialect,
    DialectDetection,
};

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::RoiError;

/// One data row, with values in header order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub values: Vec<String>,
}

impl Record {
    /// Creates a record from values in header order.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the value at a column index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

/// A header plus data rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasurementTable {
    /// The file the table was read from (a placeholder for in-memory tables).
    pub source: PathBuf,
    /// Field names in source order.
    pub headers: Vec<String>,
    /// Data rows in source order.
    pub records: Vec<Record>,
}

impl MeasurementTable {
    /// Creates a table from a header and rows.
    pub fn new(source: impl Into<PathBuf>, headers: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            source: source.into(),
            headers,
            records,
        }
    }

    /// Returns the column index of a field.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == field)
    }

    /// Returns the column index of a field, or [`RoiError::MissingKeyField`].
    pub fn require_field(&self, field: &str) -> Result<usize, RoiError> {
        self.field_index(field)
            .ok_or_else(|| RoiError::MissingKeyField {
                path: self.source.clone(),
                field: field.to_string(),
            })
    }

    /// Returns the value of a field in a record.
    pub fn value<'a>(&self, record: &'a Record, field: &str) -> Option<&'a str> {
        self.field_index(field).and_then(|i| record.get(i))
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn lossy_field(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Parses rows with the given dialect; the first row is the header.
fn parse_rows<R: Read>(
    reader: R,
    dialect: Dialect,
    source: &Path,
) -> Result<MeasurementTable, RoiError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let csv_err = |source_err: csv::Error| RoiError::CsvParse {
        path: source.to_path_buf(),
        source: source_err,
    };

    // Exports are not always UTF-8 (e.g. a Latin-1 "µm^2" in a header).
    let headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(csv_err)?
        .iter()
        .map(lossy_field)
        .collect();

    let mut records = Vec::new();
    for result in csv_reader.byte_records() {
        let row = result.map_err(csv_err)?;
        records.push(Record::new(row.iter().map(lossy_field)));
    }

    Ok(MeasurementTable::new(source, headers, records))
}

/// Reads a table from a file whose dialect has already been detected.
///
/// The file is read from `detection.offset` on; the preamble before it is
/// never parsed.
pub fn read_table(path: &Path, detection: &DialectDetection) -> Result<MeasurementTable, RoiError> {
    let mut file = File::open(path).map_err(RoiError::Io)?;
    file.seek(SeekFrom::Start(detection.offset))
        .map_err(RoiError::Io)?;

    let table = parse_rows(BufReader::new(file), detection.dialect, path)?;
    log::debug!(
        "{}: {} field(s), {} row(s)",
        path.display(),
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

/// Detects the dialect of a file and reads its table.
pub fn read_measurements(path: &Path, opts: &DetectOptions) -> Result<MeasurementTable, RoiError> {
    let detection = detect(path, opts)?;
    read_table(path, &detection)
}

/// Detects the dialect of in-memory text and reads its table.
///
/// Useful for testing without file I/O.
pub fn table_from_str(text: &str, opts: &DetectOptions) -> Result<MeasurementTable, RoiError> {
    let source = Path::new("<string>");
    let detection =
        detect_in_slice(text.as_bytes(), opts).map_err(|failure| RoiError::DialectNotFound {
            path: source.to_path_buf(),
            reason: failure.to_string(),
        })?;
    let body = &text.as_bytes()[detection.offset as usize..];
    parse_rows(body, detection.dialect, source)
}
