//! `Type, Image Name, Label, Value` measurement rows.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::RoiError;

/// What a measurement row describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Number of polygon vertices (one per marked ball).
    Ball,
    /// Area enclosed by the polygon.
    Area,
    /// Distance between two vertices.
    Line,
}

/// A measured value: a count or a physical quantity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Count(usize),
    Real(f64),
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureValue::Count(n) => write!(f, "{}", n),
            MeasureValue::Real(v) => write!(f, "{}", v),
        }
    }
}

/// One row of a per-image measurement file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeasurementRecord {
    #[serde(rename = "Type")]
    pub kind: RecordType,
    #[serde(rename = "Image Name")]
    pub image_name: String,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Value")]
    pub value: MeasureValue,
}

impl MeasurementRecord {
    pub fn new(
        kind: RecordType,
        image_name: impl Into<String>,
        label: impl Into<String>,
        value: MeasureValue,
    ) -> Self {
        Self {
            kind,
            image_name: image_name.into(),
            label: label.into(),
            value,
        }
    }
}

fn write_records<W: Write>(
    writer: W,
    records: &[MeasurementRecord],
    with_header: bool,
    path: &Path,
) -> Result<W, RoiError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(writer);
    for record in records {
        csv_writer
            .serialize(record)
            .map_err(|source| RoiError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }
    // A header is only emitted together with the first row.
    if with_header && records.is_empty() {
        csv_writer
            .write_record(["Type", "Image Name", "Label", "Value"])
            .map_err(|source| RoiError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }
    csv_writer
        .into_inner()
        .map_err(|e| RoiError::Io(e.into_error()))
}

/// Appends records to a measurement file, creating it with a header if needed.
///
/// Several images can be measured into the same file; the header is written
/// only when the file is new or empty.
pub fn append_records(path: &Path, records: &[MeasurementRecord]) -> Result<(), RoiError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(RoiError::Io)?;
    let with_header = file.metadata().map_err(RoiError::Io)?.len() == 0;

    write_records(BufWriter::new(file), records, with_header, path)?
        .flush()
        .map_err(RoiError::Io)?;
    log::info!("appended {} record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Writes records with a header to a string.
///
/// Useful for testing without file I/O.
pub fn records_to_string(records: &[MeasurementRecord]) -> Result<String, RoiError> {
    let bytes = write_records(Vec::new(), records, true, Path::new("<string>"))?;
    String::from_utf8(bytes)
        .map_err(|e| RoiError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MeasurementRecord> {
        vec![
            MeasurementRecord::new(
                RecordType::Ball,
                "a.tif",
                "Ball Count",
                MeasureValue::Count(5),
            ),
            MeasurementRecord::new(
                RecordType::Line,
                "a.tif",
                "Consecutive: Point05-Point01",
                MeasureValue::Real(1.25),
            ),
        ]
    }

    #[test]
    fn test_records_to_string() {
        let text = records_to_string(&sample()).unwrap();
        assert_eq!(
            text,
            "Type,Image Name,Label,Value\n\
             ball,a.tif,Ball Count,5\n\
             line,a.tif,Consecutive: Point05-Point01,1.25\n"
        );
    }

    #[test]
    fn test_empty_records_still_get_header() {
        assert_eq!(records_to_string(&[]).unwrap(), "Type,Image Name,Label,Value\n");
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("measurement.csv");
        append_records(&path, &sample()).unwrap();
        append_records(&path, &sample()[..1]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("Type,Image Name").count(), 1);
        assert_eq!(text.lines().count(), 4);
    }
}
