//! Joining measurement tables with an overlap correspondence.
//!
//! Each row's key is normalized like a region label, looked up in a
//! [`CorrespondenceView`], and the result is appended as a new last column.
//! Rows without an entry get an empty value and a diagnostic; they never
//! fail the merge.

mod report;

pub use report::{MergeContext, MergeIssue, MergeIssueCode, MergeReport};

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::RoiError;
use crate::matching::CorrespondenceView;
use crate::region::Label;
use crate::table::{MeasurementTable, Record};

/// Suffix appended to the input stem to name merge output.
pub const PROCESSED_SUFFIX: &str = "_proc.csv";

/// Appends a derived column to a table using a correspondence view.
///
/// The output header is the input header followed by `derived_field`. Short
/// rows are padded with empty values so that the derived value always lands
/// in the last column; values beyond the header are dropped and reported.
///
/// # Errors
/// Returns [`RoiError::MissingKeyField`] if `key_field` is not in the header.
pub fn merge(
    table: &MeasurementTable,
    view: &CorrespondenceView,
    key_field: &str,
    derived_field: &str,
) -> Result<(MeasurementTable, MergeReport), RoiError> {
    let key_index = table.require_field(key_field)?;
    let width = table.headers.len();
    let mut report = MergeReport::new(table.source.display().to_string(), derived_field);
    report.rows = table.len();

    if table.field_index(derived_field).is_some() {
        report.add(MergeIssue::new(
            MergeIssueCode::DuplicateField,
            format!("'{}' already exists and is appended again", derived_field),
            MergeContext::Header,
        ));
    }

    let mut headers = table.headers.clone();
    headers.push(derived_field.to_string());

    let mut seen: BTreeSet<Label> = BTreeSet::new();
    let mut records = Vec::with_capacity(table.len());

    for (index, record) in table.records.iter().enumerate() {
        let raw_key = record.get(key_index).unwrap_or_default();
        let key = Label::normalize(raw_key);

        let mut values = record.values.clone();
        if values.len() > width {
            report.add(MergeIssue::new(
                MergeIssueCode::RaggedRow,
                format!("{} value(s) beyond the header dropped", values.len() - width),
                MergeContext::Row {
                    index,
                    key: raw_key.to_string(),
                },
            ));
        }
        values.resize(width, String::new());

        let derived = match view.get(&key) {
            Some(value) => {
                report.matched += 1;
                value.clone().unwrap_or_default()
            }
            None => {
                report.add(MergeIssue::new(
                    MergeIssueCode::MissingCorrespondence,
                    format!("key '{}' has no correspondence entry", key),
                    MergeContext::Row {
                        index,
                        key: raw_key.to_string(),
                    },
                ));
                String::new()
            }
        };
        values.push(derived);
        records.push(Record { values });
        seen.insert(key);
    }

    for label in view.keys().filter(|label| !seen.contains(*label)) {
        report.add(MergeIssue::new(
            MergeIssueCode::UnmatchedCorrespondence,
            format!("no row with {} '{}'", key_field, label),
            MergeContext::Label {
                label: label.to_string(),
            },
        ));
    }

    if !report.is_clean() {
        log::warn!(
            "{}: {} row(s) without correspondence, {} correspondence label(s) without row",
            report.source,
            report.missing_count(),
            report.unmatched_count()
        );
    }

    let merged = MeasurementTable::new(table.source.clone(), headers, records);
    Ok((merged, report))
}

/// Returns the output path for a merged table: `<stem>_proc.csv` next to the input.
pub fn processed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    input.with_file_name(format!("{}{}", stem, PROCESSED_SUFFIX))
}

fn write_csv<W: Write>(writer: W, table: &MeasurementTable, path: &Path) -> Result<W, RoiError> {
    let csv_err = |source: csv::Error| RoiError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    csv_writer.write_record(&table.headers).map_err(csv_err)?;
    for record in &table.records {
        csv_writer.write_record(&record.values).map_err(csv_err)?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| RoiError::Io(e.into_error()))
}

/// Writes a table as comma-delimited text with a header row.
pub fn write_table(path: &Path, table: &MeasurementTable) -> Result<(), RoiError> {
    let file = File::create(path).map_err(RoiError::Io)?;
    write_csv(BufWriter::new(file), table, path)?
        .flush()
        .map_err(RoiError::Io)?;
    log::info!("wrote {} row(s) to {}", table.len(), path.display());
    Ok(())
}

/// Writes a table to a comma-delimited string.
///
/// Useful for testing without file I/O.
pub fn table_to_string(table: &MeasurementTable) -> Result<String, RoiError> {
    let dummy_path = Path::new("<string>");
    let bytes = write_csv(Vec::new(), table, dummy_path)?;
    String::from_utf8(bytes).map_err(|e| {
        RoiError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mito_table() -> MeasurementTable {
        MeasurementTable::new(
            "mito.csv",
            vec!["Mito #".into(), "Value".into()],
            vec![Record::new(["M1", "10"]), Record::new(["M 2", "7"])],
        )
    }

    fn view(entries: &[(&str, Option<&str>)]) -> CorrespondenceView {
        entries
            .iter()
            .map(|(k, v)| (Label::from(*k), v.map(String::from)))
            .collect()
    }

    #[test]
    fn test_merge_appends_derived_column() {
        let (merged, report) = merge(
            &mito_table(),
            &view(&[("M1", Some("1")), ("M2", Some("0"))]),
            "Mito #",
            "ColocalizedRois",
        )
        .unwrap();

        assert_eq!(merged.headers, vec!["Mito #", "Value", "ColocalizedRois"]);
        assert_eq!(merged.records[0], Record::new(["M1", "10", "1"]));
        // Keys are normalized before lookup.
        assert_eq!(merged.records[1], Record::new(["M 2", "7", "0"]));
        assert_eq!(report.matched, 2);
        assert!(report.is_clean());
    }

    #[test]
    fn test_merge_with_empty_view() {
        let table = mito_table();
        let (merged, report) = merge(&table, &CorrespondenceView::new(), "Mito #", "X").unwrap();

        assert_eq!(merged.len(), table.len());
        assert_eq!(&merged.headers[..2], &table.headers[..]);
        for (before, after) in table.records.iter().zip(&merged.records) {
            assert_eq!(&after.values[..2], &before.values[..]);
            assert_eq!(after.values[2], "");
        }
        assert_eq!(report.missing_count(), 2);
        assert_eq!(report.matched, 0);
    }

    #[test]
    fn test_known_label_without_partner_is_not_missing() {
        let table = MeasurementTable::new(
            "flag.csv",
            vec!["Label".into()],
            vec![Record::new(["F2"])],
        );
        let (merged, report) =
            merge(&table, &view(&[("F2", None)]), "Label", "ColocalizedMito").unwrap();
        assert_eq!(merged.records[0], Record::new(["F2", ""]));
        assert!(report.is_clean());
    }

    #[test]
    fn test_unmatched_correspondence_is_reported() {
        let (_, report) = merge(
            &mito_table(),
            &view(&[("M1", Some("1")), ("M2", Some("0")), ("M9", Some("3"))]),
            "Mito #",
            "ColocalizedRois",
        )
        .unwrap();
        assert_eq!(report.unmatched_count(), 1);
        assert!(report.to_string().contains("M9"));
    }

    #[test]
    fn test_ragged_rows_align_derived_value() {
        let table = MeasurementTable::new(
            "t.csv",
            vec!["Label".into(), "A".into(), "B".into()],
            vec![Record::new(["F1"]), Record::new(["F2", "1", "2", "extra"])],
        );
        let (merged, report) =
            merge(&table, &view(&[("F1", Some("M1")), ("F2", None)]), "Label", "D").unwrap();
        assert_eq!(merged.records[0], Record::new(["F1", "", "", "M1"]));
        assert_eq!(merged.records[1], Record::new(["F2", "1", "2", ""]));
        assert_eq!(report.count(MergeIssueCode::RaggedRow), 1);
    }

    #[test]
    fn test_missing_key_field_fails() {
        let err = merge(&mito_table(), &view(&[]), "Label", "D").unwrap_err();
        assert!(matches!(err, RoiError::MissingKeyField { .. }));
    }

    #[test]
    fn test_processed_path() {
        assert_eq!(
            processed_path(Path::new("/data/run1/mito.csv")),
            PathBuf::from("/data/run1/mito_proc.csv")
        );
        assert_eq!(processed_path(Path::new("flag")), PathBuf::from("flag_proc.csv"));
    }

    #[test]
    fn test_table_to_string_quotes_when_needed() {
        let table = MeasurementTable::new(
            "t.csv",
            vec!["Label".into(), "Note".into()],
            vec![Record::new(["F1", "a, \"b\""])],
        );
        let text = table_to_string(&table).unwrap();
        assert_eq!(text, "Label,Note\nF1,\"a, \"\"b\"\"\"\n");
    }

    #[test]
    fn test_write_table_roundtrips_through_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mito_proc.csv");
        let (merged, _) = merge(&mito_table(), &view(&[("M1", Some("1"))]), "Mito #", "C").unwrap();
        write_table(&path, &merged).unwrap();

        let opts = crate::table::DetectOptions::default();
        let restored = crate::table::read_measurements(&path, &opts).unwrap();
        assert_eq!(restored.headers, merged.headers);
        assert_eq!(restored.records, merged.records);
    }
}
