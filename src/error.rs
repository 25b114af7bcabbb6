use std::path::PathBuf;
use thiserror::Error;

/// The main error type for roicoloc operations.
#[derive(Debug, Error)]
pub enum RoiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse region archive {path}: {source}")]
    RegionArchiveParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write region archive {path}: {source}")]
    RegionArchiveWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse delimited file {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write delimited file {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "Label collision in {collection} regions: '{label}' is used by regions {first} and {second}"
    )]
    LabelCollision {
        collection: String,
        label: String,
        first: usize,
        second: usize,
    },

    #[error("No consistent delimiter found in {path}: {reason}")]
    DialectNotFound { path: PathBuf, reason: String },

    #[error("Degenerate geometry for angle {p1}-{origin}-{p2}: {reason}")]
    DegenerateGeometry {
        origin: String,
        p1: String,
        p2: String,
        reason: String,
    },

    #[error("Region '{label}' is a {found} region, expected {expected}")]
    RegionTypeMismatch {
        label: String,
        expected: String,
        found: String,
    },

    #[error("Key field '{field}' not found in header of {path}")]
    MissingKeyField { path: PathBuf, field: String },

    #[error("Region collection '{collection}' has no {expected} region")]
    MissingRegion { collection: String, expected: String },

    #[error("Invalid pixel scale {value} (must be finite and positive)")]
    InvalidScale { value: f64 },

    #[error("Invalid iteration order: {reason}")]
    InvalidOrder { reason: String },

    #[error("{failed} of 2 measurement file(s) could not be processed")]
    ColocIncomplete { failed: usize },

    #[error("Failed to start logger: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),
}
