//! The co-localization pipeline.
//!
//! For one image: read both region archives, match them, then for each side
//! detect the measurement file's dialect, read it, append the derived column
//! and write `<stem>_proc.csv`. The two sides are processed independently
//! after matching, so a bad measurement file on one side still lets the
//! other side produce its output.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::RoiError;
use crate::matching::{match_regions_in_order, Correspondence, CorrespondenceView, MatchOrder};
use crate::merge::{merge, processed_path, write_table, MergeReport};
use crate::region::io_json::read_region_archive;
use crate::table::{read_measurements, DetectOptions};

/// Input files for one co-localization run.
#[derive(Clone, Debug)]
pub struct ColocInputs {
    pub primary_rois: PathBuf,
    pub secondary_rois: PathBuf,
    pub primary_csv: PathBuf,
    pub secondary_csv: PathBuf,
}

/// Options for a co-localization run.
#[derive(Clone, Debug)]
pub struct ColocOptions {
    /// Key column of the primary measurement table.
    pub primary_key: String,
    /// Key column of the secondary measurement table.
    pub secondary_key: String,
    /// Column appended to the primary table (overlap count).
    pub primary_field: String,
    /// Column appended to the secondary table (owning primary label).
    pub secondary_field: String,
    /// Order in which primary regions claim secondary ones.
    pub order: MatchOrder,
    /// Dialect detection settings for both measurement files.
    pub detect: DetectOptions,
}

impl Default for ColocOptions {
    fn default() -> Self {
        Self {
            primary_key: "Mito #".to_string(),
            secondary_key: "Label".to_string(),
            primary_field: "ColocalizedRois".to_string(),
            secondary_field: "ColocalizedMito".to_string(),
            order: MatchOrder::Collection,
            detect: DetectOptions::default(),
        }
    }
}

/// Result of merging one measurement file.
#[derive(Debug, Serialize)]
pub struct SideOutcome {
    pub output: PathBuf,
    pub report: MergeReport,
}

/// Result of a co-localization run.
#[derive(Debug)]
pub struct ColocOutcome {
    pub correspondence: Correspondence,
    pub primary: Result<SideOutcome, RoiError>,
    pub secondary: Result<SideOutcome, RoiError>,
}

impl ColocOutcome {
    /// Returns true if both sides were written.
    pub fn is_complete(&self) -> bool {
        self.primary.is_ok() && self.secondary.is_ok()
    }
}

/// Reads, merges and writes one measurement file.
pub fn process_side(
    csv_path: &Path,
    view: &CorrespondenceView,
    key_field: &str,
    derived_field: &str,
    detect: &DetectOptions,
) -> Result<SideOutcome, RoiError> {
    let table = read_measurements(csv_path, detect)?;
    let (merged, report) = merge(&table, view, key_field, derived_field)?;
    let output = processed_path(csv_path);
    write_table(&output, &merged)?;
    Ok(SideOutcome { output, report })
}

/// Runs the full pipeline for one image.
///
/// # Errors
/// Region archive and matching failures abort the run, since no
/// correspondence exists without them. Failures while processing one
/// measurement file are returned inside the outcome for that side.
pub fn run_coloc(inputs: &ColocInputs, opts: &ColocOptions) -> Result<ColocOutcome, RoiError> {
    let primary_regions = read_region_archive(&inputs.primary_rois)?;
    let secondary_regions = read_region_archive(&inputs.secondary_rois)?;
    let correspondence = match_regions_in_order(&primary_regions, &secondary_regions, &opts.order)?;

    let primary = process_side(
        &inputs.primary_csv,
        &correspondence.overlap_count_view(),
        &opts.primary_key,
        &opts.primary_field,
        &opts.detect,
    );
    if let Err(err) = &primary {
        log::error!("{}: {}", inputs.primary_csv.display(), err);
    }

    let secondary = process_side(
        &inputs.secondary_csv,
        &correspondence.owner_view(),
        &opts.secondary_key,
        &opts.secondary_field,
        &opts.detect,
    );
    if let Err(err) = &secondary {
        log::error!("{}: {}", inputs.secondary_csv.display(), err);
    }

    Ok(ColocOutcome {
        correspondence,
        primary,
        secondary,
    })
}
