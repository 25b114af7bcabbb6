//! Region archive reader and writer.
//!
//! A region archive is a JSON document holding one [`RegionCollection`]:
//!
//! ```json
//! {
//!   "name": "mitochondria",
//!   "regions": [
//!     { "kind": "polygon", "label": "M1", "vertices": [[0, 0], [4, 0], [4, 4]] },
//!     { "kind": "point_set", "label": "balls", "points": [[1, 1], [2, 2]] }
//!   ]
//! }
//! ```
//!
//! When the archive carries no name, the reader names the collection after
//! the file stem.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::model::RegionCollection;
use crate::error::RoiError;

/// Reads a region collection from an archive file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_region_archive(path: &Path) -> Result<RegionCollection, RoiError> {
    let file = File::open(path).map_err(RoiError::Io)?;
    let reader = BufReader::new(file);

    let mut collection: RegionCollection =
        serde_json::from_reader(reader).map_err(|source| RoiError::RegionArchiveParse {
            path: path.to_path_buf(),
            source,
        })?;

    if collection.name.is_empty() {
        if let Some(stem) = path.file_stem() {
            collection.name = stem.to_string_lossy().into_owned();
        }
    }

    log::debug!(
        "read {} region(s) from {}",
        collection.len(),
        path.display()
    );
    Ok(collection)
}

/// Writes a region collection to an archive file.
pub fn write_region_archive(path: &Path, collection: &RegionCollection) -> Result<(), RoiError> {
    let file = File::create(path).map_err(RoiError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, collection).map_err(|source| {
        RoiError::RegionArchiveWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(RoiError::Io)
}

/// Reads a region collection from an archive string.
///
/// Useful for testing without file I/O.
pub fn from_archive_str(json: &str) -> Result<RegionCollection, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a region collection from archive bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_archive_slice(bytes: &[u8]) -> Result<RegionCollection, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Fuzz-only entrypoint: parses an archive and rasterizes its small regions.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_archive(bytes: &[u8]) -> Result<usize, serde_json::Error> {
    use super::model::RegionView;

    const MAX_EXTENT: i64 = 512;
    let collection = from_archive_slice(bytes)?;
    let mut pixels = 0;
    for region in &collection.regions {
        let Some(boundary) = region.boundary() else {
            continue;
        };
        let extent = |coord: fn(&super::coord::Point) -> i32| {
            let min = boundary.iter().map(coord).min().unwrap_or(0) as i64;
            let max = boundary.iter().map(coord).max().unwrap_or(0) as i64;
            max - min
        };
        if extent(|p| p.x) <= MAX_EXTENT && extent(|p| p.y) <= MAX_EXTENT {
            pixels += region.contained_points().len();
        }
    }
    Ok(pixels)
}

/// Writes a region collection to an archive string.
pub fn to_archive_string(collection: &RegionCollection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{Point, Region, ShapeKind};

    #[test]
    fn test_archive_roundtrip() {
        let original = RegionCollection::new(
            "mito",
            vec![
                Region::polygon("M1", vec![Point::new(0, 0), Point::new(4, 0), Point::new(4, 4)]),
                Region::point_set("F1", vec![Point::new(1, 1)]),
                Region::traced("cell", vec![Point::new(0, 0), Point::new(9, 0), Point::new(0, 9)]),
            ],
        );

        let json = to_archive_string(&original).expect("serialization failed");
        let restored = from_archive_str(&json).expect("deserialization failed");
        assert_eq!(original, restored);
    }

    #[test]
    fn test_archive_without_name_takes_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flag_rois.json");
        std::fs::write(
            &path,
            r#"{"regions": [{"kind": "polygon", "label": "F1", "vertices": [[0,0],[2,0],[2,2]]}]}"#,
        )
        .unwrap();

        let collection = read_region_archive(&path).expect("read failed");
        assert_eq!(collection.name, "flag_rois");
        assert_eq!(collection.regions[0].kind(), ShapeKind::Polygon);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"regions": [{"kind": "ellipse", "label": "E"}]}"#;
        assert!(from_archive_str(json).is_err());
    }
}
