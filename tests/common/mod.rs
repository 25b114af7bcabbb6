#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use roicoloc::region::io_json::write_region_archive;
use roicoloc::region::{Point, Region, RegionCollection};

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write file");
}

pub fn write_archive(path: &Path, collection: &RegionCollection) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    write_region_archive(path, collection).expect("write region archive");
}

/// The 2x2 block at (x, y) as a point set.
pub fn block(label: &str, x: i32, y: i32) -> Region {
    Region::point_set(
        label,
        vec![
            Point::new(x, y),
            Point::new(x, y + 1),
            Point::new(x + 1, y),
            Point::new(x + 1, y + 1),
        ],
    )
}

pub fn pixel(label: &str, x: i32, y: i32) -> Region {
    Region::point_set(label, vec![Point::new(x, y)])
}

/// Paths of one mitochondria/foci image pair inside `dir`.
pub struct ImagePair {
    pub mito_rois: PathBuf,
    pub foci_rois: PathBuf,
    pub mito_csv: PathBuf,
    pub foci_csv: PathBuf,
}

/// Writes the reference image: M1 covers F1, F2 lies elsewhere.
pub fn write_reference_pair(dir: &Path) -> ImagePair {
    let pair = ImagePair {
        mito_rois: dir.join("cell01_mito.json"),
        foci_rois: dir.join("cell01_foci.json"),
        mito_csv: dir.join("cell01_mito.csv"),
        foci_csv: dir.join("cell01_foci.csv"),
    };

    write_archive(
        &pair.mito_rois,
        &RegionCollection::new("cell01_mito", vec![block("M1", 0, 0)]),
    );
    write_archive(
        &pair.foci_rois,
        &RegionCollection::new("cell01_foci", vec![pixel("F1", 0, 0), pixel("F2", 5, 5)]),
    );
    write_file(&pair.mito_csv, "Mito #,Value\nM1,10\n");
    write_file(&pair.foci_csv, "Label,Area\nF1,1\nF2,1\n");
    pair
}
