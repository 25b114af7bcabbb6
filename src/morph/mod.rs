//! Per-image morphometry.
//!
//! Two measurements are derived directly from regions, without any
//! correspondence step:
//!
//! - [`polygon_records`]: a manually drawn polygon yields its vertex count,
//!   area, and the scaled distance of every adjacent and non-adjacent vertex
//!   pair, as `Type, Image Name, Label, Value` rows.
//! - [`point_dump`]: a closed contour plus a set of marker points yields the
//!   image name and pixel size, the contour's area, centroid and Feret values, each marker's distance to the
//!   centroid, and the angle at the centroid between markers that are
//!   neighbours in label order, as `label \t value` lines.

mod records;

pub use records::{
    append_records, records_to_string, MeasureValue, MeasurementRecord, RecordType,
};

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::RoiError;
use crate::geometry::{
    adjacent_pairs, angle, centroid, distance, feret, non_adjacent_pairs, pixel_area, Scale,
    Vertex,
};
use crate::region::{Point, Region, RegionCollection, RegionView, ShapeKind};

/// Names boundary vertices `Point01`, `Point02`, ... in boundary order.
pub fn polygon_vertices(vertices: &[Point]) -> Vec<Vertex> {
    vertices
        .iter()
        .enumerate()
        .map(|(i, &p)| Vertex::new(format!("Point{:02}", i + 1), p))
        .collect()
}

/// Names marker points `point01`, `point02`, ... in archive order.
pub fn marker_vertices(points: &[Point]) -> Vec<Vertex> {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| Vertex::new(format!("point{:02}", i + 1), p))
        .collect()
}

/// Measures a polygon drawn on one image.
///
/// Emits, in order: the vertex count (`ball`), the area (`area`), the
/// distance of every adjacent vertex pair and then of every non-adjacent
/// pair (`line`). Vertices are paired in label order.
///
/// # Errors
/// Returns [`RoiError::RegionTypeMismatch`] unless `region` is a polygon.
pub fn polygon_records(
    image_name: &str,
    region: &Region,
    scale: Scale,
) -> Result<Vec<MeasurementRecord>, RoiError> {
    let vertices = region.require_polygon()?;
    let mut named = polygon_vertices(vertices);
    named.sort_by(|a, b| a.label.cmp(&b.label));

    let mut records = vec![
        MeasurementRecord::new(
            RecordType::Ball,
            image_name,
            "Ball Count",
            MeasureValue::Count(vertices.len()),
        ),
        MeasurementRecord::new(
            RecordType::Area,
            image_name,
            "Polygon",
            MeasureValue::Real(pixel_area(&region.contained_points(), scale)),
        ),
    ];

    let line = |prefix: &str, (a, b): (&Vertex, &Vertex)| {
        MeasurementRecord::new(
            RecordType::Line,
            image_name,
            format!("{}: {}-{}", prefix, a.label, b.label),
            MeasureValue::Real(distance(a.at, b.at, scale)),
        )
    };

    let refs: Vec<&Vertex> = named.iter().collect();
    records.extend(
        adjacent_pairs(&refs)
            .into_iter()
            .map(|pair| line("Consecutive", pair)),
    );
    records.extend(
        non_adjacent_pairs(&refs)
            .into_iter()
            .map(|pair| line("Nonconsecutive", pair)),
    );

    log::debug!(
        "{}: {} polygon record(s) from {} vertices",
        image_name,
        records.len(),
        vertices.len()
    );
    Ok(records)
}

/// Measurements of one contour and its marker points, as label/value lines.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PointDump {
    /// Measurement lines in output order.
    pub entries: Vec<(String, String)>,
    /// Angle labels skipped because their triangle was degenerate.
    pub skipped: Vec<String>,
}

impl PointDump {
    fn push(&mut self, label: impl Into<String>, value: impl ToString) {
        self.entries.push((label.into(), value.to_string()));
    }

    /// Returns the value recorded under a label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// Picks the contour and the marker points out of one image's regions.
///
/// The contour is the first traced region, or failing that the first
/// polygon; the markers are the first point set.
pub fn split_contour_and_markers(
    collection: &RegionCollection,
) -> Result<(&Region, &Region), RoiError> {
    let contour = collection
        .first_of_kind(ShapeKind::Traced)
        .or_else(|| collection.first_of_kind(ShapeKind::Polygon))
        .ok_or_else(|| RoiError::MissingRegion {
            collection: collection.name.clone(),
            expected: "traced or polygon".to_string(),
        })?;
    let markers =
        collection
            .first_of_kind(ShapeKind::PointSet)
            .ok_or_else(|| RoiError::MissingRegion {
                collection: collection.name.clone(),
                expected: ShapeKind::PointSet.to_string(),
            })?;
    Ok((contour, markers))
}

/// Measures marker points against the centroid of a closed contour.
///
/// Angles whose triangle is degenerate (a marker on the centroid) are left
/// out and listed in [`PointDump::skipped`].
///
/// # Errors
/// Returns [`RoiError::RegionTypeMismatch`] if `contour` has no closed
/// boundary or `markers` is not a point set, and [`RoiError::MissingRegion`]
/// if the contour covers no pixels.
pub fn point_dump(
    image_name: &str,
    contour: &Region,
    markers: &Region,
    scale: Scale,
) -> Result<PointDump, RoiError> {
    let boundary = contour.require_boundary()?;
    let points = markers.require_points()?;

    let pixels = contour.contained_points();
    let origin_at = centroid(&pixels).ok_or_else(|| RoiError::MissingRegion {
        collection: contour.label().to_string(),
        expected: "non-empty contour".to_string(),
    })?;
    let origin = Vertex::new("Ori", origin_at);

    let mut dump = PointDump::default();
    dump.push("PointCount", points.len());
    dump.push("Name", image_name);
    dump.push("PixelSize", scale.units_per_pixel());
    dump.push("Area", pixel_area(&pixels, scale));
    dump.push("Centroid", origin_at);
    if let Some(f) = feret(boundary, scale) {
        dump.push("Feret", f.max);
        dump.push("FeretAngle", f.angle);
        dump.push("MinFeret", f.min);
        dump.push("FeretX", f.start.x);
        dump.push("FeretY", f.start.y);
    }

    let mut markers = marker_vertices(points);
    markers.sort_by(|a, b| a.label.cmp(&b.label));
    for m in &markers {
        dump.push(format!("ori-{}", m.label), distance(origin.at, m.at, scale));
    }

    let refs: Vec<&Vertex> = markers.iter().collect();
    for (a, b) in adjacent_pairs(&refs) {
        let label = format!("{}-Ori-{}", a.label, b.label);
        match angle(&origin, a, b, scale) {
            Ok(deg) => dump.push(label, deg),
            Err(err) => {
                log::warn!("skipping {}: {}", label, err);
                dump.skipped.push(label);
            }
        }
    }

    Ok(dump)
}

/// Appends a point dump as `label \t value` lines, creating the file if absent.
pub fn write_dump(path: &Path, dump: &PointDump) -> Result<(), RoiError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(RoiError::Io)?;
    let csv_err = |source: csv::Error| RoiError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    for (label, value) in &dump.entries {
        writer.write_record([label, value]).map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| RoiError::Io(e.into_error()))?
        .flush()
        .map_err(RoiError::Io)
}
