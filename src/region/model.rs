//! Region data model.
//!
//! Regions are produced upstream (by a region manager or an archive on disk)
//! and are read-only inputs here. Each variant carries exactly the data its
//! shape needs: closed boundaries keep their ordered vertices, point sets
//! keep their marker positions.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use super::coord::Point;
use super::raster;
use crate::error::RoiError;

/// The shape kind of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// A closed polygon drawn vertex by vertex.
    Polygon,
    /// A set of discrete marker points.
    PointSet,
    /// A closed contour traced along an object outline.
    Traced,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::PointSet => "point set",
            ShapeKind::Traced => "traced",
        };
        f.write_str(name)
    }
}

/// Capability shared by everything that can take part in overlap matching.
///
/// `contains_point(p)` must agree with `contained_points().contains(&p)`;
/// implementors may answer it without materializing the point set.
pub trait RegionView {
    /// The raw (un-normalized) label of the region.
    fn label(&self) -> &str;

    /// The integer pixels covered by the region.
    fn contained_points(&self) -> Cow<'_, BTreeSet<Point>>;

    /// Returns true if the region covers pixel `p`.
    fn contains_point(&self, p: Point) -> bool {
        self.contained_points().contains(&p)
    }
}

/// A labeled region of interest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    Polygon { label: String, vertices: Vec<Point> },
    PointSet { label: String, points: Vec<Point> },
    Traced { label: String, vertices: Vec<Point> },
}

impl Region {
    /// Creates a polygon region.
    pub fn polygon(label: impl Into<String>, vertices: Vec<Point>) -> Self {
        Region::Polygon {
            label: label.into(),
            vertices,
        }
    }

    /// Creates a point-set region.
    pub fn point_set(label: impl Into<String>, points: Vec<Point>) -> Self {
        Region::PointSet {
            label: label.into(),
            points,
        }
    }

    /// Creates a traced-contour region.
    pub fn traced(label: impl Into<String>, vertices: Vec<Point>) -> Self {
        Region::Traced {
            label: label.into(),
            vertices,
        }
    }

    /// Returns the shape kind of this region.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Region::Polygon { .. } => ShapeKind::Polygon,
            Region::PointSet { .. } => ShapeKind::PointSet,
            Region::Traced { .. } => ShapeKind::Traced,
        }
    }

    /// Returns the ordered boundary of a polygon or traced region.
    pub fn boundary(&self) -> Option<&[Point]> {
        match self {
            Region::Polygon { vertices, .. } | Region::Traced { vertices, .. } => Some(vertices),
            Region::PointSet { .. } => None,
        }
    }

    /// Returns the boundary, or a [`RoiError::RegionTypeMismatch`] for point sets.
    pub fn require_boundary(&self) -> Result<&[Point], RoiError> {
        self.boundary().ok_or_else(|| self.mismatch("a closed boundary"))
    }

    /// Returns the vertices if this is a polygon.
    pub fn require_polygon(&self) -> Result<&[Point], RoiError> {
        match self {
            Region::Polygon { vertices, .. } => Ok(vertices),
            _ => Err(self.mismatch("polygon")),
        }
    }

    /// Returns the marker points if this is a point set.
    pub fn require_points(&self) -> Result<&[Point], RoiError> {
        match self {
            Region::PointSet { points, .. } => Ok(points),
            _ => Err(self.mismatch("point set")),
        }
    }

    fn mismatch(&self, expected: &str) -> RoiError {
        RoiError::RegionTypeMismatch {
            label: self.label().to_string(),
            expected: expected.to_string(),
            found: self.kind().to_string(),
        }
    }
}

impl RegionView for Region {
    fn label(&self) -> &str {
        match self {
            Region::Polygon { label, .. }
            | Region::PointSet { label, .. }
            | Region::Traced { label, .. } => label,
        }
    }

    fn contained_points(&self) -> Cow<'_, BTreeSet<Point>> {
        match self {
            Region::Polygon { vertices, .. } | Region::Traced { vertices, .. } => {
                Cow::Owned(raster::rasterize(vertices))
            }
            Region::PointSet { points, .. } => Cow::Owned(points.iter().copied().collect()),
        }
    }

    fn contains_point(&self, p: Point) -> bool {
        match self {
            Region::Polygon { vertices, .. } | Region::Traced { vertices, .. } => {
                raster::contains_pixel(vertices, p)
            }
            Region::PointSet { points, .. } => points.contains(&p),
        }
    }
}

/// An ordered collection of regions sharing one channel or purpose.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionCollection {
    /// What the collection holds (e.g. "mitochondria", "flag").
    #[serde(default)]
    pub name: String,

    /// The regions, in the order the upstream tool produced them.
    pub regions: Vec<Region>,
}

impl RegionCollection {
    /// Creates a named collection.
    pub fn new(name: impl Into<String>, regions: Vec<Region>) -> Self {
        Self {
            name: name.into(),
            regions,
        }
    }

    /// Returns the number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns true if the collection holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns the first region of the given kind.
    pub fn first_of_kind(&self, kind: ShapeKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind() == kind)
    }
}
