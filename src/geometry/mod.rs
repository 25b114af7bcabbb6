//! Polygon vertex geometry.
//!
//! Pure functions over labeled points: scaled distances, angles by the law of
//! cosines, adjacency enumeration over a closed boundary, and the shape
//! descriptors (area, centroid, Feret values) derived from a region's pixels
//! and boundary. Nothing here touches files or the host application.

mod pairs;
mod shape;

pub use pairs::{adjacent_pairs, non_adjacent_pairs};
pub use shape::{centroid, convex_hull, feret, pixel_area, FeretValues};

use serde::{Deserialize, Serialize};

use crate::error::RoiError;
use crate::region::Coord;

/// Slack allowed on the cosine before a triangle counts as inconsistent.
pub const ANGLE_TOLERANCE: f64 = 1e-9;

/// Physical size of one pixel (units per pixel).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scale(f64);

impl Scale {
    /// One unit per pixel, i.e. distances stay in pixels.
    pub const PIXEL: Scale = Scale(1.0);

    /// Creates a scale, rejecting zero, negative and non-finite values.
    pub fn new(units_per_pixel: f64) -> Result<Self, RoiError> {
        if units_per_pixel.is_finite() && units_per_pixel > 0.0 {
            Ok(Self(units_per_pixel))
        } else {
            Err(RoiError::InvalidScale {
                value: units_per_pixel,
            })
        }
    }

    /// Returns the size of one pixel in physical units.
    #[inline]
    pub fn units_per_pixel(&self) -> f64 {
        self.0
    }

    /// Returns the physical area of one pixel.
    #[inline]
    pub fn pixel_area(&self) -> f64 {
        self.0 * self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::PIXEL
    }
}

/// A labeled point in pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Vertex {
    pub label: String,
    pub at: Coord,
}

impl Vertex {
    /// Creates a labeled point.
    pub fn new(label: impl Into<String>, at: impl Into<Coord>) -> Self {
        Self {
            label: label.into(),
            at: at.into(),
        }
    }
}

/// Euclidean distance between two pixel positions, in physical units.
///
/// Always non-negative, symmetric, and zero exactly when `p1 == p2`.
pub fn distance(p1: Coord, p2: Coord, scale: Scale) -> f64 {
    (p1.x - p2.x).hypot(p1.y - p2.y) * scale.units_per_pixel()
}

/// Angle in degrees at `origin` in the triangle `origin`, `p1`, `p2`.
///
/// The three sides are scaled distances and the angle follows from the law of
/// cosines.
///
/// # Errors
/// Returns [`RoiError::DegenerateGeometry`] when a vertex has a non-finite
/// coordinate, when `origin` coincides with `p1` or `p2`, or when the sides
/// are inconsistent beyond [`ANGLE_TOLERANCE`].
pub fn angle(origin: &Vertex, p1: &Vertex, p2: &Vertex, scale: Scale) -> Result<f64, RoiError> {
    let degenerate = |reason: &str| RoiError::DegenerateGeometry {
        origin: origin.label.clone(),
        p1: p1.label.clone(),
        p2: p2.label.clone(),
        reason: reason.to_string(),
    };

    if let Some(bad) = [origin, p1, p2].into_iter().find(|v| !v.at.is_finite()) {
        return Err(degenerate(&format!(
            "{} has a non-finite coordinate {}",
            bad.label, bad.at
        )));
    }

    let a = distance(origin.at, p1.at, scale);
    let b = distance(origin.at, p2.at, scale);
    let c = distance(p1.at, p2.at, scale);

    if a == 0.0 {
        return Err(degenerate(&format!("{} coincides with the origin", p1.label)));
    }
    if b == 0.0 {
        return Err(degenerate(&format!("{} coincides with the origin", p2.label)));
    }

    angle_from_sides(a, b, c).ok_or_else(|| {
        degenerate(&format!(
            "sides {a}, {b}, {c} violate the triangle inequality"
        ))
    })
}

/// Angle in degrees opposite side `c`, or `None` if the sides cannot form a
/// triangle.
fn angle_from_sides(a: f64, b: f64, c: f64) -> Option<f64> {
    let cos = (a * a + b * b - c * c) / (2.0 * a * b);
    if !cos.is_finite() || cos.abs() > 1.0 + ANGLE_TOLERANCE {
        return None;
    }
    Some(cos.clamp(-1.0, 1.0).acos().to_degrees())
}
