//! Shape descriptors of a single region.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{distance, Scale};
use crate::region::{Coord, Point};

/// Physical area covered by a set of pixels.
pub fn pixel_area(pixels: &BTreeSet<Point>, scale: Scale) -> f64 {
    pixels.len() as f64 * scale.pixel_area()
}

/// Centroid of a set of pixels, taken over pixel centres.
///
/// Returns `None` for an empty set.
pub fn centroid(pixels: &BTreeSet<Point>) -> Option<Coord> {
    if pixels.is_empty() {
        return None;
    }
    let n = pixels.len() as f64;
    let (sx, sy) = pixels.iter().fold((0.0, 0.0), |(sx, sy), p| {
        let c = p.center();
        (sx + c.x, sy + c.y)
    });
    Some(Coord::new(sx / n, sy / n))
}

fn cross(o: Coord, a: Coord, b: Coord) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull by the monotone chain algorithm.
///
/// Collinear and duplicate points are dropped. The hull is returned without
/// repeating its first point.
pub fn convex_hull(points: &[Coord]) -> Vec<Coord> {
    let mut sorted: Vec<Coord> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let reversed: Vec<Coord> = sorted.iter().rev().copied().collect();
    let mut hull: Vec<Coord> = Vec::with_capacity(sorted.len() * 2);
    for pass in [&sorted, &reversed] {
        let start = hull.len();
        for &p in pass {
            while hull.len() >= start + 2
                && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
            {
                hull.pop();
            }
            hull.push(p);
        }
        // The last point of each chain starts the other one.
        hull.pop();
    }
    hull
}

/// Caliper measurements of a closed boundary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeretValues {
    /// Largest distance between two boundary vertices (physical units).
    pub max: f64,
    /// Angle of the maximum caliper against the x axis, in `[0, 180)` degrees.
    pub angle: f64,
    /// Smallest caliper width (physical units).
    pub min: f64,
    /// Start point of the maximum caliper, in pixels.
    pub start: Coord,
}

/// Computes the Feret values of a boundary.
///
/// Returns `None` for an empty boundary.
pub fn feret(vertices: &[Point], scale: Scale) -> Option<FeretValues> {
    let coords: Vec<Coord> = vertices.iter().copied().map(Coord::from).collect();
    let hull = convex_hull(&coords);
    let first = *hull.first()?;

    let (mut p1, mut p2, mut best) = (first, first, 0.0);
    for (i, &a) in hull.iter().enumerate() {
        for &b in &hull[i + 1..] {
            let d = distance(a, b, Scale::PIXEL);
            if d > best {
                (p1, p2, best) = (a, b, d);
            }
        }
    }
    // Start from the leftmost end so the angle is measured left to right.
    if (p2.x, p2.y) < (p1.x, p1.y) {
        std::mem::swap(&mut p1, &mut p2);
    }

    // Image rows grow downwards, so flip y to get a counter-clockwise angle.
    let mut angle = (p1.y - p2.y).atan2(p2.x - p1.x).to_degrees();
    if angle < 0.0 {
        angle += 180.0;
    }
    if angle >= 180.0 {
        angle -= 180.0;
    }

    let min_width = if hull.len() < 3 {
        0.0
    } else {
        (0..hull.len())
            .map(|i| {
                let a = hull[i];
                let b = hull[(i + 1) % hull.len()];
                let edge = distance(a, b, Scale::PIXEL);
                hull.iter()
                    .map(|&p| cross(a, b, p).abs() / edge)
                    .fold(0.0, f64::max)
            })
            .fold(f64::INFINITY, f64::min)
    };

    Some(FeretValues {
        max: best * scale.units_per_pixel(),
        angle,
        min: min_width * scale.units_per_pixel(),
        start: p1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::raster::rasterize;

    fn rect(w: i32, h: i32) -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(w, h),
            Point::new(0, h),
        ]
    }

    #[test]
    fn test_pixel_area_and_centroid() {
        let pixels = rasterize(&rect(4, 2));
        assert_eq!(pixel_area(&pixels, Scale::new(0.5).unwrap()), 2.0);
        assert_eq!(centroid(&pixels), Some(Coord::new(2.0, 1.0)));
        assert_eq!(centroid(&BTreeSet::new()), None);
    }

    #[test]
    fn test_convex_hull_drops_interior_and_collinear_points() {
        let points = [
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 4.0),
            Coord::new(0.0, 4.0),
            Coord::new(2.0, 2.0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Coord::new(2.0, 2.0)));
        assert!(!hull.contains(&Coord::new(2.0, 0.0)));
    }

    #[test]
    fn test_feret_of_rectangle() {
        let values = feret(&rect(3, 4), Scale::new(2.0).unwrap()).expect("feret");
        assert!((values.max - 10.0).abs() < 1e-9);
        assert!((values.min - 6.0).abs() < 1e-9);
        assert!(values.angle >= 0.0 && values.angle < 180.0);
    }

    #[test]
    fn test_feret_angle_horizontal_segment() {
        let values = feret(&[Point::new(5, 2), Point::new(1, 2)], Scale::PIXEL).expect("feret");
        assert_eq!(values.start, Coord::new(1.0, 2.0));
        assert_eq!(values.angle, 0.0);
        assert_eq!(values.min, 0.0);
        assert!((values.max - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_feret_of_empty_boundary() {
        assert!(feret(&[], Scale::PIXEL).is_none());
    }
}
