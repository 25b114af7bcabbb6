//! Rasterization of closed boundaries into the pixels they contain.
//!
//! A pixel `(x, y)` belongs to a boundary when its centre `(x + 0.5, y + 0.5)`
//! lies inside the closed vertex sequence under the even-odd rule. Boundary
//! vertices sit on integer coordinates, so a pixel centre never lies on a
//! vertex row and no horizontal edge is ever crossed.
//!
//! [`contains_pixel`] and [`rasterize`] evaluate the same crossing
//! expression, so a pixel is reported by one exactly when it is reported by
//! the other.

use std::collections::BTreeSet;

use super::coord::Point;

/// Returns the x position where the edge `a -> b` crosses the horizontal line
/// at `cy`, or `None` if it does not straddle that line.
#[inline]
fn crossing(a: Point, b: Point, cy: f64) -> Option<f64> {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    if (ay > cy) != (by > cy) {
        Some((bx - ax) * (cy - ay) / (by - ay) + ax)
    } else {
        None
    }
}

/// Iterates over the edges of a closed boundary, including the closing edge.
fn edges(vertices: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| (vertices[i], vertices[(i + 1) % n]))
}

/// Returns true if the pixel `p` lies inside the closed boundary.
///
/// Boundaries with fewer than three vertices enclose no pixels.
pub fn contains_pixel(vertices: &[Point], p: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let center = p.center();
    edges(vertices)
        .filter_map(|(a, b)| crossing(a, b, center.y))
        .filter(|&x| center.x < x)
        .count()
        % 2
        == 1
}

/// Returns every pixel inside the closed boundary.
pub fn rasterize(vertices: &[Point]) -> BTreeSet<Point> {
    let mut pixels = BTreeSet::new();
    if vertices.len() < 3 {
        return pixels;
    }

    let min_y = vertices.iter().map(|v| v.y).min().unwrap_or(0);
    let max_y = vertices.iter().map(|v| v.y).max().unwrap_or(0);

    let mut crossings: Vec<f64> = Vec::new();
    for y in min_y..max_y {
        let cy = y as f64 + 0.5;
        crossings.clear();
        crossings.extend(edges(vertices).filter_map(|(a, b)| crossing(a, b, cy)));
        crossings.sort_by(f64::total_cmp);

        // Centres in [left, right) of each crossing pair are inside.
        for span in crossings.chunks_exact(2) {
            let first = (span[0] - 0.5).ceil() as i32;
            let last = (span[1] - 0.5).ceil() as i32 - 1;
            for x in first..=last {
                pixels.insert(Point::new(x, y));
            }
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: i32, y0: i32, size: i32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + size, y0),
            Point::new(x0 + size, y0 + size),
            Point::new(x0, y0 + size),
        ]
    }

    #[test]
    fn test_rasterize_square() {
        let pixels = rasterize(&square(0, 0, 2));
        let expected: BTreeSet<Point> = [(0, 0), (1, 0), (0, 1), (1, 1)]
            .into_iter()
            .map(Point::from)
            .collect();
        assert_eq!(pixels, expected);
    }

    #[test]
    fn test_rasterize_triangle_area() {
        // Right triangle with legs of 10 pixels covers half of the 10x10 box
        // minus the pixels cut by the hypotenuse.
        let tri = vec![Point::new(0, 0), Point::new(10, 0), Point::new(0, 10)];
        let pixels = rasterize(&tri);
        assert_eq!(pixels.len(), 45);
        assert!(pixels.contains(&Point::new(0, 0)));
        assert!(!pixels.contains(&Point::new(9, 9)));
    }

    #[test]
    fn test_contains_pixel_agrees_with_rasterize() {
        let poly = vec![
            Point::new(2, 1),
            Point::new(9, 3),
            Point::new(7, 9),
            Point::new(4, 5),
            Point::new(1, 8),
        ];
        let pixels = rasterize(&poly);
        for y in -1..11 {
            for x in -1..11 {
                let p = Point::new(x, y);
                assert_eq!(contains_pixel(&poly, p), pixels.contains(&p), "{}", p);
            }
        }
    }

    #[test]
    fn test_degenerate_boundaries_contain_nothing() {
        assert!(rasterize(&[]).is_empty());
        assert!(rasterize(&[Point::new(0, 0), Point::new(5, 5)]).is_empty());
        assert!(!contains_pixel(&[Point::new(0, 0)], Point::new(0, 0)));
    }

    #[test]
    fn test_vertex_order_does_not_matter() {
        let mut poly = square(3, 3, 4);
        let forward = rasterize(&poly);
        poly.reverse();
        assert_eq!(rasterize(&poly), forward);
    }
}
