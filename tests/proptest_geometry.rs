use proptest::prelude::*;
use roicoloc::geometry::{adjacent_pairs, angle, distance, non_adjacent_pairs, Vertex};
use roicoloc::region::raster::{contains_pixel, rasterize};
use roicoloc::region::Point;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn distance_to_self_is_zero(
        p in proptest_helpers::arb_coord(),
        scale in proptest_helpers::arb_scale(),
    ) {
        prop_assert_eq!(distance(p, p, scale), 0.0);
    }

    #[test]
    fn distance_is_symmetric(
        p1 in proptest_helpers::arb_coord(),
        p2 in proptest_helpers::arb_coord(),
        scale in proptest_helpers::arb_scale(),
    ) {
        prop_assert_eq!(distance(p1, p2, scale), distance(p2, p1, scale));
        prop_assert!(distance(p1, p2, scale) >= 0.0);
    }

    #[test]
    fn angle_with_point_on_origin_is_degenerate(
        o in proptest_helpers::arb_coord(),
        p2 in proptest_helpers::arb_coord(),
        scale in proptest_helpers::arb_scale(),
    ) {
        let origin = Vertex::new("Ori", o);
        let p1 = Vertex::new("point01", o);
        let p2 = Vertex::new("point02", p2);
        prop_assert!(angle(&origin, &p1, &p2, scale).is_err());
    }

    #[test]
    fn angle_is_within_half_turn(
        o in proptest_helpers::arb_coord(),
        a in proptest_helpers::arb_coord(),
        b in proptest_helpers::arb_coord(),
        scale in proptest_helpers::arb_scale(),
    ) {
        prop_assume!(o != a && o != b);
        let deg = angle(
            &Vertex::new("Ori", o),
            &Vertex::new("a", a),
            &Vertex::new("b", b),
            scale,
        );
        if let Ok(deg) = deg {
            prop_assert!((0.0..=180.0).contains(&deg));
        }
    }

    #[test]
    fn adjacent_pairs_wrap_then_follow_order(vertices in proptest_helpers::arb_vertices(12)) {
        let pairs = adjacent_pairs(&vertices);
        let n = vertices.len();

        if n < 2 {
            prop_assert!(pairs.is_empty());
        } else {
            prop_assert_eq!(pairs.len(), if n == 2 { 2 } else { n });
            prop_assert_eq!(&pairs[0], &(vertices[n - 1].clone(), vertices[0].clone()));
            for (i, pair) in pairs.iter().enumerate().skip(1) {
                prop_assert_eq!(pair, &(vertices[i - 1].clone(), vertices[i].clone()));
            }
        }
    }

    #[test]
    fn pairs_partition_all_unordered_pairs(vertices in proptest_helpers::arb_vertices(12)) {
        let n = vertices.len();
        prop_assume!(n >= 3);

        let adjacent = adjacent_pairs(&vertices).len();
        let non_adjacent = non_adjacent_pairs(&vertices).len();
        prop_assert_eq!(adjacent + non_adjacent, n * (n - 1) / 2);
    }

    #[test]
    fn rasterize_agrees_with_contains_pixel(
        vertices in prop::collection::vec((0..12i32, 0..12i32), 3..7),
        probe in (-1..13i32, -1..13i32),
    ) {
        let vertices: Vec<Point> = vertices.into_iter().map(Point::from).collect();
        let probe = Point::from(probe);
        let inside = rasterize(&vertices);
        prop_assert_eq!(inside.contains(&probe), contains_pixel(&vertices, probe));
    }
}
