#![allow(dead_code)]

use roicoloc::geometry::{Scale, Vertex};
use roicoloc::region::{Coord, Point, Region, RegionCollection};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A point set of up to `max_points` pixels inside a `size` x `size` tile.
pub fn arb_pixels(size: i32, max_points: usize) -> BoxedStrategy<Vec<Point>> {
    prop::collection::vec((0..size, 0..size), 1..=max_points)
        .prop_map(|coords| coords.into_iter().map(Point::from).collect())
        .boxed()
}

/// A collection of point-set regions, each confined to its own tile.
///
/// Tiles are laid out on row `band`, so collections built on different bands
/// never overlap.
pub fn arb_tiled_collection(
    prefix: &'static str,
    band: i32,
    max_regions: usize,
) -> BoxedStrategy<RegionCollection> {
    const TILE: i32 = 8;
    prop::collection::vec(arb_pixels(TILE, 6), 1..=max_regions)
        .prop_map(move |tiles| {
            let regions = tiles
                .into_iter()
                .enumerate()
                .map(|(i, pixels)| {
                    let dx = i as i32 * TILE;
                    let dy = band * TILE;
                    let shifted = pixels
                        .into_iter()
                        .map(|p| Point::new(p.x + dx, p.y + dy))
                        .collect();
                    Region::point_set(format!("{}{}", prefix, i + 1), shifted)
                })
                .collect();
            RegionCollection::new(prefix, regions)
        })
        .boxed()
}

/// A collection of point-set regions scattered over one shared tile.
pub fn arb_overlapping_collection(
    prefix: &'static str,
    max_regions: usize,
) -> BoxedStrategy<RegionCollection> {
    prop::collection::vec(arb_pixels(6, 8), 1..=max_regions)
        .prop_map(move |sets| {
            let regions = sets
                .into_iter()
                .enumerate()
                .map(|(i, pixels)| Region::point_set(format!("{}{}", prefix, i + 1), pixels))
                .collect();
            RegionCollection::new(prefix, regions)
        })
        .boxed()
}

pub fn arb_coord() -> BoxedStrategy<Coord> {
    (-1.0e4..1.0e4f64, -1.0e4..1.0e4f64)
        .prop_map(|(x, y)| Coord::new(x, y))
        .boxed()
}

pub fn arb_scale() -> BoxedStrategy<Scale> {
    (1.0e-3..1.0e2f64)
        .prop_map(|s| Scale::new(s).expect("positive scale"))
        .boxed()
}

pub fn arb_vertices(max_len: usize) -> BoxedStrategy<Vec<Vertex>> {
    prop::collection::vec(arb_coord(), 0..=max_len)
        .prop_map(|coords| {
            coords
                .into_iter()
                .enumerate()
                .map(|(i, c)| Vertex::new(format!("Point{:02}", i + 1), c))
                .collect()
        })
        .boxed()
}
