//! Criterion microbenches for roicoloc matching and dialect detection.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Greedy overlap matching of two region collections (match_regions)
//! - Dialect detection on an in-memory measurement export (detect_in_slice)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use roicoloc::matching::match_regions;
use roicoloc::region::{Point, Region, RegionCollection};
use roicoloc::table::{detect_in_slice, DetectOptions};

/// A grid of `n` x `n` square polygons of side `size`, spaced `step` apart.
fn polygon_grid(prefix: &str, n: i32, size: i32, step: i32, offset: i32) -> RegionCollection {
    let mut regions = Vec::new();
    for row in 0..n {
        for col in 0..n {
            let x = col * step + offset;
            let y = row * step + offset;
            regions.push(Region::polygon(
                format!("{}{}", prefix, regions.len() + 1),
                vec![
                    Point::new(x, y),
                    Point::new(x + size, y),
                    Point::new(x + size, y + size),
                    Point::new(x, y + size),
                ],
            ));
        }
    }
    RegionCollection::new(prefix, regions)
}

/// A grid of single-pixel point sets.
fn foci_grid(n: i32, step: i32) -> RegionCollection {
    let mut regions = Vec::new();
    for row in 0..n {
        for col in 0..n {
            regions.push(Region::point_set(
                format!("F{}", regions.len() + 1),
                vec![Point::new(col * step + 3, row * step + 3)],
            ));
        }
    }
    RegionCollection::new("F", regions)
}

fn measurement_export(rows: usize) -> String {
    let mut text = String::from("Exported measurements\nImage: cell01.tif\n\n");
    text.push_str(" ,Label,Area,Mean,Perim.\n");
    for i in 0..rows {
        text.push_str(&format!("{},F{},{}.5,{}.25,{}.75\n", i + 1, i + 1, i, i * 2, i * 3));
    }
    text
}

/// Benchmark matching polygons against point foci.
fn bench_match_regions(c: &mut Criterion) {
    let mito = polygon_grid("M", 10, 12, 16, 0);
    let foci = foci_grid(20, 8);
    let mut group = c.benchmark_group("matching");
    group.throughput(Throughput::Elements((mito.len() * foci.len()) as u64));

    group.bench_function("polygons_vs_points", |b| {
        b.iter(|| {
            let correspondence = match_regions(black_box(&mito), black_box(&foci)).unwrap();
            black_box(correspondence)
        })
    });

    let shifted = polygon_grid("N", 10, 12, 16, 6);
    group.bench_function("polygons_vs_polygons", |b| {
        b.iter(|| {
            let correspondence = match_regions(black_box(&mito), black_box(&shifted)).unwrap();
            black_box(correspondence)
        })
    });

    group.finish();
}

/// Benchmark dialect detection over the default sample window.
fn bench_detect_dialect(c: &mut Criterion) {
    let export = measurement_export(500);
    let bytes = export.as_bytes();
    let opts = DetectOptions::default();
    let mut group = c.benchmark_group("dialect");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("detect_in_slice", |b| {
        b.iter(|| {
            let detection = detect_in_slice(black_box(bytes), &opts).unwrap();
            black_box(detection)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_match_regions, bench_detect_dialect);
criterion_main!(benches);
