use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{DVec2, Vec2};
use map_draw_core::app::sort_features;
use map_draw_core::app::use_cases::move_features;
use map_draw_core::input::{is_click, ClickTolerance, GestureSample, PressInfo};
use map_draw_core::{
    CoordPath, Feature, FeatureId, FeatureStore, GeographicBounds, Geometry, RenderFeature,
};
use std::hint::black_box;

fn bench_click_detection(c: &mut Criterion) {
    let tolerance = ClickTolerance::default();
    let press = PressInfo::new(Vec2::new(100.0, 100.0), 0.0);
    let releases: Vec<GestureSample> = (0..1024)
        .map(|i| {
            let offset = (i % 20) as f32;
            GestureSample::new(Vec2::new(100.0 + offset, 100.0), (i % 800) as f64)
        })
        .collect();

    c.bench_function("is_click_batch", |b| {
        b.iter(|| {
            releases
                .iter()
                .filter(|end| is_click(black_box(&press), **end, &tolerance))
                .count()
        })
    });
}

fn build_hits(count: usize) -> Vec<RenderFeature> {
    (0..count)
        .map(|i| {
            let id = FeatureId::new(format!("f{i}"));
            let size = 0.001 * ((i * 37) % 101 + 1) as f64;
            match i % 3 {
                0 => RenderFeature::vertex(&id, CoordPath::new(vec![0, i]), DVec2::ZERO, false),
                1 => RenderFeature::midpoint(&id, CoordPath::new(vec![0, i]), DVec2::ZERO),
                _ => RenderFeature::body(&Feature::new(
                    id,
                    Geometry::Polygon(vec![vec![
                        DVec2::ZERO,
                        DVec2::new(size, 0.0),
                        DVec2::new(size, size),
                        DVec2::new(0.0, size),
                    ]]),
                )),
            }
        })
        .collect()
}

fn bench_hit_sorting(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_sorting");

    for &count in &[16usize, 256usize] {
        let hits = build_hits(count);
        group.bench_with_input(BenchmarkId::new("sort_features", count), &hits, |b, hits| {
            b.iter(|| black_box(sort_features(hits.clone())).len())
        });
    }

    group.finish();
}

fn build_store(feature_count: usize, vertices: usize) -> FeatureStore {
    let mut store = FeatureStore::new();
    for f in 0..feature_count {
        let line = (0..vertices)
            .map(|v| DVec2::new(v as f64 * 0.01, f as f64 * 0.01))
            .collect();
        store.add(Feature::new(format!("l{f}"), Geometry::LineString(line)));
    }
    store
}

fn bench_drag_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_move");

    for &feature_count in &[10usize, 100usize] {
        let mut store = build_store(feature_count, 64);
        let ids = store.ids();
        let constraint = GeographicBounds;

        group.bench_function(BenchmarkId::new("move_features", feature_count), |b| {
            b.iter(|| {
                move_features(
                    &mut store,
                    black_box(&ids),
                    black_box(DVec2::new(0.0001, -0.0001)),
                    &constraint,
                )
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_click_detection,
    bench_hit_sorting,
    bench_drag_move
);
criterion_main!(benches);
