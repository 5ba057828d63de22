use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use terrain_core::{
    ErosionBrush, ErosionConfig, HydraulicErosion2D, NoiseParams, Perlin3D, generate_heightmap,
};

const SIZE: usize = 256;
const SEED: u64 = 2025;

fn params() -> NoiseParams {
    NoiseParams {
        seed: SEED,
        ..NoiseParams::vertex_grid(SIZE)
    }
}

fn bench_perlin3_samples(c: &mut Criterion) {
    let perlin = Perlin3D::new();
    c.bench_function("Perlin3D 10k samples", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..10_000 {
                let t = i as f64 * 0.173;
                acc += perlin.sample(black_box(t), black_box(t * 0.5), 0.0);
            }
            acc
        })
    });
}

fn bench_heightmap(c: &mut Criterion) {
    c.bench_function("Fractal heightmap 257x257, 6 octaves", |b| {
        b.iter(|| generate_heightmap(black_box(&params())))
    });
}

fn bench_brush_build(c: &mut Criterion) {
    c.bench_function("ErosionBrush 257x257 radius 3", |b| {
        b.iter(|| ErosionBrush::new(black_box(SIZE + 1), 3))
    });
}

fn bench_erosion_point(c: &mut Criterion) {
    let base = generate_heightmap(&params()).expect("valid noise params");
    c.bench_function("Heightmap + point erosion (10k droplets)", |b| {
        b.iter(|| {
            let mut map = base.clone();
            let mut erosion = HydraulicErosion2D::new(ErosionConfig::point(0.1), SEED);
            erosion.erode_map(&mut map, 10_000).expect("square map");
            map
        })
    });
}

fn bench_erosion_brush(c: &mut Criterion) {
    let base = generate_heightmap(&params()).expect("valid noise params");
    // build the brush once so the loop measures droplets only
    let mut erosion = HydraulicErosion2D::new(ErosionConfig::brush(3), SEED);
    let mut warm = base.clone();
    erosion.erode_map(&mut warm, 1).expect("square map");

    c.bench_function("Heightmap + brush erosion (10k droplets)", |b| {
        b.iter(|| {
            let mut map = base.clone();
            erosion.reseed(SEED);
            erosion.erode_map(&mut map, 10_000).expect("square map");
            map
        })
    });
}

criterion_group!(
    terrain_benchmarks,
    bench_perlin3_samples,
    bench_heightmap,
    bench_brush_build,
    bench_erosion_point,
    bench_erosion_brush
);
criterion_main!(terrain_benchmarks);
