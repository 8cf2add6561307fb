use criterion::{criterion_group, criterion_main, Criterion, black_box};

use vale::generation::{CaveStrategy, ChunkGenerator, GenerationConfig, ValleysGenerator};
use vale::terrain::HeightVariant;

use glam::IVec3;

fn surface_chunk(generator: &ValleysGenerator) -> vale::math::ChunkExtent {
    let h = generator.height_at(8, 8);
    generator.chunk_extent(IVec3::new(0, h.div_euclid(16), 0), 16).unwrap()
}

fn bench_generate_chunk(c: &mut Criterion) {
    let generator = ValleysGenerator::with_defaults(GenerationConfig::default()).unwrap();
    let extent = surface_chunk(&generator);

    c.bench_function("generate_chunk_16", |b| {
        b.iter(|| generator.generate_dense(black_box(&extent)).unwrap());
    });
}

fn bench_generate_chunk_contour(c: &mut Criterion) {
    let config = GenerationConfig {
        caves: CaveStrategy::Contour,
        ..Default::default()
    };
    let generator = ValleysGenerator::with_defaults(config).unwrap();
    let extent = surface_chunk(&generator);

    c.bench_function("generate_chunk_16_contour", |b| {
        b.iter(|| generator.generate_dense(black_box(&extent)).unwrap());
    });
}

fn bench_generate_chunk_iterative(c: &mut Criterion) {
    let config = GenerationConfig {
        height_variant: HeightVariant::Iterative { max_steps: 32 },
        ..Default::default()
    };
    let generator = ValleysGenerator::with_defaults(config).unwrap();
    let extent = surface_chunk(&generator);

    c.bench_function("generate_chunk_16_iterative", |b| {
        b.iter(|| generator.generate_dense(black_box(&extent)).unwrap());
    });
}

fn bench_height_at(c: &mut Criterion) {
    let generator = ValleysGenerator::with_defaults(GenerationConfig::default()).unwrap();

    c.bench_function("height_at_256_columns", |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for z in 0..16 {
                for x in 0..16 {
                    sum += generator.height_at(black_box(x * 7), black_box(z * 13)) as i64;
                }
            }
            sum
        });
    });
}

fn bench_generate_batch(c: &mut Criterion) {
    let generator = ValleysGenerator::with_defaults(GenerationConfig::default()).unwrap();
    let extents: Vec<_> = (0..8)
        .map(|i| {
            let h = generator.height_at(i * 16 + 8, 8);
            generator.chunk_extent(IVec3::new(i, h.div_euclid(16), 0), 16).unwrap()
        })
        .collect();

    c.bench_function("generate_batch_8", |b| {
        b.iter(|| generator.generate_batch(black_box(&extents)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_generate_chunk,
    bench_generate_chunk_contour,
    bench_generate_chunk_iterative,
    bench_height_at,
    bench_generate_batch,
);
criterion_main!(benches);
