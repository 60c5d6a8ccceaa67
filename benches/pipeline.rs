/// Benchmark suite for the chunk pipeline stages
/// Measures lighting and meshing of single chunks over Perlin terrain
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxel_chunk_engine::engine_state::{
    config::EngineConfig,
    lighting::LightingEngine,
    rendering::meshing::MeshBuilder,
    voxels::{
        chunk::{Chunk, ChunkCoord},
        terrain::{flat::FlatGenerator, perlin::PerlinGenerator, TerrainGenerator},
        world::World,
    },
};

fn terrain_world(height: u8, generator: &dyn TerrainGenerator) -> (Arc<World>, Arc<Chunk>) {
    let config = EngineConfig {
        chunk_height: height,
        cache_range: 0,
        view_range: 0,
        ..EngineConfig::default()
    };
    let world = Arc::new(World::new(Arc::new(config)));
    let chunk = Chunk::new(ChunkCoord::new(0, 0), world.config());
    let chunk = Arc::new(chunk);
    generator.generate(&chunk, &mut world.grid().get_mut());
    (world, chunk)
}

fn bench_light_flat(c: &mut Criterion) {
    c.bench_function("light_flat_chunk", |b| {
        let (world, chunk) = terrain_world(128, &FlatGenerator::default());
        let lighting = LightingEngine::new(world.clone());
        b.iter(|| {
            let mut grid = world.grid().get_mut();
            black_box(lighting.light_chunk(black_box(&chunk), &mut grid))
        });
    });
}

fn bench_light_perlin(c: &mut Criterion) {
    let mut group = c.benchmark_group("light_perlin_chunk");

    for height in [32u8, 64, 128].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(height), height, |b, &height| {
            let (world, chunk) = terrain_world(height, &PerlinGenerator::new(1));
            let lighting = LightingEngine::new(world.clone());
            b.iter(|| {
                let mut grid = world.grid().get_mut();
                black_box(lighting.light_chunk(black_box(&chunk), &mut grid))
            });
        });
    }

    group.finish();
}

fn bench_mesh_perlin(c: &mut Criterion) {
    c.bench_function("mesh_perlin_chunk", |b| {
        let (world, chunk) = terrain_world(128, &PerlinGenerator::new(1));
        {
            let mut grid = world.grid().get_mut();
            LightingEngine::new(world.clone()).light_chunk(&chunk, &mut grid);
            chunk.calculate_height_indexes(&grid);
        }

        b.iter(|| {
            let grid = world.grid().get();
            black_box(MeshBuilder::build_geometry(black_box(&chunk), &grid))
        });
    });
}

fn bench_generate_perlin(c: &mut Criterion) {
    c.bench_function("generate_perlin_chunk", |b| {
        let (world, chunk) = terrain_world(128, &FlatGenerator::default());
        let generator = PerlinGenerator::new(1);
        b.iter(|| generator.generate(black_box(&chunk), &mut world.grid().get_mut()));
    });
}

criterion_group!(
    benches,
    bench_light_flat,
    bench_light_perlin,
    bench_mesh_perlin,
    bench_generate_perlin
);
criterion_main!(benches);
