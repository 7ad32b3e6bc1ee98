//! Benchmarks for the three generation strategies.
//!
//! Run with: cargo bench --bench generation_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridforge::world::generation::{
    noise::sample_field, AutomataSettings, BspRoomPlacement, BspSettings, CellularAutomata, NoiseSettings,
};
use gridforge::{CancelToken, ProceduralGenerator, SeededRandom, TileGrid};

fn benchmark_bsp(c: &mut Criterion) {
    let settings = BspSettings {
        max_rooms: 32,
        ground_template: None,
        ..Default::default()
    };

    c.bench_function("bsp_128x128_32_rooms", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut grid = TileGrid::new(128, 128, 1.0);
            let mut generator = BspRoomPlacement::new(settings.clone(), Box::new(SeededRandom::new(seed)));
            generator.generate(&mut grid, &CancelToken::new()).unwrap();
            black_box(grid.count(gridforge::TileType::Room))
        });
    });
}

fn benchmark_automata(c: &mut Criterion) {
    let mut group = c.benchmark_group("automata");
    for size in [64, 256] {
        let settings = AutomataSettings {
            width: size,
            height: size,
            ..Default::default()
        };
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &settings, |b, settings| {
            b.iter(|| {
                let mut generator = CellularAutomata::new(settings.clone(), Box::new(SeededRandom::new(42)));
                black_box(generator.run(&CancelToken::new()).unwrap())
            });
        });
    }
    group.finish();
}

fn benchmark_chunked_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunked_noise_512");
    group.throughput(Throughput::Elements(512 * 512));
    group.sample_size(10);

    for chunk_size in [16, 32, 128, 512] {
        let settings = NoiseSettings {
            width: 512,
            height: 512,
            chunk_size,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("chunk", chunk_size), &settings, |b, settings| {
            b.iter(|| black_box(sample_field(black_box(settings), &CancelToken::new()).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_bsp, benchmark_automata, benchmark_chunked_noise);
criterion_main!(benches);
