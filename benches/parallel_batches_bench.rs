//! Compare sequential, parallel and chunked batch runs.
//!
//! Run with: `cargo bench --bench parallel_batches`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use furysim::character::sample_fury_warrior;
use furysim::combat::{simulate, simulate_parallel, SimulationConfig};
use furysim::parallel::simulate_chunked;

fn bench_sequential_vs_parallel(c: &mut Criterion) {
    let snapshot = sample_fury_warrior()
        .snapshot()
        .expect("sample build should validate");
    let config = SimulationConfig {
        batches: 256,
        ..SimulationConfig::default()
    };

    let mut group = c.benchmark_group("batches");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(simulate(&snapshot, &config)));
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(simulate_parallel(&snapshot, &config)));
    });

    let chunks = rayon::current_num_threads();
    group.bench_function("chunked", |b| {
        b.iter(|| black_box(simulate_chunked(&snapshot, &config, chunks)));
    });

    group.finish();
}

criterion_group!(benches, bench_sequential_vs_parallel);
criterion_main!(benches);
