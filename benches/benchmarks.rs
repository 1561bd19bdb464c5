//! Benchmarks for chain ensemble operations.

use core::hint::black_box;

use chainvote::{
    Approximator, Config, Ensemble, Task, VoteTally, encoder::encode, utils::rng_from_seed
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn sort_config(bits: usize) -> Config {
    Config::builder()
        .input_len(2)
        .output_len(2)
        .bits(bits)
        .build()
        .unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let values: Vec<u8> = (0..16).map(|i| (i * 17) as u8).collect();

    for bits in [2usize, 4, 6, 8] {
        let locations: Vec<usize> = (0..bits).map(|i| i % values.len()).collect();
        let thresholds: Vec<u8> = (0..bits).map(|i| (i * 31) as u8).collect();

        group.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |b, _| {
            b.iter(|| black_box(encode(black_box(&values), &locations, &thresholds)));
        });
    }

    group.finish();
}

fn bench_observe(c: &mut Criterion) {
    let mut group = c.benchmark_group("observe");

    for bits in [4usize, 6] {
        let mut ensemble = Ensemble::new(sort_config(bits), &mut rng_from_seed(42)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |b, _| {
            b.iter(|| {
                ensemble
                    .observe(black_box(&[120, 40]), black_box(&[40, 120]))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_finalize(c: &mut Criterion) {
    let mut approx = Approximator::with_seed(sort_config(6), Task::Sort, 42).unwrap();
    let mut rng = rng_from_seed(1);
    for _ in 0..1_000 {
        approx.train_example(&mut rng).unwrap();
    }
    let ensemble = approx.ensemble().clone();

    c.bench_function("finalize_510x6", |b| {
        b.iter(|| {
            let mut e = ensemble.clone();
            e.finalize();
            black_box(e)
        });
    });
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    for chains_per_input in [32usize, 128, 255] {
        let config = Config::builder()
            .input_len(2)
            .output_len(2)
            .chains_per_input(chains_per_input)
            .build()
            .unwrap();
        let mut approx = Approximator::with_seed(config, Task::Sort, 42).unwrap();
        approx.fit(2_000, 42).unwrap();
        let mut tally = VoteTally::new(2);
        let mut out = [0u8; 2];

        group.bench_with_input(
            BenchmarkId::from_parameter(chains_per_input * 2),
            &chains_per_input,
            |b, _| {
                b.iter(|| {
                    approx
                        .ensemble()
                        .predict_into(black_box(&[200, 15]), &mut tally, &mut out)
                        .unwrap();
                    black_box(out)
                });
            }
        );
    }

    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_parallel_predict(c: &mut Criterion) {
    let mut approx = Approximator::with_seed(sort_config(6), Task::Sort, 42).unwrap();
    approx.fit(2_000, 42).unwrap();

    c.bench_function("parallel_predict_510", |b| {
        b.iter(|| black_box(chainvote::parallel::predict(approx.ensemble(), &[200, 15]).unwrap()));
    });
}

#[cfg(not(feature = "parallel"))]
fn bench_parallel_predict(_: &mut Criterion) {}

criterion_group!(
    benches,
    bench_encode,
    bench_observe,
    bench_finalize,
    bench_predict,
    bench_parallel_predict
);
criterion_main!(benches);
