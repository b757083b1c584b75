use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use trajectory_sim::{solve_elliptic, solve_hyperbolic, KeplerSolver};

const POLL_ITERS: u64 = 1024;
const MULTIPLIER: f64 = std::f64::consts::TAU / POLL_ITERS as f64;

#[inline(always)]
fn poll_elliptic(eccentricity: f64, solver: &KeplerSolver) {
    for i in 0..POLL_ITERS {
        let mean_anomaly = i as f64 * MULTIPLIER;
        black_box(solve_elliptic(black_box(mean_anomaly), eccentricity, solver));
    }
}

#[inline(always)]
fn poll_hyperbolic(eccentricity: f64, solver: &KeplerSolver) {
    for i in 0..POLL_ITERS {
        // Spans both branches and the steep tails
        let mean_anomaly = (i as f64 - POLL_ITERS as f64 / 2.0) * MULTIPLIER * 10.0;
        black_box(solve_hyperbolic(black_box(mean_anomaly), eccentricity, solver));
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let solver = KeplerSolver::default();

    let mut group = c.benchmark_group("eccentric_anomaly@mean_anomaly");
    group.throughput(Throughput::Elements(POLL_ITERS));

    for eccentricity in [0.0, 0.05, 0.5, 0.8, 0.99] {
        group.bench_function(format!("elliptic e={eccentricity}"), |b| {
            b.iter(|| poll_elliptic(black_box(eccentricity), &solver))
        });
    }
    for eccentricity in [1.01, 1.2, 3.0] {
        group.bench_function(format!("hyperbolic e={eccentricity}"), |b| {
            b.iter(|| poll_hyperbolic(black_box(eccentricity), &solver))
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
