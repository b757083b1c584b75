use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::{hint::black_box, sync::Arc};
use trajectory_sim::{
    body_presets, FlightPath, Maneuver, ManeuverType, PerformanceData, System, Vector3,
};

const POLL_ITERS: u64 = 256;

#[inline(always)]
fn poll_path(path: &FlightPath, from: f64, to: f64) {
    let step = (to - from) / POLL_ITERS as f64;
    for i in 0..POLL_ITERS {
        let _ = black_box(path.predict(black_box(from + i as f64 * step)));
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let system = Arc::new(System::new(body_presets::the_sun()));
    let position = Vector3::new(617244712358.0, -431694791368.0, -12036457087.0);
    let velocity = Vector3::new(7320.0, 11329.0, -211.0);
    let engine = PerformanceData::new(3000.0, 20000.0).expect("engine is valid");

    let coasting = FlightPath::new(system.clone(), position, velocity, 0.0)
        .expect("reference state is valid");

    let mut burning = coasting.clone();
    let burn = Maneuver::new(ManeuverType::Prograde, 2000.0, engine, 150.0, 1.0e6)
        .expect("burn is valid");
    burning.add(burn).expect("burn fits the path");

    let mut group = c.benchmark_group("flight_path@predict");
    group.throughput(Throughput::Elements(POLL_ITERS));

    group.bench_function("coast", |b| {
        b.iter(|| poll_path(black_box(&coasting), 0.0, 3.0e8))
    });
    group.bench_function("inside burn", |b| {
        b.iter(|| poll_path(black_box(&burning), burn.start_time(), burn.end_time()))
    });

    group.finish();

    let mut group = c.benchmark_group("flight_path@add");

    group.bench_function("schedule ten burns", |b| {
        b.iter(|| {
            let mut path = coasting.clone();
            // Latest first, so every insertion rebuilds the whole tail
            for i in (0..10).rev() {
                let start = 1.0e6 + f64::from(i) * 1.0e5;
                let burn = Maneuver::new(ManeuverType::Prograde, 10.0, engine, 150.0, start)
                    .expect("burn is valid");
                path.add(burn).expect("burns are disjoint");
            }
            black_box(path)
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
