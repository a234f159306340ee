use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use fleetsim_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Demo routes with a large roster spread along them
fn large_fleet(per_route: usize) -> FleetState {
    let mut config = FleetConfig::demo();
    config.vehicles = config
        .routes
        .iter()
        .flat_map(|route| {
            let total = route.total_distance_km.unwrap_or(10.0);
            (0..per_route).map(move |idx| VehicleConfig {
                id: format!("{}-{idx:05}", route.id),
                route: route.id.clone(),
                distance_traveled: total * (idx % 100) as f64 / 100.0,
                speed: 30.0 + (idx % 40) as f64,
            })
        })
        .collect();
    create_fleet(&config).unwrap()
}

fn bench_advance(c: &mut Criterion) {
    let state = large_fleet(10_000);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("advance 30k vehicles", |b| {
        b.iter(|| advance(black_box(&state), 30.0, &mut rng));
    });

    c.bench_function("snapshot 30k vehicles", |b| {
        b.iter(|| black_box(&state).snapshot());
    });
}

criterion_group!(benches, bench_advance);
criterion_main!(benches);
