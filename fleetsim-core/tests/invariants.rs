use fleetsim_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn demo_state() -> FleetState {
    create_fleet(&FleetConfig::demo()).unwrap()
}

/// Aggressive parameters so every branch fires often
fn jumpy_state() -> FleetState {
    let mut config = FleetConfig::demo();
    config.params = SimulationParams {
        speed_delta: 25.0,
        speed_change_probability: 0.9,
        status_change_probability: 0.5,
        ..SimulationParams::default()
    };
    create_fleet(&config).unwrap()
}

fn assert_invariants(state: &FleetState) {
    let params = state.params();
    for vehicle in state.vehicles() {
        assert!(vehicle.distance_traveled() >= 0.0, "{}", vehicle.id());
        assert!(
            vehicle.distance_traveled() <= vehicle.total_distance(),
            "{}",
            vehicle.id()
        );
        assert!(vehicle.eta() >= 1, "{}", vehicle.id());
        assert!(
            (params.min_speed..=params.max_speed).contains(&vehicle.speed()),
            "{} at {} km/h",
            vehicle.id(),
            vehicle.speed()
        );

        let route = state.route(vehicle.route_id()).unwrap();
        let progress = vehicle.distance_traveled() / vehicle.total_distance();
        let (start, end) = (route.start(), route.end());
        let expected_lat = start.lat + (end.lat - start.lat) * progress;
        let expected_lng = start.lng + (end.lng - start.lng) * progress;
        let (lat, lng) = vehicle.coordinate();
        assert!((lat - expected_lat).abs() < 1e-9, "{}", vehicle.id());
        assert!((lng - expected_lng).abs() < 1e-9, "{}", vehicle.id());
    }
}

#[test]
fn invariants_hold_over_long_runs() {
    for seed in 0..8 {
        let mut state = jumpy_state();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        assert_invariants(&state);
        for _ in 0..400 {
            state = advance(&state, 30.0, &mut rng);
            assert_invariants(&state);
        }
        // 400 ticks of 30 s is more than three hours: everyone has arrived
        assert_eq!(state.summary().arrived, state.len());
    }
}

#[test]
fn distance_is_monotonic_and_held_at_terminal() {
    let mut state = jumpy_state();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..1000 {
        let next = advance(&state, 45.0, &mut rng);
        for (before, after) in state.vehicles().iter().zip(next.vehicles()) {
            assert!(after.distance_traveled() >= before.distance_traveled());
            if before.has_arrived() {
                assert_eq!(after.distance_traveled(), before.distance_traveled());
                assert_eq!(after.eta(), 1);
            }
        }
        state = next;
    }
}

#[test]
fn advance_does_not_touch_the_input() {
    let state = demo_state();
    let before = state.snapshot();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let next = advance(&state, 30.0, &mut rng);
    assert_eq!(state.snapshot(), before);
    assert_ne!(next.snapshot(), before);
    assert_eq!(state.tick(), 0);
    assert_eq!(next.tick(), 1);
}

#[test]
fn fleet_size_is_constant() {
    let mut sim = Simulation::seeded(demo_state(), 3);
    let ids: Vec<String> = sim.snapshot().into_iter().map(|v| v.id).collect();
    sim.run(200);
    let after: Vec<String> = sim.snapshot().into_iter().map(|v| v.id).collect();
    assert_eq!(ids, after);
}

#[test]
fn different_seeds_diverge() {
    let mut a = Simulation::seeded(jumpy_state(), 1);
    let mut b = Simulation::seeded(jumpy_state(), 2);
    a.run(20);
    b.run(20);
    let speeds = |sim: &Simulation| -> Vec<f64> {
        sim.state().vehicles().iter().map(Vehicle::speed).collect()
    };
    assert_ne!(speeds(&a), speeds(&b));
}

#[test]
fn reset_releases_an_arrived_vehicle() {
    let mut sim = Simulation::seeded(demo_state(), 12);
    sim.run(500);
    assert!(sim.state().vehicle("AP39Z9012").unwrap().has_arrived());

    sim.reset_vehicle("AP39Z9012").unwrap();
    sim.step();
    let vehicle = sim.state().vehicle("AP39Z9012").unwrap();
    assert!(!vehicle.has_arrived());
    assert!(vehicle.distance_traveled() > 0.0);
}
