use std::sync::Arc;

use chrono::TimeDelta;
use log::{info, trace, warn};
use rayon::prelude::*;

use super::{
    RandomSource, SimulationParams,
    init::settle,
    random::TickDraws,
};
use crate::{Error, FleetState, Route, Vehicle, VehicleStatus, model::eta_minutes};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Produce the next fleet state after `elapsed_seconds` of simulated time.
///
/// Random draws are taken from `rng` in roster order before any vehicle is
/// moved, so the same source yields the same run no matter how the
/// per-vehicle work is scheduled. Negative or non-finite elapsed time is
/// treated as zero.
pub fn advance<R>(state: &FleetState, elapsed_seconds: f64, rng: &mut R) -> FleetState
where
    R: RandomSource + ?Sized,
{
    let elapsed = sanitize_elapsed(elapsed_seconds);
    let params = state.params.as_ref();

    let draws: Vec<TickDraws> = state
        .vehicles
        .iter()
        .map(|_| TickDraws::sample(&mut *rng, params))
        .collect();

    let vehicles: Vec<Vehicle> = state
        .vehicles
        .par_iter()
        .zip(&draws)
        .map(|(vehicle, draws)| {
            advance_vehicle(
                vehicle,
                &state.routes[vehicle.route_idx],
                params,
                elapsed,
                *draws,
            )
        })
        .collect();

    let tick = state.tick + 1;
    trace!(
        "Tick {tick}: advanced {} vehicles by {elapsed}s",
        vehicles.len()
    );

    FleetState {
        routes: Arc::clone(&state.routes),
        route_index: Arc::clone(&state.route_index),
        params: Arc::clone(&state.params),
        vehicles,
        tick,
        clock: advance_clock(state, elapsed),
    }
}

fn sanitize_elapsed(elapsed_seconds: f64) -> f64 {
    if elapsed_seconds.is_finite() && elapsed_seconds >= 0.0 {
        elapsed_seconds
    } else {
        warn!("Ignoring invalid elapsed time {elapsed_seconds}s, advancing by zero");
        0.0
    }
}

#[allow(clippy::cast_possible_truncation)]
fn advance_clock(state: &FleetState, elapsed: f64) -> chrono::DateTime<chrono::Utc> {
    let millis = (elapsed * 1000.0).round() as i64;
    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| state.clock.checked_add_signed(delta))
        .unwrap_or(state.clock)
}

fn advance_vehicle(
    vehicle: &Vehicle,
    route: &Route,
    params: &SimulationParams,
    elapsed: f64,
    draws: TickDraws,
) -> Vehicle {
    let rate = vehicle.speed / SECONDS_PER_HOUR;
    let distance_traveled =
        (vehicle.distance_traveled + rate * elapsed).min(vehicle.total_distance);
    let progress = distance_traveled / vehicle.total_distance;
    let (lat, lng) = route.position_at(progress);
    let eta = eta_minutes(vehicle.total_distance - distance_traveled, vehicle.speed);

    let speed = params.clamp_speed(vehicle.speed + draws.speed_change.unwrap_or(0.0));

    // Between triggers the previous status is kept even if the ETA has
    // already crossed a threshold
    let status = if draws.reclassify {
        VehicleStatus::classify(eta, progress, params)
    } else {
        vehicle.status
    };

    Vehicle {
        id: vehicle.id.clone(),
        route_id: vehicle.route_id.clone(),
        route_idx: vehicle.route_idx,
        lat,
        lng,
        distance_traveled,
        total_distance: vehicle.total_distance,
        speed,
        status,
        eta,
    }
}

/// Return a vehicle to the start of its route.
///
/// This is the only way to release a vehicle held at its terminal.
pub fn reset_vehicle(state: &FleetState, vehicle_id: &str) -> Result<FleetState, Error> {
    let idx = state
        .vehicle_position(vehicle_id)
        .ok_or_else(|| Error::UnknownVehicle(vehicle_id.to_string()))?;

    let mut next = state.clone();
    let vehicle = &mut next.vehicles[idx];
    vehicle.distance_traveled = 0.0;
    settle(vehicle, &state.routes[vehicle.route_idx]);
    vehicle.status = VehicleStatus::classify(vehicle.eta, 0.0, &state.params);

    info!("Vehicle {vehicle_id} reset to the start of {}", vehicle.route_id);
    Ok(next)
}
