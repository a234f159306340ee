use std::sync::Arc;

use chrono::{DateTime, Utc};
use hashbrown::{HashMap, HashSet};
use log::debug;

use super::SimulationParams;
use crate::{
    ConfigError, FleetState, Route, Vehicle, VehicleStatus,
    loading::{RouteConfig, VehicleConfig},
    model::eta_minutes,
};

/// Build the initial fleet state from static configuration.
///
/// Initial coordinates, ETAs and statuses are derived from each vehicle's
/// starting distance, so the first snapshot already satisfies every
/// invariant that `advance` maintains.
pub fn initialize(
    routes: &[RouteConfig],
    vehicles: &[VehicleConfig],
    params: SimulationParams,
) -> Result<FleetState, ConfigError> {
    params.validate()?;

    let mut route_index: HashMap<String, usize> = HashMap::with_capacity(routes.len());
    let mut route_table = Vec::with_capacity(routes.len());
    for config in routes {
        if route_index
            .insert(config.id.clone(), route_table.len())
            .is_some()
        {
            return Err(ConfigError::DuplicateRoute(config.id.clone()));
        }
        route_table.push(Route::from_config(config)?);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(vehicles.len());
    let roster = vehicles
        .iter()
        .map(|config| {
            if config.id.trim().is_empty() {
                return Err(ConfigError::EmptyVehicleId);
            }
            if !seen.insert(config.id.as_str()) {
                return Err(ConfigError::DuplicateVehicle(config.id.clone()));
            }
            let &route_idx =
                route_index
                    .get(&config.route)
                    .ok_or_else(|| ConfigError::UnknownRoute {
                        vehicle: config.id.clone(),
                        route: config.route.clone(),
                    })?;
            place_vehicle(config, route_idx, &route_table[route_idx], &params)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Initialized {} vehicles on {} routes",
        roster.len(),
        route_table.len()
    );

    Ok(FleetState {
        routes: route_table.into(),
        route_index: Arc::new(route_index),
        params: Arc::new(params),
        vehicles: roster,
        tick: 0,
        clock: DateTime::<Utc>::UNIX_EPOCH,
    })
}

fn place_vehicle(
    config: &VehicleConfig,
    route_idx: usize,
    route: &Route,
    params: &SimulationParams,
) -> Result<Vehicle, ConfigError> {
    let total = route.total_distance();
    if !(config.distance_traveled.is_finite()
        && (0.0..=total).contains(&config.distance_traveled))
    {
        return Err(ConfigError::InvalidStartDistance {
            vehicle: config.id.clone(),
            distance: config.distance_traveled,
            total,
        });
    }
    if !(params.min_speed..=params.max_speed).contains(&config.speed) {
        return Err(ConfigError::SpeedOutOfRange {
            vehicle: config.id.clone(),
            speed: config.speed,
            min: params.min_speed,
            max: params.max_speed,
        });
    }

    let mut vehicle = Vehicle {
        id: config.id.clone(),
        route_id: route.id.clone(),
        route_idx,
        lat: 0.0,
        lng: 0.0,
        distance_traveled: config.distance_traveled,
        total_distance: total,
        speed: config.speed,
        status: VehicleStatus::OnTime,
        eta: 1,
    };
    settle(&mut vehicle, route);
    vehicle.status = VehicleStatus::classify(vehicle.eta, vehicle.progress(), params);
    Ok(vehicle)
}

/// Recompute coordinate and ETA from the distance traveled
pub(crate) fn settle(vehicle: &mut Vehicle, route: &Route) {
    let (lat, lng) = route.position_at(vehicle.progress());
    vehicle.lat = lat;
    vehicle.lng = lng;
    vehicle.eta = eta_minutes(vehicle.remaining_distance(), vehicle.speed);
}
