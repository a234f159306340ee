//! CSV rosters: one file of route waypoints, one file of vehicles

use std::fs::File;
use std::io::Read;
use std::path::Path;

use hashbrown::HashMap;
use log::{debug, info};
use serde::Deserialize;

use super::{FleetConfig, RouteConfig, VehicleConfig};
use crate::{Error, RoutePoint, sim::SimulationParams};

#[derive(Debug, Deserialize)]
struct RouteRow {
    route_id: String,
    #[serde(default)]
    route_name: String,
    sequence: u32,
    stop_name: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    total_distance_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct VehicleRow {
    vehicle_id: String,
    route_id: String,
    /// Missing column or empty cell means the vehicle starts at the terminal
    #[serde(default)]
    distance_traveled: Option<f64>,
    speed: f64,
}

fn deserialize_rows<T, R>(reader: R) -> Result<Vec<T>, Error>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(Error::from)
}

fn open(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        ))
    })
}

/// Read routes from `route_id,route_name,sequence,stop_name,lat,lng[,total_distance_km]`
/// rows. Routes keep the order of their first row, waypoints are sorted by
/// `sequence`.
pub fn read_routes<R: Read>(reader: R) -> Result<Vec<RouteConfig>, Error> {
    let rows: Vec<RouteRow> = deserialize_rows(reader)?;

    let mut order: HashMap<String, usize> = HashMap::new();
    let mut grouped: Vec<(RouteConfig, Vec<(u32, RoutePoint)>)> = Vec::new();

    for row in rows {
        let idx = *order.entry(row.route_id.clone()).or_insert_with(|| {
            grouped.push((
                RouteConfig {
                    id: row.route_id.clone(),
                    name: row.route_name.clone(),
                    waypoints: Vec::new(),
                    total_distance_km: None,
                },
                Vec::new(),
            ));
            grouped.len() - 1
        });

        let (route, points) = &mut grouped[idx];
        if route.name.is_empty() {
            route.name = row.route_name;
        }
        route.total_distance_km = route.total_distance_km.or(row.total_distance_km);
        points.push((row.sequence, RoutePoint::new(row.stop_name, row.lat, row.lng)));
    }

    Ok(grouped
        .into_iter()
        .map(|(mut route, mut points)| {
            points.sort_by_key(|(sequence, _)| *sequence);
            route.waypoints = points.into_iter().map(|(_, point)| point).collect();
            debug!(
                "Route {} loaded with {} waypoints",
                route.id,
                route.waypoints.len()
            );
            route
        })
        .collect())
}

/// Read vehicles from `vehicle_id,route_id,distance_traveled,speed` rows
pub fn read_vehicles<R: Read>(reader: R) -> Result<Vec<VehicleConfig>, Error> {
    let rows: Vec<VehicleRow> = deserialize_rows(reader)?;
    Ok(rows
        .into_iter()
        .map(|row| VehicleConfig {
            id: row.vehicle_id,
            route: row.route_id,
            distance_traveled: row.distance_traveled.unwrap_or(0.0),
            speed: row.speed,
        })
        .collect())
}

/// Load a fleet configuration from a pair of CSV files
pub fn load_roster(
    routes_path: &Path,
    vehicles_path: &Path,
    params: SimulationParams,
) -> Result<FleetConfig, Error> {
    info!("Reading routes from {}", routes_path.display());
    let routes = read_routes(open(routes_path)?)?;
    info!("Reading vehicles from {}", vehicles_path.display());
    let vehicles = read_vehicles(open(vehicles_path)?)?;

    Ok(FleetConfig {
        params,
        routes,
        vehicles,
    })
}
