use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Km, Kmh, RouteId, RoutePoint, VehicleId, sim::SimulationParams};

/// Static description of one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub id: RouteId,
    #[serde(default)]
    pub name: String,
    pub waypoints: Vec<RoutePoint>,
    /// Overrides the polyline length when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance_km: Option<Km>,
}

/// Starting state of one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub id: VehicleId,
    pub route: RouteId,
    #[serde(default)]
    pub distance_traveled: Km,
    pub speed: Kmh,
}

/// Everything needed to build a fleet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub params: SimulationParams,
    pub routes: Vec<RouteConfig>,
    pub vehicles: Vec<VehicleConfig>,
}

impl FleetConfig {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to read fleet config '{}': {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&contents)
    }

    /// Roster of the East Godavari demo: three intercity lines out of
    /// Kakinada and five buses.
    pub fn demo() -> Self {
        let route = |id: &str, name: &str, total: Km, stops: &[(&str, f64, f64)]| RouteConfig {
            id: id.to_string(),
            name: name.to_string(),
            waypoints: stops
                .iter()
                .map(|&(stop, lat, lng)| RoutePoint::new(stop, lat, lng))
                .collect(),
            total_distance_km: Some(total),
        };
        let vehicle = |id: &str, route: &str, distance_traveled: Km, speed: Kmh| VehicleConfig {
            id: id.to_string(),
            route: route.to_string(),
            distance_traveled,
            speed,
        };

        Self {
            params: SimulationParams::default(),
            routes: vec![
                route(
                    "KKD-RJY-01",
                    "Kakinada - Rajahmundry Express",
                    61.0,
                    &[
                        ("Kakinada Bus Station", 16.9891, 82.2475),
                        ("Samalkot Junction", 17.0531, 82.1695),
                        ("Peddapuram", 17.0778, 82.1380),
                        ("Rajahmundry Bus Station", 17.0005, 81.8040),
                    ],
                ),
                route(
                    "KKD-RJY-02",
                    "Kakinada - Rajahmundry Local",
                    65.8,
                    &[
                        ("Kakinada Port", 16.9437, 82.2550),
                        ("Mandapeta", 16.8650, 81.9270),
                        ("Rajahmundry Railway Station", 17.0080, 81.7890),
                    ],
                ),
                route(
                    "KKD-AMP-01",
                    "Kakinada - Amalapuram",
                    28.0,
                    &[
                        ("Kakinada Bus Station", 16.9891, 82.2475),
                        ("Yanam", 16.7330, 82.2130),
                        ("Mummidivaram", 16.6480, 82.1130),
                        ("Amalapuram Bus Stand", 16.5787, 82.0061),
                    ],
                ),
            ],
            vehicles: vec![
                vehicle("AP39Z1234", "KKD-RJY-01", 42.0, 45.0),
                vehicle("AP39Z1235", "KKD-RJY-01", 4.0, 38.0),
                vehicle("AP39Z5678", "KKD-RJY-02", 15.2, 45.0),
                vehicle("AP39Z5679", "KKD-RJY-02", 40.5, 52.0),
                vehicle("AP39Z9012", "KKD-AMP-01", 24.5, 55.0),
            ],
        }
    }
}
