use thiserror::Error;

/// Malformed static configuration, rejected before a fleet is built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Vehicle '{vehicle}' references unknown route '{route}'")]
    UnknownRoute { vehicle: String, route: String },
    #[error("Route '{route}' has non-positive total distance {distance}")]
    InvalidDistance { route: String, distance: f64 },
    #[error("Route '{route}' needs at least two waypoints, got {count}")]
    TooFewWaypoints { route: String, count: usize },
    #[error("Route '{route}' has a non-finite coordinate at waypoint '{waypoint}'")]
    InvalidCoordinate { route: String, waypoint: String },
    #[error("Duplicate route identifier '{0}'")]
    DuplicateRoute(String),
    #[error("Duplicate vehicle identifier '{0}'")]
    DuplicateVehicle(String),
    #[error("Vehicle identifier must not be empty")]
    EmptyVehicleId,
    #[error("Vehicle '{vehicle}' starts at {distance} km, outside [0, {total}]")]
    InvalidStartDistance {
        vehicle: String,
        distance: f64,
        total: f64,
    },
    #[error("Vehicle '{vehicle}' speed {speed} km/h is outside [{min}, {max}]")]
    SpeedOutOfRange {
        vehicle: String,
        speed: f64,
        min: f64,
        max: f64,
    },
    #[error("Invalid simulation parameter: {0}")]
    InvalidParams(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Unknown vehicle '{0}'")]
    UnknownVehicle(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
