// Re-export key components
pub use crate::error::{ConfigError, Error};
pub use crate::export::{snapshot_geojson, snapshot_geojson_string};
pub use crate::loading::{
    FleetConfig, RouteConfig, VehicleConfig, create_fleet, load_roster,
};
pub use crate::model::{FleetState, FleetSummary, Route, RoutePoint, Vehicle, VehicleStatus};
pub use crate::sim::{
    RandomSource, Simulation, SimulationParams, VehicleSnapshot, advance, initialize,
    reset_vehicle, snapshot,
};

// Units and identifiers
pub use crate::Km;
pub use crate::Kmh; // km/h
pub use crate::Minutes;
pub use crate::RouteId;
pub use crate::VehicleId;
