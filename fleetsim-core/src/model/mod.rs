//! Data model of the simulated fleet

pub mod fleet;
pub mod route;
pub mod vehicle;

pub use fleet::{FleetState, FleetSummary};
pub use route::{Route, RoutePoint};
pub use vehicle::{Vehicle, VehicleStatus, eta_minutes};
