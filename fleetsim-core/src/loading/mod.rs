//! This module is responsible for reading static fleet configuration
//! (JSON or CSV rosters) and building the initial fleet state.

mod builder;
mod config;
pub mod roster;

pub use builder::create_fleet;
pub use config::{FleetConfig, RouteConfig, VehicleConfig};
pub use roster::load_roster;
