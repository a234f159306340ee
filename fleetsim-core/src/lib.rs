//! Simulated fleet position engine.
//!
//! Owns a fixed roster of simulated buses, advances their positions, ETAs
//! and statuses on a tick, and hands out immutable snapshots for rendering.

pub mod error;
pub mod export;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod sim;

pub use error::{ConfigError, Error};
pub use model::{FleetState, Route, RoutePoint, Vehicle, VehicleStatus};

/// Stable vehicle identifier, e.g. a registration plate
pub type VehicleId = String;
/// Route identifier as used in configuration
pub type RouteId = String;
/// Kilometres
pub type Km = f64;
/// Kilometres per hour
pub type Kmh = f64;
/// Whole minutes
pub type Minutes = u32;
