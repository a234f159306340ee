//! The fleet simulator: initialization, the pure tick function and snapshots.
//!
//! `initialize` validates configuration once; after that `advance` is total
//! and every state it returns keeps the vehicle invariants (distance within
//! the route, coordinate on the terminal-to-terminal line, ETA of at least
//! one minute, speed within the configured range).

mod advance;
mod driver;
mod init;
mod params;
mod random;
mod snapshot;

pub use advance::{advance, reset_vehicle};
pub use driver::Simulation;
pub use init::initialize;
pub use params::SimulationParams;
pub use random::RandomSource;
pub use snapshot::{VehicleSnapshot, snapshot};
