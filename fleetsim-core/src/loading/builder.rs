use log::{info, warn};

use super::config::FleetConfig;
use crate::{Error, FleetState, sim::initialize};

/// Creates the initial fleet state from a configuration
///
/// # Errors
///
/// Returns an error if the configuration is malformed
pub fn create_fleet(config: &FleetConfig) -> Result<FleetState, Error> {
    info!(
        "Building fleet of {} vehicles on {} routes",
        config.vehicles.len(),
        config.routes.len()
    );

    let state = initialize(&config.routes, &config.vehicles, config.params.clone())?;

    warn_unused_routes(&state);

    let summary = state.summary();
    info!(
        "Fleet ready: {} on time, {} delayed, {} ahead",
        summary.on_time, summary.delayed, summary.ahead
    );
    Ok(state)
}

fn warn_unused_routes(state: &FleetState) {
    let idle: Vec<&str> = state
        .routes()
        .iter()
        .filter(|route| state.vehicles_on_route(&route.id).is_empty())
        .map(|route| route.id.as_str())
        .collect();

    if !idle.is_empty() {
        warn!(
            "{} route(s) have no vehicles assigned: {}",
            idle.len(),
            idle.join(", ")
        );
    }
}
