//! Fleet state and read-only queries over it

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::Serialize;

use super::{Route, Vehicle, VehicleStatus};
use crate::{Kmh, RouteId, sim::SimulationParams};

/// Complete simulation state at one tick.
///
/// Route data and parameters are shared between successive states; the
/// vehicle roster is owned, so a new tick is a full-state swap.
#[derive(Debug, Clone)]
pub struct FleetState {
    pub(crate) routes: Arc<[Route]>,
    pub(crate) route_index: Arc<HashMap<RouteId, usize>>,
    pub(crate) params: Arc<SimulationParams>,
    pub(crate) vehicles: Vec<Vehicle>,
    pub(crate) tick: u64,
    pub(crate) clock: DateTime<Utc>,
}

/// Fleet-wide counters for the dashboard header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub on_time: usize,
    pub delayed: usize,
    pub ahead: usize,
    pub arrived: usize,
    pub mean_speed: Kmh,
}

impl FleetState {
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, route_id: &str) -> Option<&Route> {
        self.route_index.get(route_id).map(|&idx| &self.routes[idx])
    }

    pub fn route_of(&self, vehicle: &Vehicle) -> &Route {
        &self.routes[vehicle.route_idx]
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Number of ticks applied since initialization
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated wall clock
    pub fn clock(&self) -> DateTime<Utc> {
        self.clock
    }

    /// Restart the simulated clock at `start`
    #[must_use]
    pub fn with_clock(mut self, start: DateTime<Utc>) -> Self {
        self.clock = start;
        self
    }

    pub fn vehicle(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == vehicle_id)
    }

    pub(crate) fn vehicle_position(&self, vehicle_id: &str) -> Option<usize> {
        self.vehicles.iter().position(|v| v.id == vehicle_id)
    }

    /// Case-insensitive match on vehicle id, route id or route name.
    /// An empty term matches every vehicle.
    pub fn search(&self, term: &str) -> Vec<&Vehicle> {
        let term = term.trim().to_lowercase();
        self.vehicles
            .iter()
            .filter(|v| {
                term.is_empty()
                    || v.id.to_lowercase().contains(&term)
                    || self.route_of(v).matches(&term)
            })
            .collect()
    }

    pub fn vehicles_on_route(&self, route_id: &str) -> Vec<&Vehicle> {
        self.vehicles
            .iter()
            .filter(|v| v.route_id == route_id)
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> FleetSummary {
        let count = |status| {
            self.vehicles
                .iter()
                .filter(|v| v.status == status)
                .count()
        };

        let mean_speed = if self.vehicles.is_empty() {
            0.0
        } else {
            self.vehicles.iter().map(|v| v.speed).sum::<f64>() / self.vehicles.len() as f64
        };

        FleetSummary {
            total: self.vehicles.len(),
            on_time: count(VehicleStatus::OnTime),
            delayed: count(VehicleStatus::Delayed),
            ahead: count(VehicleStatus::Ahead),
            arrived: self.vehicles.iter().filter(|v| v.has_arrived()).count(),
            mean_speed,
        }
    }
}
