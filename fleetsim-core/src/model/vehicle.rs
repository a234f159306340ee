use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Km, Kmh, Minutes, RouteId, VehicleId, sim::SimulationParams};

/// Punctuality classification shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleStatus {
    OnTime,
    Delayed,
    Ahead,
}

impl VehicleStatus {
    /// Derive the status from the current ETA and route progress.
    ///
    /// Delay wins over being ahead; a vehicle only counts as ahead near the
    /// end of its route.
    pub fn classify(eta: Minutes, progress: f64, params: &SimulationParams) -> Self {
        if f64::from(eta) > params.delay_threshold_minutes {
            VehicleStatus::Delayed
        } else if f64::from(eta) < params.ahead_threshold_minutes
            && progress > params.ahead_progress_threshold
        {
            VehicleStatus::Ahead
        } else {
            VehicleStatus::OnTime
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::OnTime => "on-time",
            VehicleStatus::Delayed => "delayed",
            VehicleStatus::Ahead => "ahead",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minutes left at the current speed, never below one
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn eta_minutes(remaining: Km, speed: Kmh) -> Minutes {
    (remaining / speed * 60.0).round().max(1.0) as Minutes
}

/// A simulated bus.
///
/// Only the simulator mutates a vehicle, so fields are read through getters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub(crate) id: VehicleId,
    pub(crate) route_id: RouteId,
    /// Index of the route in the fleet's route table
    #[serde(skip)]
    pub(crate) route_idx: usize,
    pub(crate) lat: f64,
    pub(crate) lng: f64,
    pub(crate) distance_traveled: Km,
    pub(crate) total_distance: Km,
    pub(crate) speed: Kmh,
    pub(crate) status: VehicleStatus,
    pub(crate) eta: Minutes,
}

impl Vehicle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn route_idx(&self) -> usize {
        self.route_idx
    }

    /// (lat, lng)
    pub fn coordinate(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn distance_traveled(&self) -> Km {
        self.distance_traveled
    }

    pub fn total_distance(&self) -> Km {
        self.total_distance
    }

    pub fn remaining_distance(&self) -> Km {
        self.total_distance - self.distance_traveled
    }

    pub fn speed(&self) -> Kmh {
        self.speed
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    pub fn eta(&self) -> Minutes {
        self.eta
    }

    pub fn progress(&self) -> f64 {
        self.distance_traveled / self.total_distance
    }

    pub fn has_arrived(&self) -> bool {
        self.distance_traveled >= self.total_distance
    }
}
