use serde::{Deserialize, Serialize};

use crate::{ConfigError, Kmh};

/// Tunables of the simulation.
///
/// Defaults give the pace of the dashboard live map: 30 s ticks, 30 to 70 km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub min_speed: Kmh,
    pub max_speed: Kmh,
    /// Largest speed change applied in a single tick
    pub speed_delta: Kmh,
    pub speed_change_probability: f64,
    pub status_change_probability: f64,
    pub delay_threshold_minutes: f64,
    pub ahead_threshold_minutes: f64,
    pub ahead_progress_threshold: f64,
    /// Simulated seconds per tick
    pub tick_seconds: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            min_speed: 30.0,
            max_speed: 70.0,
            speed_delta: 5.0,
            speed_change_probability: 0.3,
            status_change_probability: 0.1,
            delay_threshold_minutes: 30.0,
            ahead_threshold_minutes: 10.0,
            ahead_progress_threshold: 0.8,
            tick_seconds: 30.0,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_speed.is_finite() && self.min_speed > 0.0) {
            return Err(invalid(format!(
                "min_speed must be positive, got {}",
                self.min_speed
            )));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= self.min_speed) {
            return Err(invalid(format!(
                "max_speed {} is below min_speed {}",
                self.max_speed, self.min_speed
            )));
        }
        if !(self.speed_delta.is_finite() && self.speed_delta >= 0.0) {
            return Err(invalid(format!(
                "speed_delta must be non-negative, got {}",
                self.speed_delta
            )));
        }
        for (name, value) in [
            ("speed_change_probability", self.speed_change_probability),
            ("status_change_probability", self.status_change_probability),
            ("ahead_progress_threshold", self.ahead_progress_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        for (name, value) in [
            ("delay_threshold_minutes", self.delay_threshold_minutes),
            ("ahead_threshold_minutes", self.ahead_threshold_minutes),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.tick_seconds.is_finite() && self.tick_seconds > 0.0) {
            return Err(invalid(format!(
                "tick_seconds must be positive, got {}",
                self.tick_seconds
            )));
        }
        Ok(())
    }

    pub fn clamp_speed(&self, speed: Kmh) -> Kmh {
        speed.clamp(self.min_speed, self.max_speed)
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::InvalidParams(message)
}
