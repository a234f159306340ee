//! Server configuration: a TOML file with command-line overrides

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use fleetsim_core::prelude::*;
use serde::Deserialize;

use crate::ServerError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub simulation: SimulationConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 90,
            max_concurrent_requests: 256,
        }
    }
}

/// Where the roster comes from and how fast the simulation runs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Real seconds between two ticks
    pub tick_interval_secs: f64,
    /// Fixed seed for a reproducible run
    pub seed: Option<u64>,
    /// JSON fleet description
    pub fleet: Option<PathBuf>,
    /// CSV roster, used when both files are set
    pub routes_csv: Option<PathBuf>,
    pub vehicles_csv: Option<PathBuf>,
    /// Replaces the parameters of the roster when set
    pub params: Option<SimulationParams>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 30.0,
            seed: None,
            fleet: None,
            routes_csv: None,
            vehicles_csv: None,
            params: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub gateway_url: String,
    pub model: String,
    /// Name of the environment variable holding the gateway API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            gateway_url: "https://ai.gateway.lovable.dev/v1/chat/completions".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            api_key_env: "CHAT_GATEWAY_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ServerError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read the file at `path`, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ServerError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Real time between two ticks
    pub fn tick_period(&self) -> Result<Duration, ServerError> {
        let interval = self.simulation.tick_interval_secs;
        match Duration::try_from_secs_f64(interval) {
            Ok(period) if !period.is_zero() => Ok(period),
            _ => Err(ServerError::InvalidConfig(format!(
                "tick_interval_secs must be a positive number of seconds, got {interval}"
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        self.tick_period()?;
        if self.simulation.routes_csv.is_some() != self.simulation.vehicles_csv.is_some() {
            return Err(ServerError::InvalidConfig(
                "routes_csv and vehicles_csv must be set together".to_string(),
            ));
        }
        if self.server.max_concurrent_requests == 0 {
            return Err(ServerError::InvalidConfig(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the roster: CSV files, then a JSON file, then the built-in demo
    pub fn fleet_config(&self) -> Result<FleetConfig, ServerError> {
        let sim = &self.simulation;
        let params = sim.params.clone();

        let mut config = match (&sim.routes_csv, &sim.vehicles_csv, &sim.fleet) {
            (Some(routes), Some(vehicles), _) => {
                load_roster(routes, vehicles, params.clone().unwrap_or_default())?
            }
            (_, _, Some(fleet)) => FleetConfig::from_json_file(fleet)?,
            _ => {
                tracing::info!("No roster configured, using the built-in demo fleet");
                FleetConfig::demo()
            }
        };

        if let Some(params) = params {
            config.params = params;
        }
        Ok(config)
    }
}
