use std::path::PathBuf;

use chrono::{DateTime, Utc};
use fleetsim_core::prelude::*;
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};

use crate::vehicle::PyVehicle;

pub(crate) fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::Config(e) => PyValueError::new_err(format!("Invalid fleet configuration: {e}")),
        Error::UnknownVehicle(id) => PyKeyError::new_err(format!("Unknown vehicle: {id}")),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Fleet
///
/// A running fleet simulation. Each ``step`` advances every vehicle by one
/// configured tick; the same seed always produces the same run.
///
/// Example:
///
/// .. code-block:: python
///
///     fleet = create_demo_fleet(seed=42)
///     fleet.run(10)
///     for vehicle in fleet.vehicles():
///         print(vehicle.id, vehicle.status, vehicle.eta_minutes)
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "Fleet")]
pub struct PyFleet {
    simulation: Simulation,
}

impl PyFleet {
    fn build(config: &FleetConfig, seed: Option<u64>) -> PyResult<Self> {
        let state = create_fleet(config).map_err(to_py_err)?;
        let seed = seed.unwrap_or_else(|| Utc::now().timestamp_micros().unsigned_abs());
        Ok(Self {
            simulation: Simulation::seeded(state, seed),
        })
    }
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyFleet {
    /// Advance by one configured tick
    pub fn step(&mut self) {
        self.simulation.step();
    }

    /// Advance by an arbitrary number of simulated seconds
    pub fn advance(&mut self, seconds: f64) {
        self.simulation.advance_by(seconds);
    }

    pub fn run(&mut self, ticks: u64) {
        self.simulation.run(ticks);
    }

    /// Put a vehicle back at the start of its route
    pub fn reset_vehicle(&mut self, vehicle_id: &str) -> PyResult<()> {
        self.simulation
            .reset_vehicle(vehicle_id)
            .map(|_| ())
            .map_err(to_py_err)
    }

    pub fn vehicles(&self) -> Vec<PyVehicle> {
        self.simulation
            .snapshot()
            .into_iter()
            .map(PyVehicle::from)
            .collect()
    }

    pub fn vehicle(&self, vehicle_id: &str) -> Option<PyVehicle> {
        self.simulation
            .state()
            .vehicle_snapshot(vehicle_id)
            .map(PyVehicle::from)
    }

    /// Case-insensitive search over vehicle id, route id and route name
    pub fn search(&self, term: &str) -> Vec<PyVehicle> {
        self.simulation
            .state()
            .search_snapshots(term)
            .into_iter()
            .map(PyVehicle::from)
            .collect()
    }

    pub fn route_ids(&self) -> Vec<String> {
        self.simulation
            .state()
            .routes()
            .iter()
            .map(|route| route.id.clone())
            .collect()
    }

    pub fn summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let summary = self.simulation.state().summary();
        let dict = PyDict::new(py);
        dict.set_item("total", summary.total)?;
        dict.set_item("on_time", summary.on_time)?;
        dict.set_item("delayed", summary.delayed)?;
        dict.set_item("ahead", summary.ahead)?;
        dict.set_item("arrived", summary.arrived)?;
        dict.set_item("mean_speed", summary.mean_speed)?;
        Ok(dict)
    }

    /// Routes and vehicles as a GeoJSON FeatureCollection string
    pub fn to_geojson(&self) -> PyResult<String> {
        snapshot_geojson_string(self.simulation.state()).map_err(to_py_err)
    }

    #[getter]
    fn tick(&self) -> u64 {
        self.simulation.state().tick()
    }

    /// Simulated wall clock
    #[getter]
    fn clock(&self) -> DateTime<Utc> {
        self.simulation.state().clock()
    }

    fn __len__(&self) -> usize {
        self.simulation.state().len()
    }

    fn __repr__(&self) -> String {
        let state = self.simulation.state();
        format!(
            "Fleet with {} vehicles on {} routes at tick {}",
            state.len(),
            state.routes().len(),
            state.tick()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

/// Create the built-in demo fleet of five buses on three routes
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (seed=None))]
pub fn create_demo_fleet(seed: Option<u64>) -> PyResult<PyFleet> {
    PyFleet::build(&FleetConfig::demo(), seed)
}

/// Load a fleet from a JSON description
///
/// Parameters
/// ----------
/// path : str
///     JSON file with ``routes``, ``vehicles`` and optional ``params``
/// seed : int, optional
///     Seed for a reproducible run
///
/// Raises
/// ------
/// ValueError
///     If the roster is inconsistent (unknown route, bad distance, ...)
/// RuntimeError
///     If the file cannot be read or parsed
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (path, seed=None))]
pub fn load_fleet(path: PathBuf, seed: Option<u64>) -> PyResult<PyFleet> {
    let config = FleetConfig::from_json_file(&path).map_err(to_py_err)?;
    PyFleet::build(&config, seed)
}

/// Load a fleet from a routes CSV and a vehicles CSV, with default parameters
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (routes_path, vehicles_path, seed=None))]
pub fn load_fleet_csv(
    routes_path: PathBuf,
    vehicles_path: PathBuf,
    seed: Option<u64>,
) -> PyResult<PyFleet> {
    let config = load_roster(&routes_path, &vehicles_path, SimulationParams::default())
        .map_err(to_py_err)?;
    PyFleet::build(&config, seed)
}
