use fleetsim_core::prelude::*;
use pyo3::prelude::*;
use pyo3::types::PyDict;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pymethods};

/// Vehicle
///
/// Read-only view of one simulated bus at the moment it was taken.
/// Later ticks do not change it; call ``Fleet.vehicles()`` again for
/// fresh values.
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "Vehicle")]
#[derive(Clone)]
pub struct PyVehicle {
    pub(crate) inner: VehicleSnapshot,
}

impl From<VehicleSnapshot> for PyVehicle {
    fn from(inner: VehicleSnapshot) -> Self {
        Self { inner }
    }
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyVehicle {
    #[getter]
    fn id(&self) -> &str {
        &self.inner.id
    }

    #[getter]
    fn route_id(&self) -> &str {
        &self.inner.route_id
    }

    #[getter]
    fn route_name(&self) -> &str {
        &self.inner.route_name
    }

    /// (lat, lng)
    #[getter]
    fn coordinates(&self) -> (f64, f64) {
        (self.inner.lat, self.inner.lng)
    }

    /// Kilometres covered since the start of the route
    #[getter]
    fn distance_traveled(&self) -> f64 {
        self.inner.distance_traveled
    }

    #[getter]
    fn total_distance(&self) -> f64 {
        self.inner.total_distance
    }

    /// Fraction of the route covered, 0.0 to 1.0
    #[getter]
    fn progress(&self) -> f64 {
        self.inner.progress
    }

    /// Current speed in km/h
    #[getter]
    fn speed(&self) -> f64 {
        self.inner.speed
    }

    /// One of "on-time", "delayed", "ahead"
    #[getter]
    fn status(&self) -> &'static str {
        self.inner.status.as_str()
    }

    #[getter]
    fn eta_minutes(&self) -> u32 {
        self.inner.eta_minutes
    }

    #[getter]
    fn next_stop(&self) -> &str {
        &self.inner.next_stop
    }

    pub fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let v = &self.inner;
        let dict = PyDict::new(py);
        dict.set_item("id", &v.id)?;
        dict.set_item("route_id", &v.route_id)?;
        dict.set_item("route_name", &v.route_name)?;
        dict.set_item("lat", v.lat)?;
        dict.set_item("lng", v.lng)?;
        dict.set_item("distance_traveled", v.distance_traveled)?;
        dict.set_item("total_distance", v.total_distance)?;
        dict.set_item("progress", v.progress)?;
        dict.set_item("speed", v.speed)?;
        dict.set_item("status", v.status.as_str())?;
        dict.set_item("eta_minutes", v.eta_minutes)?;
        dict.set_item("next_stop", &v.next_stop)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "Vehicle(id={}, route={}, progress={:.1}%, speed={:.0} km/h, status={}, eta={} min)",
            self.inner.id,
            self.inner.route_id,
            self.inner.progress * 100.0,
            self.inner.speed,
            self.inner.status,
            self.inner.eta_minutes
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}
