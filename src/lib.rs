use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::define_stub_info_gatherer;

use fleet::{PyFleet, create_demo_fleet, load_fleet, load_fleet_csv};
use vehicle::PyVehicle;

pub mod fleet;
pub mod vehicle;

/// A Python module implemented in Rust.
#[pymodule]
fn fleetsim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyFleet>()?;
    m.add_class::<PyVehicle>()?;
    m.add_function(wrap_pyfunction!(create_demo_fleet, m)?)?;
    m.add_function(wrap_pyfunction!(load_fleet, m)?)?;
    m.add_function(wrap_pyfunction!(load_fleet_csv, m)?)?;
    Ok(())
}

#[cfg(feature = "stubgen")]
define_stub_info_gatherer!(stub_info);
