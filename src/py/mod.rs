use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::CoverError;

mod cover;
mod geometry;

impl From<CoverError> for PyErr {
    fn from(e: CoverError) -> Self {
        PyValueError::new_err(e.to_string())
    }
}

/// Register all Python-visible functions.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(geometry::utm_zone_epsg, m)?)?;
    m.add_function(wrap_pyfunction!(geometry::reproject_geometry, m)?)?;
    m.add_function(wrap_pyfunction!(geometry::buffer_meters, m)?)?;
    m.add_function(wrap_pyfunction!(cover::explode, m)?)?;
    m.add_function(wrap_pyfunction!(cover::select_full_coverage, m)?)?;
    m.add_function(wrap_pyfunction!(cover::coverage_percentage, m)?)?;
    m.add_function(wrap_pyfunction!(cover::optimize_coverage, m)?)?;
    Ok(())
}
