#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod config;
pub mod cover;
pub mod error;
pub mod footprint;
pub mod geometry;
pub mod io;
pub mod proj;
#[cfg(feature = "python")]
mod py;

pub use config::{AttributeLimit, PipelineConfig, SelectionConfig};
pub use cover::evaluate::{coverage_percentage, Aoi};
pub use cover::pipeline::{optimize_coverage, CoverageReport};
pub use cover::ranking::{Direction, RankKey};
pub use cover::selector::{select_full_coverage, CoverageSet};
pub use error::{CoverError, ProjError};
pub use footprint::{Footprint, FootprintCollection};
pub use geometry::buffer::buffer_meters;
pub use geometry::explode::explode;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
