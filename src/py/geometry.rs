//! PyO3 bindings for zone lookup, reprojection and metric buffering.
//! Geometries travel as GeoJSON strings.

use pyo3::prelude::*;

use crate::error::CoverError;
use crate::geometry::buffer;
use crate::{io, proj};

/// Suitable UTM EPSG code for a lon/lat point, e.g. 32632.
#[pyfunction]
pub fn utm_zone_epsg(lon: f64, lat: f64) -> u32 {
    proj::resolve_zone(lon, lat)
}

/// Reproject a GeoJSON polygon/multipolygon from `epsg_in` to `epsg_out`.
#[pyfunction]
pub fn reproject_geometry(
    py: Python<'_>,
    geometry: &str,
    epsg_in: u32,
    epsg_out: u32,
) -> PyResult<String> {
    let geometry = geometry.to_string();
    let out = py.allow_threads(move || -> Result<String, CoverError> {
        let mp = io::read_geometry(&geometry)?;
        let mp = proj::reproject(&mp, epsg_in, epsg_out)?;
        Ok(io::write_geometry(&mp))
    })?;
    Ok(out)
}

/// Buffer a GeoJSON polygon by `distance` metres.
///
/// Args:
///     geometry: GeoJSON Polygon or MultiPolygon.
///     distance: Buffer size in metres; negative erodes.
///     epsg_in: CRS of the input geometry.
///     lon, lat: Optional point for UTM zone selection. Defaults to the
///         geometry centroid. Pass both or neither.
#[pyfunction]
#[pyo3(signature = (geometry, distance, epsg_in, lon=None, lat=None))]
pub fn buffer_meters(
    py: Python<'_>,
    geometry: &str,
    distance: f64,
    epsg_in: u32,
    lon: Option<f64>,
    lat: Option<f64>,
) -> PyResult<String> {
    let geometry = geometry.to_string();
    let lon_lat = buffer::zone_point(lon, lat)?;
    let out = py.allow_threads(move || -> Result<String, CoverError> {
        let mp = io::read_geometry(&geometry)?;
        let buffered = buffer::buffer_meters(&mp, distance, epsg_in, lon_lat)?;
        Ok(io::write_geometry(&buffered))
    })?;
    Ok(out)
}
