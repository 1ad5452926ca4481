//! Geometry reprojection: apply a [`CrsTransform`] to every vertex.
//!
//! Ring structure and part structure are untouched; only coordinates move.

use geo::{Coord, MapCoords};

use crate::error::ProjError;
use crate::proj::crs::CrsTransform;

/// Reproject any `geo` geometry from `epsg_in` to `epsg_out`.
pub fn reproject<G>(geometry: &G, epsg_in: u32, epsg_out: u32) -> Result<G::Output, ProjError>
where
    G: MapCoords<f64, f64>,
{
    let ct = CrsTransform::new(epsg_in, epsg_out)?;
    reproject_with(geometry, &ct)
}

/// Reproject with a prebuilt transform, for callers moving many geometries
/// between the same pair of CRS.
pub fn reproject_with<G>(geometry: &G, ct: &CrsTransform) -> Result<G::Output, ProjError>
where
    G: MapCoords<f64, f64>,
{
    geometry.try_map_coords(|c: Coord<f64>| {
        let (x, y) = ct.transform(c.x, c.y)?;
        Ok(Coord { x, y })
    })
}
