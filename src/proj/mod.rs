//! CRS plumbing: UTM zone lookup, proj4rs-backed point transforms, and
//! whole-geometry reprojection.

pub mod crs;
pub mod reproject;
pub mod utm;

pub use crs::{CrsTransform, WGS84};
pub use reproject::reproject;
pub use utm::{resolve_zone, ZoneCode};
