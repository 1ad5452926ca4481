use crate::error::ProjError;
use proj4rs::Proj;

/// EPSG code of geographic WGS84 (lon/lat degrees).
pub const WGS84: u32 = 4326;

/// Point transform between two EPSG-coded CRS, backed by proj4rs.
///
/// proj4rs works in radians for geographic CRS while callers pass degrees,
/// so the wrapper converts on both ends. Axis order is always x first
/// (longitude or easting), regardless of the authority's declared order.
pub struct CrsTransform {
    src: Proj,
    dst: Proj,
    src_epsg: u32,
    dst_epsg: u32,
    src_is_geo: bool,
    dst_is_geo: bool,
}

fn load(epsg: u32) -> Result<Proj, ProjError> {
    Proj::from_user_string(&format!("EPSG:{epsg}"))
        .map_err(|e| ProjError::UnknownCrs(format!("EPSG:{epsg}: {e}")))
}

impl CrsTransform {
    /// Build a transform from `src_epsg` to `dst_epsg`.
    pub fn new(src_epsg: u32, dst_epsg: u32) -> Result<Self, ProjError> {
        let src = load(src_epsg)?;
        let dst = load(dst_epsg)?;
        let src_is_geo = src.is_latlong();
        let dst_is_geo = dst.is_latlong();
        Ok(Self {
            src,
            dst,
            src_epsg,
            dst_epsg,
            src_is_geo,
            dst_is_geo,
        })
    }

    /// Same CRS on both ends; coordinates pass through untouched.
    pub fn is_identity(&self) -> bool {
        self.src_epsg == self.dst_epsg
    }

    /// Transform a single point from source CRS to destination CRS.
    ///
    /// Coordinates are in CRS native units (degrees for geographic,
    /// metres for projected).
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        if self.is_identity() {
            return Ok((x, y));
        }

        let mut point = if self.src_is_geo {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        proj4rs::transform::transform(&self.src, &self.dst, &mut point).map_err(|e| {
            ProjError::TransformFailed(format!(
                "({x}, {y}) EPSG:{} -> EPSG:{}: {e}",
                self.src_epsg, self.dst_epsg
            ))
        })?;

        let out = if self.dst_is_geo {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            point
        };

        if out.0.is_finite() && out.1.is_finite() {
            Ok(out)
        } else {
            Err(ProjError::TransformFailed(format!(
                "({x}, {y}) EPSG:{} -> EPSG:{} produced a non-finite coordinate",
                self.src_epsg, self.dst_epsg
            )))
        }
    }

}

/// Convert a point to lon/lat degrees; a no-op when already in WGS84.
pub fn to_lon_lat(x: f64, y: f64, epsg: u32) -> Result<(f64, f64), ProjError> {
    if epsg == WGS84 {
        return Ok((x, y));
    }
    CrsTransform::new(epsg, WGS84)?.transform(x, y)
}
