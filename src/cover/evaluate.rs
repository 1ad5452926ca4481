use geo::{Area, MultiPolygon};
use tracing::debug;

use crate::error::CoverError;
use crate::footprint::FootprintCollection;
use crate::geometry::buffer::centroid_lon_lat;
use crate::proj::reproject::reproject;
use crate::proj::utm::resolve_zone;

/// Area of interest: one geometry tagged with its CRS.
#[derive(Clone, Debug, PartialEq)]
pub struct Aoi {
    pub geometry: MultiPolygon<f64>,
    pub crs: u32,
}

impl Aoi {
    pub fn new(geometry: impl Into<MultiPolygon<f64>>, crs: u32) -> Self {
        Self {
            geometry: geometry.into(),
            crs,
        }
    }

    /// The union of every row of a collection as one AOI.
    pub fn from_collection(collection: &FootprintCollection) -> Self {
        Self::new(collection.union(), collection.crs())
    }
}

/// Percentage of the AOI's area covered by the union of `coverage`.
///
/// Measured in the UTM zone of the coverage set's bounding-box centre.
/// Exceeds 100 when the coverage reaches beyond the AOI.
pub fn coverage_percentage(aoi: &Aoi, coverage: &FootprintCollection) -> Result<f64, CoverError> {
    let zone = if coverage.is_empty() {
        let (lon, lat) = centroid_lon_lat(&aoi.geometry, aoi.crs)?;
        resolve_zone(lon, lat)
    } else {
        coverage.working_zone()?
    };

    let aoi_area = reproject(&aoi.geometry, aoi.crs, zone)?.unsigned_area();
    if aoi_area <= 0.0 {
        return Err(CoverError::DegenerateAoi);
    }
    let covered_area = coverage.to_crs(zone)?.union().unsigned_area();

    let pct = 100.0 * covered_area / aoi_area;
    debug!(zone, aoi_area, covered_area, pct, "coverage percentage");
    Ok(pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::{Footprint, Properties};
    use approx::assert_relative_eq;
    use geo::{polygon, Polygon};

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]
    }

    fn collection(polys: Vec<Polygon<f64>>) -> FootprintCollection {
        FootprintCollection::new(
            4326,
            polys
                .into_iter()
                .map(|p| Footprint::new(p, Properties::new()))
                .collect(),
        )
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]
    }

    #[test]
    fn test_exact_cover_is_hundred() {
        let aoi = Aoi::new(square(10.0, 50.0, 0.1), 4326);
        let cov = collection(vec![
            rect(10.0, 50.0, 10.05, 50.1),
            rect(10.05, 50.0, 10.1, 50.05),
            rect(10.05, 50.05, 10.1, 50.1),
        ]);
        let pct = coverage_percentage(&aoi, &cov).unwrap();
        assert_relative_eq!(pct, 100.0, max_relative = 1e-6);
    }

    #[test]
    fn test_overlaps_counted_once() {
        let aoi = Aoi::new(square(10.0, 50.0, 0.1), 4326);
        let cov = collection(vec![square(10.0, 50.0, 0.1), square(10.0, 50.0, 0.1)]);
        let pct = coverage_percentage(&aoi, &cov).unwrap();
        assert_relative_eq!(pct, 100.0, max_relative = 1e-6);
    }

    #[test]
    fn test_partial_and_excess_cover() {
        let aoi = Aoi::new(square(10.0, 50.0, 0.1), 4326);
        let half = collection(vec![square(10.0, 50.0, 0.05)]);
        let pct = coverage_percentage(&aoi, &half).unwrap();
        assert!(pct > 20.0 && pct < 30.0, "pct = {pct}");

        let larger = collection(vec![square(9.95, 49.95, 0.2)]);
        assert!(coverage_percentage(&aoi, &larger).unwrap() > 100.0);
    }

    #[test]
    fn test_empty_coverage_is_zero() {
        let aoi = Aoi::new(square(10.0, 50.0, 0.1), 4326);
        let pct = coverage_percentage(&aoi, &collection(vec![])).unwrap();
        assert_relative_eq!(pct, 0.0);
    }

    #[test]
    fn test_degenerate_aoi() {
        let aoi = Aoi::new(
            polygon![(x: 10.0, y: 50.0), (x: 10.1, y: 50.0), (x: 10.2, y: 50.0)],
            4326,
        );
        let cov = collection(vec![square(10.0, 50.0, 0.05)]);
        let err = coverage_percentage(&aoi, &cov).unwrap_err();
        assert!(matches!(err, CoverError::DegenerateAoi));
    }
}
