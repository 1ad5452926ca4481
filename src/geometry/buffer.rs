//! Metric buffering of geographic geometries.
//!
//! Buffering in degrees has no ground meaning, so the geometry hops into
//! the UTM zone of its evaluation point, is buffered there in metres, and
//! hops back.

use geo::orient::{Direction, Orient};
use geo::{unary_union, Buffer, Centroid, MultiPolygon};
use tracing::trace;

use crate::error::CoverError;
use crate::proj::crs::{to_lon_lat, CrsTransform};
use crate::proj::reproject::reproject_with;
use crate::proj::utm::resolve_zone;

/// Zero-distance buffer: dissolves self-intersections and overlapping
/// parts left behind by boolean operations.
///
/// Rings are re-wound first (exterior counter-clockwise, holes clockwise)
/// so that a hole stays a hole whatever winding the input used.
pub fn clean(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    let oriented = geometry.orient(Direction::Default);
    unary_union(oriented.0.iter())
}

/// Validate an optional UTM evaluation point given as separate
/// coordinates: both or neither.
pub fn zone_point(lon: Option<f64>, lat: Option<f64>) -> Result<Option<(f64, f64)>, CoverError> {
    match (lon, lat) {
        (Some(lon), Some(lat)) => Ok(Some((lon, lat))),
        (None, None) => Ok(None),
        _ => Err(CoverError::InvalidArgument(
            "lon and lat must be given together".into(),
        )),
    }
}

/// Planar buffer in the geometry's own units. Zero distance is [`clean`].
pub fn buffer_planar(geometry: &MultiPolygon<f64>, distance: f64) -> MultiPolygon<f64> {
    if distance == 0.0 {
        clean(geometry)
    } else {
        geometry.buffer(distance)
    }
}

/// Lon/lat of the geometry's centroid, whatever CRS it is in.
pub fn centroid_lon_lat(geometry: &MultiPolygon<f64>, epsg: u32) -> Result<(f64, f64), CoverError> {
    let c = geometry
        .centroid()
        .ok_or_else(|| CoverError::InvalidGeometry("centroid of an empty geometry".into()))?;
    Ok(to_lon_lat(c.x(), c.y(), epsg)?)
}

/// Buffer `geometry` by `distance_m` metres.
///
/// The UTM zone comes from the geometry centroid, or from `lon_lat` when
/// given. Negative distances erode; zero only cleans topology.
pub fn buffer_meters(
    geometry: &MultiPolygon<f64>,
    distance_m: f64,
    epsg_in: u32,
    lon_lat: Option<(f64, f64)>,
) -> Result<MultiPolygon<f64>, CoverError> {
    let (lon, lat) = match lon_lat {
        Some(p) => p,
        None => centroid_lon_lat(geometry, epsg_in)?,
    };
    let zone = resolve_zone(lon, lat);
    trace!(lon, lat, zone, distance_m, "metric buffer");

    let to_utm = CrsTransform::new(epsg_in, zone)?;
    let from_utm = CrsTransform::new(zone, epsg_in)?;

    let utm = reproject_with(geometry, &to_utm)?;
    let buffered = buffer_planar(&utm, distance_m);
    Ok(reproject_with(&buffered, &from_utm)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{polygon, Area, Contains, LineString, Polygon};

    fn test_poly() -> Polygon<f64> {
        polygon![
            (x: 119.46069717407228, y: -5.1656599047481615),
            (x: 119.46413040161133, y: -5.194210278739781),
            (x: 119.50241088867188, y: -5.194039322258176),
            (x: 119.5001792907715, y: -5.1579664699241885),
            (x: 119.47477340698242, y: -5.15830840234196),
            (x: 119.46069717407228, y: -5.1656599047481615),
        ]
    }

    fn utm_area(mp: &MultiPolygon<f64>) -> f64 {
        let ct = CrsTransform::new(4326, 32750).unwrap();
        reproject_with(mp, &ct).unwrap().unsigned_area()
    }

    #[test]
    fn test_zero_buffer_is_noop() {
        let mp = MultiPolygon::new(vec![test_poly()]);
        let out = buffer_meters(&mp, 0.0, 4326, None).unwrap();
        assert_eq!(out.0.len(), 1);
        assert_relative_eq!(utm_area(&out), utm_area(&mp), max_relative = 1e-6);
        let c_in = mp.centroid().unwrap();
        let c_out = out.centroid().unwrap();
        assert_relative_eq!(c_in.x(), c_out.x(), epsilon = 1e-7);
        assert_relative_eq!(c_in.y(), c_out.y(), epsilon = 1e-7);
    }

    #[test]
    fn test_zero_buffer_with_centroid_override() {
        let mp = MultiPolygon::new(vec![test_poly()]);
        let c = mp.centroid().unwrap();
        let out = buffer_meters(&mp, 0.0, 4326, Some((c.x(), c.y()))).unwrap();
        assert_relative_eq!(utm_area(&out), utm_area(&mp), max_relative = 1e-6);
    }

    #[test]
    fn test_ten_metre_buffer_grows_by_perimeter() {
        let mp = MultiPolygon::new(vec![test_poly()]);
        let out = buffer_meters(&mp, 10.0, 4326, None).unwrap();
        let grown = utm_area(&out) - utm_area(&mp);
        // perimeter (~16 km) * 10 m plus rounded corners
        assert!(grown > 150_000.0 && grown < 180_000.0, "grown = {grown}");
        // outermost vertex moved by roughly 10 m (~9e-5 degrees)
        let max_x = out.0[0].exterior().coords().map(|c| c.x).fold(f64::MIN, f64::max);
        assert_relative_eq!(max_x, 119.50241088867188 + 9.0e-5, epsilon = 5.0e-5);
    }

    #[test]
    fn test_buffer_is_monotone() {
        let mp = MultiPolygon::new(vec![test_poly()]);
        let small = buffer_meters(&mp, 5.0, 4326, None).unwrap();
        let large = buffer_meters(&mp, 50.0, 4326, None).unwrap();
        assert!(utm_area(&large) > utm_area(&small));
        for c in small.0[0].exterior().coords() {
            assert!(large.contains(&geo::Point::from(*c)));
        }
    }

    #[test]
    fn test_negative_buffer_erodes() {
        let mp = MultiPolygon::new(vec![test_poly()]);
        let out = buffer_meters(&mp, -100.0, 4326, None).unwrap();
        assert!(utm_area(&out) < utm_area(&mp));
        assert!(mp.contains(&out.centroid().unwrap()));
    }

    #[test]
    fn test_clean_dissolves_overlap() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        let b = polygon![(x: 1.0, y: 0.0), (x: 3.0, y: 0.0), (x: 3.0, y: 2.0), (x: 1.0, y: 2.0)];
        let cleaned = clean(&MultiPolygon::new(vec![a, b]));
        assert_eq!(cleaned.0.len(), 1);
        assert_relative_eq!(cleaned.unsigned_area(), 6.0, epsilon = 1e-9);
    }

    fn square_with_hole(hole_ccw: bool) -> Polygon<f64> {
        let exterior = LineString::from(vec![
            (10.0, 50.0),
            (10.1, 50.0),
            (10.1, 50.1),
            (10.0, 50.1),
            (10.0, 50.0),
        ]);
        let mut hole = vec![
            (10.03, 50.03),
            (10.06, 50.03),
            (10.06, 50.06),
            (10.03, 50.06),
            (10.03, 50.03),
        ];
        if !hole_ccw {
            hole.reverse();
        }
        Polygon::new(exterior, vec![LineString::from(hole)])
    }

    #[test]
    fn test_clean_keeps_holes_of_either_winding() {
        for hole_ccw in [true, false] {
            let mp = MultiPolygon::new(vec![square_with_hole(hole_ccw)]);
            let cleaned = clean(&mp);
            assert_eq!(cleaned.0.len(), 1);
            assert_eq!(cleaned.0[0].interiors().len(), 1, "hole_ccw = {hole_ccw}");
            assert_relative_eq!(cleaned.unsigned_area(), 0.0091, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_zero_buffer_keeps_same_winding_hole() {
        let mp = MultiPolygon::new(vec![square_with_hole(true)]);
        let out = buffer_meters(&mp, 0.0, 4326, None).unwrap();
        assert_eq!(out.0[0].interiors().len(), 1);
        let ct = CrsTransform::new(4326, 32632).unwrap();
        let area = |g: &MultiPolygon<f64>| reproject_with(g, &ct).unwrap().unsigned_area();
        assert_relative_eq!(area(&out), area(&mp), max_relative = 1e-6);
    }

    #[test]
    fn test_zone_point_needs_both_coordinates() {
        assert_eq!(zone_point(Some(1.0), Some(2.0)).unwrap(), Some((1.0, 2.0)));
        assert_eq!(zone_point(None, None).unwrap(), None);
        assert!(matches!(zone_point(Some(1.0), None), Err(CoverError::InvalidArgument(_))));
        assert!(matches!(zone_point(None, Some(2.0)), Err(CoverError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_geometry_has_no_centroid() {
        let err = buffer_meters(&MultiPolygon::new(vec![]), 1.0, 4326, None).unwrap_err();
        assert!(matches!(err, CoverError::InvalidGeometry(_)));
    }
}
