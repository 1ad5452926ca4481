//! GeoJSON boundary: FeatureCollection strings in and out.
//!
//! GeoJSON carries no CRS of its own here; the caller states it.

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use tracing::debug;

use crate::error::CoverError;
use crate::footprint::{Footprint, FootprintCollection};

fn parse(s: &str) -> Result<GeoJson, CoverError> {
    s.parse::<GeoJson>()
        .map_err(|e| CoverError::GeoJson(e.to_string()))
}

fn geometry_kind(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        _ => "non-polygonal geometry",
    }
}

fn to_multi_polygon(geometry: Geometry) -> Result<MultiPolygon<f64>, CoverError> {
    let geometry: geo::Geometry<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| CoverError::GeoJson(e.to_string()))?;
    match geometry {
        geo::Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p])),
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        other => Err(CoverError::UnsupportedGeometry(
            geometry_kind(&other).to_string(),
        )),
    }
}

fn from_multi_polygon(geometry: &MultiPolygon<f64>) -> Geometry {
    match geometry.0.as_slice() {
        [single] => Geometry::new(Value::from(single)),
        _ => Geometry::new(Value::from(geometry)),
    }
}

/// Parse a GeoJSON FeatureCollection (or single Feature) into footprints
/// tagged with `crs`.
pub fn read_feature_collection(s: &str, crs: u32) -> Result<FootprintCollection, CoverError> {
    let features = match parse(s)? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(CoverError::GeoJson(
                "expected a Feature or FeatureCollection, got a bare geometry".into(),
            ))
        }
    };

    let footprints = features
        .into_iter()
        .map(|f| -> Result<Footprint, CoverError> {
            let geometry = f
                .geometry
                .ok_or_else(|| CoverError::GeoJson("feature without geometry".into()))?;
            Ok(Footprint::new(
                to_multi_polygon(geometry)?,
                f.properties.unwrap_or_default(),
            ))
        })
        .collect::<Result<Vec<_>, CoverError>>()?;

    debug!(rows = footprints.len(), crs, "read feature collection");
    Ok(FootprintCollection::new(crs, footprints))
}

/// Serialize footprints as a GeoJSON FeatureCollection. Single-part rows
/// are written as Polygon, multi-part rows as MultiPolygon.
pub fn write_feature_collection(collection: &FootprintCollection) -> String {
    let features = collection
        .iter()
        .map(|fp| Feature {
            bbox: None,
            geometry: Some(from_multi_polygon(&fp.geometry)),
            id: None,
            properties: Some(fp.properties.clone()),
            foreign_members: None,
        })
        .collect();

    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
    .to_string()
}

/// Parse a bare geometry, a Feature, or a FeatureCollection into a single
/// polygonal geometry. Collections are merged part-wise.
pub fn read_geometry(s: &str) -> Result<MultiPolygon<f64>, CoverError> {
    match parse(s)? {
        GeoJson::Geometry(g) => to_multi_polygon(g),
        GeoJson::Feature(f) => f
            .geometry
            .ok_or_else(|| CoverError::GeoJson("feature without geometry".into()))
            .and_then(to_multi_polygon),
        GeoJson::FeatureCollection(_) => {
            let fc = read_feature_collection(s, 0)?;
            Ok(MultiPolygon::new(
                fc.into_footprints()
                    .into_iter()
                    .flat_map(|fp| fp.geometry.0)
                    .collect(),
            ))
        }
    }
}

/// Serialize a bare geometry.
pub fn write_geometry(geometry: &MultiPolygon<f64>) -> String {
    GeoJson::from(from_multi_polygon(geometry)).to_string()
}
