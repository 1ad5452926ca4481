//! Footprints and footprint collections.
//!
//! A footprint is one candidate scene: a polygonal geometry plus an open
//! set of JSON attributes. A collection tags all of its geometries with a
//! single EPSG code; changing CRS always produces a new collection.

use geo::{unary_union, Area, BoundingRect, MultiPolygon, Rect};
use serde_json::Value;

use crate::error::{CoverError, ProjError};
use crate::geometry::buffer::centroid_lon_lat;
use crate::proj::crs::{to_lon_lat, CrsTransform};
use crate::proj::reproject::reproject_with;
use crate::proj::utm::{resolve_zone, ZoneCode};

/// Area column written on every working row.
pub const AREA_SQKM: &str = "area_sqkm";
/// Area a row contributes to the coverage set.
pub const AREA_SQKM_NEW: &str = "area_sqkm_new";

pub type Properties = serde_json::Map<String, Value>;

/// Area in square kilometres of a geometry held in a metric CRS.
pub fn area_sqkm(geometry: &MultiPolygon<f64>) -> f64 {
    geometry.unsigned_area() / 1e6
}

#[derive(Clone, Debug, PartialEq)]
pub struct Footprint {
    pub geometry: MultiPolygon<f64>,
    pub properties: Properties,
}

impl Footprint {
    pub fn new(geometry: impl Into<MultiPolygon<f64>>, properties: Properties) -> Self {
        Self {
            geometry: geometry.into(),
            properties,
        }
    }

    /// More than one disjoint part.
    pub fn is_multi_part(&self) -> bool {
        self.geometry.0.len() > 1
    }

    /// Numeric attribute, `None` if absent or not a number.
    pub fn number(&self, attribute: &str) -> Option<f64> {
        self.properties.get(attribute).and_then(Value::as_f64)
    }

    /// Same attributes, different geometry.
    pub fn with_geometry(&self, geometry: MultiPolygon<f64>) -> Self {
        Self {
            geometry,
            properties: self.properties.clone(),
        }
    }

    /// Write a numeric attribute. Non-finite values are stored as null.
    pub fn set_number(&mut self, attribute: &str, value: f64) {
        let v = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        self.properties.insert(attribute.to_string(), v);
    }

    /// Printable scene identifier from `field`, or `"?"` when absent.
    pub fn scene_id(&self, field: &str) -> String {
        match self.properties.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => "?".to_string(),
        }
    }
}

/// Ordered footprints sharing one CRS.
#[derive(Clone, Debug, PartialEq)]
pub struct FootprintCollection {
    crs: u32,
    footprints: Vec<Footprint>,
}

impl FootprintCollection {
    pub fn new(crs: u32, footprints: Vec<Footprint>) -> Self {
        Self { crs, footprints }
    }

    pub fn crs(&self) -> u32 {
        self.crs
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    pub fn footprints(&self) -> &[Footprint] {
        &self.footprints
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Footprint> {
        self.footprints.iter()
    }

    pub fn into_footprints(self) -> Vec<Footprint> {
        self.footprints
    }

    /// Bounding box over every row, `None` for an empty collection.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.footprints
            .iter()
            .filter_map(|fp| fp.geometry.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
    }

    /// UTM zone for the centre of the collection's bounding box.
    pub fn working_zone(&self) -> Result<ZoneCode, CoverError> {
        let rect = self.bounding_rect().ok_or_else(|| {
            CoverError::InvalidGeometry("bounding box of an empty collection".into())
        })?;
        let c = rect.center();
        let (lon, lat) = to_lon_lat(c.x, c.y, self.crs)?;
        Ok(resolve_zone(lon, lat))
    }

    /// Union of every row's geometry.
    pub fn union(&self) -> MultiPolygon<f64> {
        unary_union(self.footprints.iter().flat_map(|fp| fp.geometry.0.iter()))
    }

    /// Whole-collection reprojection.
    pub fn to_crs(&self, epsg: u32) -> Result<Self, ProjError> {
        if epsg == self.crs {
            return Ok(self.clone());
        }
        let ct = CrsTransform::new(self.crs, epsg)?;
        let footprints = self
            .footprints
            .iter()
            .map(|fp| -> Result<Footprint, ProjError> {
                Ok(fp.with_geometry(reproject_with(&fp.geometry, &ct)?))
            })
            .collect::<Result<Vec<_>, ProjError>>()?;
        Ok(Self::new(epsg, footprints))
    }

    /// New collection with every geometry passed through `f`.
    pub fn map_geometries<F>(&self, f: F) -> Self
    where
        F: Fn(&MultiPolygon<f64>) -> MultiPolygon<f64>,
    {
        let footprints = self
            .footprints
            .iter()
            .map(|fp| fp.with_geometry(f(&fp.geometry)))
            .collect();
        Self::new(self.crs, footprints)
    }
}

impl<'a> IntoIterator for &'a FootprintCollection {
    type Item = &'a Footprint;
    type IntoIter = std::slice::Iter<'a, Footprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.footprints.iter()
    }
}

/// Copy of `collection` with each row's area (sqkm) written to `column`.
///
/// Each row is measured in the UTM zone of its own centroid.
pub fn add_area_sqkm(
    collection: &FootprintCollection,
    column: &str,
) -> Result<FootprintCollection, CoverError> {
    let footprints = collection
        .iter()
        .map(|fp| -> Result<Footprint, CoverError> {
            let area = if fp.geometry.0.is_empty() {
                0.0
            } else {
                let (lon, lat) = centroid_lon_lat(&fp.geometry, collection.crs())?;
                let ct = CrsTransform::new(collection.crs(), resolve_zone(lon, lat))?;
                area_sqkm(&reproject_with(&fp.geometry, &ct)?)
            };
            let mut out = fp.clone();
            out.set_number(column, area);
            Ok(out)
        })
        .collect::<Result<Vec<_>, CoverError>>()?;
    Ok(FootprintCollection::new(collection.crs(), footprints))
}
