//! PyO3 bindings for decomposition, full-coverage selection and coverage
//! evaluation over GeoJSON FeatureCollections.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{AttributeLimit, PipelineConfig, SelectionConfig};
use crate::cover::evaluate::Aoi;
use crate::cover::ranking::{Direction, RankKey};
use crate::error::CoverError;
use crate::{cover, geometry, io};

fn rank_keys(ranking: Vec<(String, String)>) -> PyResult<Vec<RankKey>> {
    ranking
        .into_iter()
        .map(|(attribute, direction)| -> PyResult<RankKey> {
            let direction = Direction::from_name(&direction).ok_or_else(|| {
                PyValueError::new_err(format!("Unknown ranking direction: '{direction}'"))
            })?;
            Ok(RankKey {
                attribute,
                direction,
            })
        })
        .collect()
}

/// Split multi-part features into one feature per part.
#[pyfunction]
#[pyo3(signature = (features, epsg=4326))]
pub fn explode(features: &str, epsg: u32) -> PyResult<String> {
    let fc = io::read_feature_collection(features, epsg)?;
    Ok(io::write_feature_collection(&geometry::explode::explode(&fc)))
}

/// Greedy full-coverage selection.
///
/// Args:
///     features: GeoJSON FeatureCollection of candidate footprints.
///     ranking: List of (attribute, direction) pairs, direction "asc" or
///         "desc". Area is always the final key, larger first.
///     epsg: CRS of the input features.
///     min_fragment_sqkm: Fragments at or below this size are dropped.
///     scene_id_field: Attribute used to name scenes in errors.
///
/// Returns:
///     GeoJSON FeatureCollection of the selected (possibly clipped) features
///     in selection order, with `area_sqkm` and `area_sqkm_new` columns.
#[pyfunction]
#[pyo3(signature = (features, ranking, epsg=4326, min_fragment_sqkm=0.5, scene_id_field="id"))]
pub fn select_full_coverage(
    py: Python<'_>,
    features: &str,
    ranking: Vec<(String, String)>,
    epsg: u32,
    min_fragment_sqkm: f64,
    scene_id_field: &str,
) -> PyResult<String> {
    let config = SelectionConfig::new(rank_keys(ranking)?)
        .with_min_fragment_sqkm(min_fragment_sqkm)
        .with_scene_id_field(scene_id_field);

    let features = features.to_string();
    let out = py.allow_threads(move || -> Result<String, CoverError> {
        let fc = io::read_feature_collection(&features, epsg)?;
        let coverage = cover::selector::select_full_coverage(&fc, &config)?;
        Ok(io::write_feature_collection(&coverage))
    })?;
    Ok(out)
}

/// Percentage of the AOI covered by the union of the coverage features.
#[pyfunction]
#[pyo3(signature = (aoi, coverage, epsg=4326))]
pub fn coverage_percentage(py: Python<'_>, aoi: &str, coverage: &str, epsg: u32) -> PyResult<f64> {
    let aoi = aoi.to_string();
    let coverage = coverage.to_string();
    let pct = py.allow_threads(move || -> Result<f64, CoverError> {
        let aoi = Aoi::new(io::read_geometry(&aoi)?, epsg);
        let coverage = io::read_feature_collection(&coverage, epsg)?;
        cover::evaluate::coverage_percentage(&aoi, &coverage)
    })?;
    Ok(pct)
}

/// Clip to the AOI, drop scenes over the attribute limits, select full
/// coverage and buffer the sections so neighbours overlap.
///
/// Args:
///     features: GeoJSON FeatureCollection of candidate footprints.
///     aoi: GeoJSON Polygon/MultiPolygon (or Feature) of the AOI.
///     ranking: List of (attribute, direction) pairs, as for
///         `select_full_coverage`.
///     limits: List of (attribute, max); rows with value >= max are dropped.
///     epsg: CRS of both inputs.
///     min_fragment_sqkm: Fragments at or below this size are dropped.
///     overlap_m: Buffer added to each selected section, in metres.
///     min_coverage_pct: Coverage below this is logged as a warning.
///
/// Returns:
///     Tuple of (GeoJSON FeatureCollection of the sections, coverage
///     percentage of the AOI).
#[pyfunction]
#[pyo3(signature = (
    features,
    aoi,
    ranking,
    limits=Vec::new(),
    epsg=4326,
    min_fragment_sqkm=0.5,
    overlap_m=20.0,
    min_coverage_pct=98.0
))]
#[allow(clippy::too_many_arguments)]
pub fn optimize_coverage(
    py: Python<'_>,
    features: &str,
    aoi: &str,
    ranking: Vec<(String, String)>,
    limits: Vec<(String, f64)>,
    epsg: u32,
    min_fragment_sqkm: f64,
    overlap_m: f64,
    min_coverage_pct: f64,
) -> PyResult<(String, f64)> {
    let selection =
        SelectionConfig::new(rank_keys(ranking)?).with_min_fragment_sqkm(min_fragment_sqkm);
    let config = limits
        .into_iter()
        .fold(PipelineConfig::new(selection), |config, (attribute, max)| {
            config.with_limit(AttributeLimit::new(attribute, max))
        })
        .with_overlap_m(overlap_m)
        .with_min_coverage_pct(min_coverage_pct);

    let features = features.to_string();
    let aoi = aoi.to_string();
    let out = py.allow_threads(move || -> Result<(String, f64), CoverError> {
        let fc = io::read_feature_collection(&features, epsg)?;
        let aoi = Aoi::new(io::read_geometry(&aoi)?, epsg);
        let report = cover::pipeline::optimize_coverage(&fc, &aoi, &config)?;
        Ok((io::write_feature_collection(&report.coverage), report.percentage))
    })?;
    Ok(out)
}
