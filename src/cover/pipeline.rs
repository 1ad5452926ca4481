//! Full coverage of an AOI: clip candidates to the AOI, prefilter on
//! attribute limits, run the greedy selection, then grow every selected
//! section by a fixed overlap so neighbouring sections share a seam.
//!
//! The overlap buffer is evaluated in the UTM zone of the AOI centroid for
//! every section, so all sections grow by the same metric distance.

use geo::BooleanOps;
use tracing::{debug, info, warn};

use crate::config::{AttributeLimit, PipelineConfig};
use crate::cover::evaluate::{coverage_percentage, Aoi};
use crate::cover::selector::{select_full_coverage, CoverageSet};
use crate::error::CoverError;
use crate::footprint::{Footprint, FootprintCollection};
use crate::geometry::buffer::{buffer_meters, centroid_lon_lat, clean};
use crate::proj::reproject::reproject;

/// Outcome of [`optimize_coverage`].
#[derive(Clone, Debug)]
pub struct CoverageReport {
    /// Buffered, AOI-clipped sections in selection order.
    pub coverage: CoverageSet,
    /// Share of the AOI covered by `coverage`, in percent.
    pub percentage: f64,
    /// `percentage` reached the configured minimum.
    pub sufficient: bool,
}

/// Intersect every row with the AOI and clean the result. Rows that miss
/// the AOI entirely are dropped.
pub fn clip_to_aoi(
    collection: &FootprintCollection,
    aoi: &Aoi,
) -> Result<FootprintCollection, CoverError> {
    let mask = reproject(&aoi.geometry, aoi.crs, collection.crs())?;
    let footprints: Vec<Footprint> = collection
        .iter()
        .filter_map(|fp| {
            let clipped = clean(&fp.geometry.intersection(&mask));
            (!clipped.0.is_empty()).then(|| fp.with_geometry(clipped))
        })
        .collect();
    debug!(rows_in = collection.len(), rows_out = footprints.len(), "clipped to AOI");
    Ok(FootprintCollection::new(collection.crs(), footprints))
}

/// Keep rows whose value for every limit is strictly below its maximum.
///
/// A row lacking a limited attribute is an error rather than silently
/// dropped.
pub fn filter_by_limits(
    collection: &FootprintCollection,
    limits: &[AttributeLimit],
    scene_id_field: &str,
) -> Result<FootprintCollection, CoverError> {
    let mut footprints = Vec::with_capacity(collection.len());
    'rows: for fp in collection {
        for limit in limits {
            let value = fp
                .number(&limit.attribute)
                .ok_or_else(|| CoverError::MissingAttribute {
                    scene: fp.scene_id(scene_id_field),
                    attribute: limit.attribute.clone(),
                })?;
            if value >= limit.max {
                continue 'rows;
            }
        }
        footprints.push(fp.clone());
    }
    debug!(rows_in = collection.len(), rows_out = footprints.len(), "attribute limits applied");
    Ok(FootprintCollection::new(collection.crs(), footprints))
}

/// Grow each section by `distance_m` metres, then clip back to the AOI.
///
/// Every section keeps its row; a section that no longer touches the AOI
/// fails with [`CoverError::SectionsDropped`].
pub fn buffer_sections(
    coverage: &CoverageSet,
    distance_m: f64,
    aoi: &Aoi,
) -> Result<CoverageSet, CoverError> {
    let zone_point = centroid_lon_lat(&aoi.geometry, aoi.crs)?;
    let buffered = coverage
        .iter()
        .map(|fp| -> Result<Footprint, CoverError> {
            let geometry = buffer_meters(&fp.geometry, distance_m, coverage.crs(), Some(zone_point))?;
            Ok(fp.with_geometry(geometry))
        })
        .collect::<Result<Vec<_>, CoverError>>()?;

    let clipped = clip_to_aoi(&FootprintCollection::new(coverage.crs(), buffered), aoi)?;
    if clipped.len() != coverage.len() {
        return Err(CoverError::SectionsDropped {
            expected: coverage.len(),
            dropped: coverage.len() - clipped.len(),
        });
    }
    Ok(clipped)
}

/// Clip, prefilter, select and buffer `catalog` against `aoi`.
///
/// Coverage below `config.min_coverage_pct` is reported, not rejected.
pub fn optimize_coverage(
    catalog: &FootprintCollection,
    aoi: &Aoi,
    config: &PipelineConfig,
) -> Result<CoverageReport, CoverError> {
    config.validate()?;

    let clipped = clip_to_aoi(catalog, aoi)?;
    let candidates = filter_by_limits(
        &clipped,
        &config.attribute_limits,
        &config.selection.scene_id_field,
    )?;
    let selected = select_full_coverage(&candidates, &config.selection)?;
    let coverage = buffer_sections(&selected, config.overlap_m, aoi)?;

    let percentage = coverage_percentage(aoi, &coverage)?;
    let sufficient = percentage >= config.min_coverage_pct;
    if sufficient {
        info!(sections = coverage.len(), percentage, "AOI coverage");
    } else {
        warn!(
            sections = coverage.len(),
            percentage,
            min = config.min_coverage_pct,
            "coverage of AOI could be insufficient"
        );
    }
    Ok(CoverageReport {
        coverage,
        percentage,
        sufficient,
    })
}
