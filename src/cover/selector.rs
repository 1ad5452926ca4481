//! Greedy full-coverage selection.
//!
//! All area arithmetic happens in one working UTM zone, picked once from
//! the centre of the input's bounding box and used for the whole run.
//!
//! Each round subtracts the union of everything selected so far from every
//! remaining candidate, drops residuals at or below the fragment threshold,
//! re-ranks, and takes the best residual. The taken candidate leaves the
//! pool whether or not any of its parts survive, so the loop runs at most
//! once per input row.

use geo::{BooleanOps, MultiPolygon};
use tracing::{debug, trace};

use crate::config::SelectionConfig;
use crate::cover::ranking::{compare, rank_values, RankKey};
use crate::error::CoverError;
use crate::footprint::{area_sqkm, Footprint, FootprintCollection, AREA_SQKM, AREA_SQKM_NEW};
use crate::geometry::buffer::clean;
use crate::geometry::explode::{explode, explode_footprint};

/// Selected footprints in selection order.
pub type CoverageSet = FootprintCollection;

/// A working row: geometry in the working CRS plus its cached rank.
struct Candidate {
    footprint: Footprint,
    rank: Vec<f64>,
    area_sqkm: f64,
}

impl Candidate {
    fn new(footprint: Footprint, config: &SelectionConfig) -> Result<Self, CoverError> {
        let rank = rank_values(&footprint, &config.ranking, &config.scene_id_field)?;
        let area_sqkm = area_sqkm(&footprint.geometry);
        let mut footprint = footprint;
        footprint.set_number(AREA_SQKM, area_sqkm);
        Ok(Self {
            footprint,
            rank,
            area_sqkm,
        })
    }

    /// The part of this candidate not yet covered.
    fn residual(self, covered: &MultiPolygon<f64>) -> Self {
        let geometry = self.footprint.geometry.difference(covered);
        let area_sqkm = area_sqkm(&geometry);
        let mut footprint = self.footprint.with_geometry(geometry);
        footprint.set_number(AREA_SQKM_NEW, area_sqkm);
        Self {
            footprint,
            rank: self.rank,
            area_sqkm,
        }
    }
}

fn sort_candidates(candidates: &mut [Candidate], keys: &[RankKey]) {
    candidates.sort_by(|a, b| compare(keys, &a.rank, a.area_sqkm, &b.rank, b.area_sqkm));
}

/// Choose an ordered subset of `collection` that covers its combined
/// extent, best-ranked first.
///
/// Returned rows are in the input CRS, single-part, and carry the area
/// (sqkm, working CRS) they contributed in `area_sqkm_new`.
pub fn select_full_coverage(
    collection: &FootprintCollection,
    config: &SelectionConfig,
) -> Result<CoverageSet, CoverError> {
    config.validate()?;
    let min = config.min_fragment_sqkm;
    let id_field = config.scene_id_field.as_str();
    if collection.is_empty() {
        return Err(CoverError::EmptyCandidateSet {
            min_fragment_sqkm: min,
        });
    }

    let zone = collection.working_zone()?;
    debug!(zone, rows = collection.len(), "working CRS for full coverage");
    let working = collection.to_crs(zone)?;

    let mut candidates = working
        .into_footprints()
        .into_iter()
        .map(|fp| Candidate::new(fp, config))
        .collect::<Result<Vec<_>, _>>()?;
    candidates.retain(|c| c.area_sqkm > min);
    sort_candidates(&mut candidates, &config.ranking);
    debug!(candidates = candidates.len(), min, "candidates above fragment threshold");

    let mut remaining = candidates.into_iter();
    let seed = remaining.next().ok_or(CoverError::EmptyCandidateSet {
        min_fragment_sqkm: min,
    })?;
    let mut remaining: Vec<Candidate> = remaining.collect();
    debug!(scene = %seed.footprint.scene_id(id_field), area_sqkm = seed.area_sqkm, "seed");

    let mut covered = seed.footprint.geometry.clone();
    let mut selected = vec![seed.footprint];

    while !remaining.is_empty() {
        let mut residuals: Vec<Candidate> = std::mem::take(&mut remaining)
            .into_iter()
            .map(|c| c.residual(&covered))
            .inspect(|c| {
                trace!(scene = %c.footprint.scene_id(id_field), area_sqkm = c.area_sqkm, "residual")
            })
            .filter(|c| c.area_sqkm > min)
            .collect();
        if residuals.is_empty() {
            debug!(selected = selected.len(), "coverage plateaued");
            break;
        }
        sort_candidates(&mut residuals, &config.ranking);

        let mut residuals = residuals.into_iter();
        let Some(best) = residuals.next() else { break };
        remaining = residuals.collect();

        let picked = if best.footprint.is_multi_part() {
            explode_footprint(&best.footprint)
                .into_iter()
                .filter_map(|mut part| {
                    let area = area_sqkm(&part.geometry);
                    part.set_number(AREA_SQKM_NEW, area);
                    (area > min).then_some(part)
                })
                .collect()
        } else {
            vec![best.footprint]
        };
        if picked.is_empty() {
            debug!("all parts of the best residual are below threshold; skipped");
            continue;
        }

        for fp in picked {
            debug!(scene = %fp.scene_id(id_field), area_sqkm = ?fp.number(AREA_SQKM_NEW), "selected");
            covered = covered.union(&fp.geometry);
            selected.push(fp);
        }
    }

    let selected = selected
        .into_iter()
        .map(|mut fp| {
            let area = area_sqkm(&fp.geometry);
            fp.set_number(AREA_SQKM_NEW, area);
            fp.with_geometry(clean(&fp.geometry))
        })
        .collect();

    let coverage = FootprintCollection::new(zone, selected).to_crs(collection.crs())?;
    let coverage = explode(&coverage).map_geometries(clean);
    debug!(rows = coverage.len(), "full coverage selected");
    Ok(coverage)
}
