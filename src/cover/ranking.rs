//! Ranking policy for coverage candidates.
//!
//! Every key states its own polarity. After the caller's keys, area is the
//! final tie-breaker, larger first.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoverError;
use crate::footprint::Footprint;

/// Which end of an attribute's range is preferred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Higher values rank first.
    #[default]
    #[serde(alias = "desc")]
    Descending,
    /// Lower values rank first.
    #[serde(alias = "asc")]
    Ascending,
}

impl Direction {
    /// Parse from a string name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desc" | "descending" => Some(Self::Descending),
            "asc" | "ascending" => Some(Self::Ascending),
            _ => None,
        }
    }

    fn apply(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Descending => b.total_cmp(&a),
            Self::Ascending => a.total_cmp(&b),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankKey {
    pub attribute: String,
    #[serde(default)]
    pub direction: Direction,
}

impl RankKey {
    pub fn descending(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: Direction::Descending,
        }
    }

    pub fn ascending(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: Direction::Ascending,
        }
    }
}

/// Read the ranking attributes of a footprint, in key order.
pub fn rank_values(
    footprint: &Footprint,
    keys: &[RankKey],
    scene_id_field: &str,
) -> Result<Vec<f64>, CoverError> {
    keys.iter()
        .map(|key| {
            footprint
                .number(&key.attribute)
                .ok_or_else(|| CoverError::MissingAttribute {
                    scene: footprint.scene_id(scene_id_field),
                    attribute: key.attribute.clone(),
                })
        })
        .collect()
}

/// Order two rows by their rank values, then by area (larger first).
/// `Ordering::Less` means `a` is preferred.
pub fn compare(keys: &[RankKey], a: &[f64], a_area: f64, b: &[f64], b_area: f64) -> Ordering {
    keys.iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(key, (&x, &y))| key.direction.apply(x, y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| b_area.total_cmp(&a_area))
}
