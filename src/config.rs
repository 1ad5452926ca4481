//! Configuration for full-coverage selection and the clip/select/buffer
//! pipeline around it.

use serde::{Deserialize, Serialize};

use crate::cover::ranking::RankKey;
use crate::error::CoverError;

/// Greedy selection policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Ranking keys, primary first. Area is always appended as the last key.
    pub ranking: Vec<RankKey>,

    /// Fragments at or below this size (sqkm) are discarded.
    /// Default: 0.5
    #[serde(default = "default_min_fragment_sqkm")]
    pub min_fragment_sqkm: f64,

    /// Attribute holding the scene identifier, used in logs and errors.
    /// Default: "id"
    #[serde(default = "default_scene_id_field")]
    pub scene_id_field: String,
}

fn default_min_fragment_sqkm() -> f64 {
    0.5
}

fn default_scene_id_field() -> String {
    "id".to_string()
}

impl SelectionConfig {
    pub fn new(ranking: Vec<RankKey>) -> Self {
        Self {
            ranking,
            min_fragment_sqkm: default_min_fragment_sqkm(),
            scene_id_field: default_scene_id_field(),
        }
    }

    pub fn with_min_fragment_sqkm(mut self, min_fragment_sqkm: f64) -> Self {
        self.min_fragment_sqkm = min_fragment_sqkm;
        self
    }

    pub fn with_scene_id_field(mut self, field: impl Into<String>) -> Self {
        self.scene_id_field = field.into();
        self
    }

    pub fn from_json(s: &str) -> Result<Self, CoverError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| CoverError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoverError> {
        if self.ranking.is_empty() {
            return Err(CoverError::InvalidConfig(
                "at least one ranking key is required".into(),
            ));
        }
        if !self.min_fragment_sqkm.is_finite() || self.min_fragment_sqkm <= 0.0 {
            return Err(CoverError::InvalidConfig(format!(
                "min_fragment_sqkm must be positive, got {}",
                self.min_fragment_sqkm
            )));
        }
        Ok(())
    }
}

/// Strict upper bound on a numeric attribute, e.g. the incidence angle.
/// Rows whose value is at or above `max` are dropped before selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeLimit {
    pub attribute: String,
    pub max: f64,
}

impl AttributeLimit {
    pub fn new(attribute: impl Into<String>, max: f64) -> Self {
        Self {
            attribute: attribute.into(),
            max,
        }
    }
}

/// Clip to AOI, prefilter, select, then buffer the sections so that
/// neighbours overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(flatten)]
    pub selection: SelectionConfig,

    /// Prefilters applied after clipping.
    #[serde(default)]
    pub attribute_limits: Vec<AttributeLimit>,

    /// Buffer (metres) added around each selected section.
    /// Default: 20
    #[serde(default = "default_overlap_m")]
    pub overlap_m: f64,

    /// Coverage percentage below which a warning is logged.
    /// Default: 98
    #[serde(default = "default_min_coverage_pct")]
    pub min_coverage_pct: f64,
}

fn default_overlap_m() -> f64 {
    20.0
}

fn default_min_coverage_pct() -> f64 {
    98.0
}

impl PipelineConfig {
    pub fn new(selection: SelectionConfig) -> Self {
        Self {
            selection,
            attribute_limits: Vec::new(),
            overlap_m: default_overlap_m(),
            min_coverage_pct: default_min_coverage_pct(),
        }
    }

    pub fn with_limit(mut self, limit: AttributeLimit) -> Self {
        self.attribute_limits.push(limit);
        self
    }

    pub fn with_overlap_m(mut self, overlap_m: f64) -> Self {
        self.overlap_m = overlap_m;
        self
    }

    pub fn with_min_coverage_pct(mut self, pct: f64) -> Self {
        self.min_coverage_pct = pct;
        self
    }

    pub fn from_json(s: &str) -> Result<Self, CoverError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| CoverError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoverError> {
        self.selection.validate()?;
        if !self.overlap_m.is_finite() {
            return Err(CoverError::InvalidConfig(format!(
                "overlap_m must be finite, got {}",
                self.overlap_m
            )));
        }
        if let Some(limit) = self.attribute_limits.iter().find(|l| l.max.is_nan()) {
            return Err(CoverError::InvalidConfig(format!(
                "limit on '{}' is NaN",
                limit.attribute
            )));
        }
        Ok(())
    }
}
