//! Cross-match configuration, loadable from JSON.
//!
//! ```json
//! {
//!   "ra_column_a": "ra", "dec_column_a": "dec",
//!   "ra_column_b": "RA_ICRS", "dec_column_b": "DE_ICRS",
//!   "mode": "nearest",
//!   "threshold_arcsec": 1.5,
//!   "column_collision_policy": { "kind": "prefix", "left": "a_", "right": "b_" }
//! }
//! ```
//!
//! `column_collision_policy` has no default and must always be given.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{XMatchError, XMatchResult};
use crate::index::validate_radius;
use crate::join::{CollisionPolicy, JoinBuilder, NonMatchPolicy};
use crate::matcher::MatchMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossMatchConfig {
    pub ra_column_a: String,
    pub dec_column_a: String,
    pub ra_column_b: String,
    pub dec_column_b: String,
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_separation_arcsec: Option<f64>,
    pub threshold_arcsec: f64,
    pub column_collision_policy: CollisionPolicy,
    #[serde(default)]
    pub non_match_policy: NonMatchPolicy,
}

impl CrossMatchConfig {
    /// Nearest-mode configuration with the given coordinate columns.
    pub fn nearest(
        ra_column_a: impl Into<String>,
        dec_column_a: impl Into<String>,
        ra_column_b: impl Into<String>,
        dec_column_b: impl Into<String>,
        threshold_arcsec: f64,
        column_collision_policy: CollisionPolicy,
    ) -> Self {
        Self {
            ra_column_a: ra_column_a.into(),
            dec_column_a: dec_column_a.into(),
            ra_column_b: ra_column_b.into(),
            dec_column_b: dec_column_b.into(),
            mode: MatchMode::Nearest,
            max_separation_arcsec: None,
            threshold_arcsec,
            column_collision_policy,
            non_match_policy: NonMatchPolicy::Drop,
        }
    }

    /// Switch to radius mode with `max_separation_arcsec`.
    pub fn with_radius(mut self, max_separation_arcsec: f64) -> Self {
        self.mode = MatchMode::Radius;
        self.max_separation_arcsec = Some(max_separation_arcsec);
        self
    }

    pub fn with_non_match_policy(mut self, policy: NonMatchPolicy) -> Self {
        self.non_match_policy = policy;
        self
    }

    pub fn from_json_str(json: &str) -> XMatchResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> XMatchResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> XMatchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check everything that can be checked without the tables.
    pub fn validate(&self) -> XMatchResult<()> {
        for (key, value) in [
            ("ra_column_a", &self.ra_column_a),
            ("dec_column_a", &self.dec_column_a),
            ("ra_column_b", &self.ra_column_b),
            ("dec_column_b", &self.dec_column_b),
        ] {
            if value.trim().is_empty() {
                return Err(XMatchError::invalid_parameter(format!(
                    "{} must name a column",
                    key
                )));
            }
        }

        if !(self.threshold_arcsec.is_finite() && self.threshold_arcsec >= 0.0) {
            return Err(XMatchError::invalid_parameter(format!(
                "threshold_arcsec must be finite and >= 0, got {}",
                self.threshold_arcsec
            )));
        }

        match (self.mode, self.max_separation_arcsec) {
            (MatchMode::Radius, None) => Err(XMatchError::invalid_parameter(
                "radius mode requires max_separation_arcsec",
            )),
            (MatchMode::Radius, Some(max)) => validate_radius(max),
            (MatchMode::Nearest, _) => Ok(()),
        }
    }

    pub fn join_builder(&self) -> JoinBuilder {
        JoinBuilder::new(self.threshold_arcsec)
            .collision_policy(self.column_collision_policy.clone())
            .non_match_policy(self.non_match_policy)
    }
}
