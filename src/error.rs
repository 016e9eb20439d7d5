use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feature::FeatureId;

/// Errors that abort a feature-set construction or a single detector call.
///
/// A failed detector call yields no records for that detector; other
/// detector calls over the same feature set are unaffected.
#[derive(Error, Debug)]
pub enum TopologyError {
    /// A caller-supplied feature id appears more than once.
    #[error("duplicate feature id {0}")]
    DuplicateId(FeatureId),

    /// The fraction of unusable features exceeded the configured limit,
    /// so partial results would be misleading. Tagged with the detector
    /// that refused to run.
    #[error("{detector} aborted: {skipped} of {total} features unusable (limit {limit})")]
    DegenerateInput {
        detector: &'static str,
        skipped: usize,
        total: usize,
        limit: f64,
    },
}

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Advisory diagnostics attached to a detector report.
///
/// Warnings never abort a run; they surface conditions the caller may want
/// to act on (reproject, repair a geometry) before trusting the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// The reference system measures angles, so area values are unreliable.
    /// Emitted by the overlap and containment detectors.
    GeographicCrs { epsg: u32 },

    /// The union of all features has no interior rings; the dataset has no
    /// enclosed gaps.
    NoGaps,

    /// A feature was excluded from the current detector pass.
    FeatureSkipped { id: FeatureId, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeographicCrs { epsg } => write!(
                f,
                "EPSG:{epsg} is a geographic reference system; reproject for reliable areas"
            ),
            Self::NoGaps => write!(f, "union of all features has no interior rings; no gaps"),
            Self::FeatureSkipped { id, reason } => {
                write!(f, "feature {id} skipped: {reason}")
            }
        }
    }
}
