mod containment;
mod gap;
mod overlap;

pub use containment::{ContainmentParams, ContainmentRecord, ContainmentReport, find_containment};
pub use gap::{GapRecord, GapReport, find_gaps};
pub use overlap::{OverlapParams, OverlapRecord, OverlapReport, find_overlaps};

use ahash::AHashSet;

use crate::error::{Result, TopologyError, Warning};
use crate::feature::{FeatureId, ReferenceSystem};
use crate::index::SpatialIndex;

/// Unordered feature-id pair, stored sorted so `{a, b} == {b, a}`.
///
/// Pair identity, not insertion order, determines uniqueness in detector
/// results: whichever side of the pair was the outer iteration subject, the
/// key is the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PairKey(FeatureId, FeatureId);

impl PairKey {
    pub(crate) fn new(a: FeatureId, b: FeatureId) -> Self {
        debug_assert_ne!(a, b, "self-pair");
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    /// Smaller id of the pair.
    #[inline] pub(crate) fn low(&self) -> FeatureId { self.0 }

    /// Larger id of the pair.
    #[inline] pub(crate) fn high(&self) -> FeatureId { self.1 }
}

/// Already-considered pairs. Hash lookup, not a scanned list.
pub(crate) type PairSet = AHashSet<PairKey>;

/// Warning for an area-measuring detector run over a geographic reference
/// system. Advisory only; the run proceeds.
pub(crate) fn geographic_warning(srs: ReferenceSystem) -> Option<Warning> {
    let epsg = srs.epsg()?;
    if srs.is_geographic() {
        log::warn!(
            "feature set is in geographic EPSG:{epsg}; reproject for reliable area measurements"
        );
        Some(Warning::GeographicCrs { epsg })
    } else {
        None
    }
}

/// One warning per feature the index excluded at build time.
pub(crate) fn skipped_warnings(index: &SpatialIndex<'_>) -> Vec<Warning> {
    index
        .skipped()
        .iter()
        .map(|(id, reason)| Warning::FeatureSkipped { id: *id, reason: reason.clone() })
        .collect()
}

/// Abort the detector call when the fraction of unusable features exceeds
/// the configured limit (1.0 tolerates everything).
pub(crate) fn check_skip_ratio(
    index: &SpatialIndex<'_>,
    detector: &'static str,
    limit: f64,
) -> Result<()> {
    let total = index.feature_set().len();
    let skipped = index.skipped().len();
    if total > 0 && skipped as f64 / total as f64 > limit {
        return Err(TopologyError::DegenerateInput { detector, skipped, total, limit });
    }
    Ok(())
}
