use geo::{Area, BooleanOps, MultiPolygon, Relate};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{PairKey, PairSet, check_skip_ratio, geographic_warning, skipped_warnings};
use crate::error::{Result, Warning};
use crate::feature::FeatureId;
use crate::index::SpatialIndex;

/// One pair of features whose geometries properly overlap, with the shared
/// region and its area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapRecord {
    /// Smaller id of the pair.
    pub id_a: FeatureId,
    /// Larger id of the pair.
    pub id_b: FeatureId,
    /// The shared region.
    pub geometry: MultiPolygon<f64>,
    /// Unsigned area of the shared region, in squared reference-system units.
    pub area: f64,
}

/// Tunables for [`find_overlaps`].
#[derive(Debug, Clone)]
pub struct OverlapParams {
    /// Minimum intersection area for a pair to be reported.
    pub area_threshold: f64,
    /// Abort when more than this fraction of features is unusable.
    /// 1.0 (the default) tolerates any amount of per-feature failure.
    pub max_skip_ratio: f64,
}

impl Default for OverlapParams {
    fn default() -> Self {
        Self { area_threshold: 0.0, max_skip_ratio: 1.0 }
    }
}

/// Result of one overlap-detection call. An empty `records` with no error
/// means the dataset has no qualifying overlaps.
#[derive(Debug, Clone, Default)]
pub struct OverlapReport {
    pub records: Vec<OverlapRecord>,
    pub warnings: Vec<Warning>,
}

/// Find all pairs of features that overlap with intersection area at or
/// above `params.area_threshold`.
///
/// Overlap is a proper partial intersection: the interiors share area but
/// neither geometry contains the other, and touching alone does not
/// qualify. Each unordered pair is reported at most once, with
/// `id_a < id_b`, regardless of iteration order. Records are sorted by
/// pair.
pub fn find_overlaps(index: &SpatialIndex<'_>, params: &OverlapParams) -> Result<OverlapReport> {
    check_skip_ratio(index, "overlap detection", params.max_skip_ratio)?;

    let set = index.feature_set();
    let mut warnings = Vec::new();
    warnings.extend(geographic_warning(set.srs()));
    warnings.extend(skipped_warnings(index));

    let mut seen = PairSet::default();
    let mut records = Vec::new();

    for feature in index.active_features() {
        let Some(bounds) = feature.bounds() else { continue };
        for candidate_id in index.query_bounds(&bounds) {
            if candidate_id == feature.id {
                continue;
            }
            let key = PairKey::new(feature.id, candidate_id);
            if !seen.insert(key) {
                continue; // pair already considered from the other side
            }
            // Candidates come from the index, so the lookup cannot miss.
            let Some(candidate) = set.get(candidate_id) else { continue };
            if !feature.geometry.relate(&candidate.geometry).is_overlaps() {
                continue;
            }
            let intersection = feature.geometry.intersection(&candidate.geometry);
            let area = intersection.unsigned_area();
            if area >= params.area_threshold {
                records.push(OverlapRecord {
                    id_a: key.low(),
                    id_b: key.high(),
                    geometry: intersection,
                    area,
                });
            }
        }
    }

    records.sort_by_key(|r| (r.id_a, r.id_b));
    debug!("overlap detection: {} record(s), {} warning(s)", records.len(), warnings.len());
    Ok(OverlapReport { records, warnings })
}
