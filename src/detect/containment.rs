use geo::{Area, Geometry, MultiPolygon};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{PairKey, PairSet, check_skip_ratio, geographic_warning, skipped_warnings};
use crate::error::{Result, Warning};
use crate::feature::FeatureId;
use crate::index::{Predicate, SpatialIndex};

/// One pair of features where one geometry fully contains the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainmentRecord {
    /// Smaller id of the pair.
    pub id_a: FeatureId,
    /// Larger id of the pair.
    pub id_b: FeatureId,
    /// Geometry of the contained feature.
    pub geometry: MultiPolygon<f64>,
    /// Unsigned area of the contained feature.
    pub area: f64,
    /// True when contained and containing areas are equal: the degenerate
    /// case of identical geometry, reported once as containment rather
    /// than twice. Compares areas only, so two distinct shapes of exactly
    /// equal area inside one another would also set this flag.
    pub exact_duplicate: bool,
}

/// Tunables for [`find_containment`].
#[derive(Debug, Clone)]
pub struct ContainmentParams {
    /// Minimum area of the contained feature for a pair to be reported.
    pub min_area: f64,
    /// Abort when more than this fraction of features is unusable.
    /// 1.0 (the default) tolerates any amount of per-feature failure.
    pub max_skip_ratio: f64,
}

impl Default for ContainmentParams {
    fn default() -> Self {
        Self { min_area: 0.0, max_skip_ratio: 1.0 }
    }
}

/// Result of one containment-detection call.
#[derive(Debug, Clone, Default)]
pub struct ContainmentReport {
    pub records: Vec<ContainmentRecord>,
    pub warnings: Vec<Warning>,
}

/// Find all pairs where one feature fully contains another and the
/// contained feature's area is at or above `params.min_area`.
///
/// The `Contains` index query is exact, so every candidate it returns is a
/// verified containment. Each unordered pair is reported at most once,
/// with `id_a < id_b`, regardless of iteration order. Records are sorted
/// by pair.
pub fn find_containment(
    index: &SpatialIndex<'_>,
    params: &ContainmentParams,
) -> Result<ContainmentReport> {
    check_skip_ratio(index, "containment detection", params.max_skip_ratio)?;

    let set = index.feature_set();
    let mut warnings = Vec::new();
    warnings.extend(geographic_warning(set.srs()));
    warnings.extend(skipped_warnings(index));

    let mut seen = PairSet::default();
    let mut records = Vec::new();

    for feature in index.active_features() {
        let outer_area = feature.geometry.unsigned_area();
        let probe = Geometry::MultiPolygon(feature.geometry.clone());

        for contained_id in index.query_predicate(&probe, Predicate::Contains) {
            if contained_id == feature.id {
                continue;
            }
            let key = PairKey::new(feature.id, contained_id);
            if !seen.insert(key) {
                continue; // pair already considered from the other side
            }
            // Candidates come from the index, so the lookup cannot miss.
            let Some(contained) = set.get(contained_id) else { continue };
            let area = contained.geometry.unsigned_area();
            if area >= params.min_area {
                records.push(ContainmentRecord {
                    id_a: key.low(),
                    id_b: key.high(),
                    geometry: contained.geometry.clone(),
                    area,
                    exact_duplicate: area == outer_area,
                });
            }
        }
    }

    records.sort_by_key(|r| (r.id_a, r.id_b));
    debug!("containment detection: {} record(s), {} warning(s)", records.len(), warnings.len());
    Ok(ContainmentReport { records, warnings })
}
