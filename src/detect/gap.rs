use geo::{BooleanOps, Geometry, LineString};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::skipped_warnings;
use crate::error::{Result, Warning};
use crate::feature::FeatureId;
use crate::index::{Predicate, SpatialIndex};

/// One enclosed hole in the union of all features: its boundary ring and
/// the features whose outline touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRecord {
    /// Closed boundary ring of the hole.
    pub boundary: LineString<f64>,
    /// Ids of features whose outline touches the hole boundary, sorted.
    pub touches: Vec<FeatureId>,
}

/// Result of one gap-detection call.
#[derive(Debug, Clone, Default)]
pub struct GapReport {
    pub records: Vec<GapRecord>,
    pub warnings: Vec<Warning>,
}

/// Find every enclosed gap left uncovered by the union of all features.
///
/// The union of all indexed geometries is computed once; each interior
/// ring of the union is one gap. Identical boundaries collapse to a single
/// record. A dataset whose union has no interior rings yields an empty
/// result plus a [`Warning::NoGaps`].
pub fn find_gaps(index: &SpatialIndex<'_>) -> Result<GapReport> {
    let mut warnings = skipped_warnings(index);

    // Union may be slow for many complex polygons; it runs once per call.
    let union = index
        .active_features()
        .map(|f| f.geometry.clone())
        .reduce(|a, b| a.union(&b));

    let mut boundaries: Vec<LineString<f64>> = Vec::new();
    if let Some(union) = union {
        for polygon in &union.0 {
            for ring in polygon.interiors() {
                // Identical gap boundaries collapse to one record.
                if !boundaries.contains(ring) {
                    boundaries.push(ring.clone());
                }
            }
        }
    }

    if boundaries.is_empty() {
        warn!("no interior rings in the feature union; the dataset has no gaps");
        warnings.push(Warning::NoGaps);
        return Ok(GapReport { records: Vec::new(), warnings });
    }

    let records = boundaries
        .into_iter()
        .map(|boundary| {
            let probe = Geometry::LineString(boundary.clone());
            let mut touches = index.query_predicate(&probe, Predicate::Touches);
            touches.sort();
            GapRecord { boundary, touches }
        })
        .collect::<Vec<_>>();

    debug!("gap detection: {} record(s), {} warning(s)", records.len(), warnings.len());
    Ok(GapReport { records, warnings })
}
