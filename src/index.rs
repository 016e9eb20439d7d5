use ahash::AHashSet;
use geo::{BoundingRect, Geometry, Rect, Relate, Validation};
use log::debug;
use rstar::{AABB, RTree, RTreeObject};

use crate::feature::{Feature, FeatureId, FeatureSet};

/// A bounding box in the R-tree, associated with a feature by index.
#[derive(Debug, Clone)]
struct IndexedBounds {
    idx: usize, // Index of corresponding feature in the FeatureSet
    bbox: Rect<f64>,
}

impl RTreeObject for IndexedBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Exact topological predicate evaluated by [`SpatialIndex::query_predicate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Boundaries share points but interiors do not intersect.
    Touches,
    /// The query geometry fully contains the candidate.
    Contains,
}

/// Read-only bounding-box index over one `FeatureSet`.
///
/// Built once per detection run. Features whose geometry is empty, has
/// non-finite coordinates, or fails OGC validity (e.g. self-intersecting
/// rings) are left out of the tree and reported through [`skipped`], so a
/// single bad feature never aborts a run.
///
/// [`skipped`]: SpatialIndex::skipped
#[derive(Debug)]
pub struct SpatialIndex<'a> {
    set: &'a FeatureSet,
    rtree: RTree<IndexedBounds>,
    skipped: Vec<(FeatureId, String)>,
    skipped_ids: AHashSet<FeatureId>,
}

impl<'a> SpatialIndex<'a> {
    /// Build the index over `set`. An empty set yields an empty index.
    pub fn build(set: &'a FeatureSet) -> Self {
        let mut entries = Vec::with_capacity(set.len());
        let mut skipped = Vec::new();
        for (idx, feature) in set.features().iter().enumerate() {
            match usable_bounds(feature) {
                Ok(bbox) => entries.push(IndexedBounds { idx, bbox }),
                Err(reason) => {
                    debug!("feature {} excluded from index: {reason}", feature.id);
                    skipped.push((feature.id, reason));
                }
            }
        }
        let skipped_ids = skipped.iter().map(|(id, _)| *id).collect();
        Self { set, rtree: RTree::bulk_load(entries), skipped, skipped_ids }
    }

    /// The feature set this index was built over.
    #[inline] pub fn feature_set(&self) -> &'a FeatureSet { self.set }

    /// Features excluded at build time, with the reason for each.
    #[inline] pub fn skipped(&self) -> &[(FeatureId, String)] { &self.skipped }

    /// Number of features present in the tree.
    #[inline] pub fn len(&self) -> usize { self.set.len() - self.skipped.len() }

    /// Check if the tree holds no features.
    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// All features whose bounding box intersects `rect`, in no particular
    /// order. Bounds-only: false positives are possible, false negatives
    /// are not.
    pub fn query_bounds(&self, rect: &Rect<f64>) -> Vec<FeatureId> {
        let set = self.set;
        let search = AABB::from_corners(rect.min().into(), rect.max().into());
        self.rtree
            .locate_in_envelope_intersecting(&search)
            .map(|entry| set.features()[entry.idx].id)
            .collect()
    }

    /// All features satisfying `predicate` against `geometry`.
    ///
    /// Exact: candidates pass an envelope prefilter, then one `relate()`
    /// call gives the full DE-9IM for the final decision, so the result has
    /// no false positives or negatives.
    pub fn query_predicate(&self, geometry: &Geometry<f64>, predicate: Predicate) -> Vec<FeatureId> {
        let set = self.set;
        let Some(rect) = geometry.bounding_rect() else {
            return Vec::new();
        };
        let search = AABB::from_corners(rect.min().into(), rect.max().into());
        self.rtree
            .locate_in_envelope_intersecting(&search)
            .filter_map(|entry| {
                let feature = &set.features()[entry.idx];
                let im = geometry.relate(&feature.geometry);
                let hit = match predicate {
                    Predicate::Touches => im.is_touches(),
                    Predicate::Contains => im.is_contains(),
                };
                hit.then_some(feature.id)
            })
            .collect()
    }

    /// Features present in the tree, in input order.
    pub(crate) fn active_features(&self) -> impl Iterator<Item = &'a Feature> {
        let set = self.set;
        set.features().iter().filter(|f| !self.skipped_ids.contains(&f.id))
    }
}

/// Bounding box for a feature, or the reason it cannot be indexed.
fn usable_bounds(feature: &Feature) -> Result<Rect<f64>, String> {
    let Some(bbox) = feature.geometry.bounding_rect() else {
        return Err("empty geometry".to_string());
    };
    let corners = [bbox.min().x, bbox.min().y, bbox.max().x, bbox.max().y];
    if corners.iter().any(|c| !c.is_finite()) {
        return Err("non-finite coordinates".to_string());
    }
    if let Err(invalid) = feature.geometry.check_validation() {
        return Err(invalid.to_string());
    }
    Ok(bbox)
}
