use std::fmt;

use ahash::AHashMap;
use geo::{BoundingRect, MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TopologyError};

/// Stable identifier for a feature within a `FeatureSet`.
///
/// Assigned sequentially starting at 1 in input order when the caller does
/// not supply ids. Unique for the lifetime of the set; never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference-system tag for a feature set.
///
/// Opaque to the detectors except for one question: is the system
/// geographic (angular units), in which case area measurements are
/// unreliable and a warning is emitted. Reprojection is the caller's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceSystem {
    /// Known EPSG code, e.g. 32748 (UTM zone 48S) or 4326 (WGS84 lon/lat).
    Epsg(u32),
    /// No usable tag; treated as projected and no warning is emitted.
    Unknown,
}

impl ReferenceSystem {
    /// True for geographic (lon/lat) systems. EPSG allocates geographic
    /// 2D systems in the 4000–4999 band.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Epsg(code) if (4000..5000).contains(code))
    }

    /// The EPSG code, if known.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Self::Epsg(code) => Some(*code),
            Self::Unknown => None,
        }
    }
}

/// A single polygonal feature: stable id plus simple or multi-polygon
/// geometry.
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: MultiPolygon<f64>,
}

impl Feature {
    /// Axis-aligned bounding box, `None` for an empty geometry.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }
}

/// Ordered collection of features sharing one reference system.
///
/// Created once per detection run and treated as immutable after a
/// `SpatialIndex` is built over it; there are no mutators.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    features: Vec<Feature>,
    by_id: AHashMap<FeatureId, usize>,
    srs: ReferenceSystem,
}

impl FeatureSet {
    /// Build from bare geometries, assigning sequential ids from 1 in
    /// input order.
    pub fn from_geometries(geometries: Vec<MultiPolygon<f64>>, srs: ReferenceSystem) -> Self {
        let features = geometries
            .into_iter()
            .enumerate()
            .map(|(i, geometry)| Feature { id: FeatureId(i as u64 + 1), geometry })
            .collect::<Vec<_>>();
        let by_id = features.iter().enumerate().map(|(i, f)| (f.id, i)).collect();
        Self { features, by_id, srs }
    }

    /// Build from caller-identified features. Caller ids are taken as-is
    /// and must be unique.
    pub fn from_features(features: Vec<Feature>, srs: ReferenceSystem) -> Result<Self> {
        let mut by_id = AHashMap::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            if by_id.insert(feature.id, i).is_some() {
                return Err(TopologyError::DuplicateId(feature.id));
            }
        }
        Ok(Self { features, by_id, srs })
    }

    /// Number of features.
    #[inline] pub fn len(&self) -> usize { self.features.len() }

    /// Check if the set has no features.
    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// Features in input order.
    #[inline] pub fn features(&self) -> &[Feature] { &self.features }

    /// The shared reference system.
    #[inline] pub fn srs(&self) -> ReferenceSystem { self.srs }

    /// Look up a feature by id.
    #[inline]
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.by_id.get(&id).map(|&i| &self.features[i])
    }
}
