#![doc = "Topology validation for polygonal feature datasets"]
//!
//! Detects three classes of topological defects in a set of polygonal
//! features (e.g. building footprints):
//!
//! - **Overlaps**: pairs of features whose geometries properly overlap,
//!   with intersection area above a threshold.
//! - **Gaps**: enclosed holes left uncovered by the union of all features,
//!   with the ids of the features touching each hole.
//! - **Containment**: pairs where one feature fully contains another,
//!   including exact-duplicate detection.
//!
//! The caller builds a [`FeatureSet`], constructs one [`SpatialIndex`] over
//! it, and invokes any of the detectors. Each detector call is independent:
//! it returns its own record collection plus structured [`Warning`]s, and a
//! failure in one call never affects another. Reading input files, writing
//! results, and reprojection are the caller's concern.

mod detect;
mod error;
mod feature;
mod index;

#[doc(inline)]
pub use detect::{
    ContainmentParams, ContainmentRecord, ContainmentReport, GapRecord, GapReport, OverlapParams,
    OverlapRecord, OverlapReport, find_containment, find_gaps, find_overlaps,
};

#[doc(inline)]
pub use error::{Result, TopologyError, Warning};

#[doc(inline)]
pub use feature::{Feature, FeatureId, FeatureSet, ReferenceSystem};

#[doc(inline)]
pub use index::{Predicate, SpatialIndex};
