//! Snapshotting, semantic diffing, and impact classification.
//!
//! A spec's declared input/output schemas are reduced to a
//! [`StructuralShape`] by the snapshot generator ([`shape_from_schema`],
//! [`SpecSnapshot::from_declared`]). Two snapshots of the same
//! `name@version` are compared field by field by [`diff_specs`] /
//! [`compute_io_diff`], and [`classify_impact`] folds every diff item into a
//! single verdict with per-spec version bump suggestions.
//!
//! Everything here is pure and synchronous; callers fetch baseline and head
//! sources themselves and hand over fully materialized values.

pub mod diff;
pub mod error;
pub mod impact;
pub mod schema;
pub mod shape;
pub mod snapshot;

pub use diff::{compute_io_diff, diff_specs, DiffKind, SemanticDiffItem};
pub use error::{DiffError, SnapshotError};
pub use impact::{
    analyze_impact, classify_impact, ImpactResult, ImpactStatus, ImpactSummary, VersionAnalysis,
};
pub use schema::shape_from_schema;
pub use shape::{FieldShape, StructuralShape, TypeTag};
pub use snapshot::{ContractSnapshot, DeclaredIo, DeclaredSpec, SpecIo, SpecSnapshot};
