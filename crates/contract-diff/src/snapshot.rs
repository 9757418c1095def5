//! Spec snapshots and point-in-time contract snapshots.
//!
//! A [`SpecSnapshot`] is the comparable form of one spec. A
//! [`ContractSnapshot`] captures a whole spec set, sorted and content-hashed,
//! and is the unit compared between a baseline and a head.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use contract_core::{SpecKey, SpecType};

use crate::error::{DiffError, SnapshotError};
use crate::impact::{analyze_impact, ImpactResult};
use crate::schema::shape_from_schema;
use crate::shape::StructuralShape;

/// Current on-disk format version of [`ContractSnapshot`].
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// The structural input and output of a spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecIo {
    pub input: StructuralShape,
    pub output: StructuralShape,
}

/// The comparable form of one spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecSnapshot {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub spec_type: SpecType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io: Option<SpecIo>,
}

/// Declared input/output schemas, as produced by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredIo {
    #[serde(default = "unconstrained")]
    pub input: Value,
    #[serde(default = "unconstrained")]
    pub output: Value,
}

fn unconstrained() -> Value {
    Value::Bool(true)
}

/// A spec as declared in source, before structural reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredSpec {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub spec_type: SpecType,
    #[serde(default)]
    pub io: Option<DeclaredIo>,
}

impl SpecSnapshot {
    pub fn new(name: impl Into<String>, version: impl Into<String>, spec_type: SpecType) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            spec_type,
            io: None,
        }
    }

    /// Builder: attach input/output shapes.
    pub fn with_io(mut self, input: StructuralShape, output: StructuralShape) -> Self {
        self.io = Some(SpecIo { input, output });
        self
    }

    /// The `name@version` key this snapshot is matched by.
    pub fn key(&self) -> SpecKey {
        SpecKey::new(&self.name, &self.version)
    }

    /// Generate a snapshot from a declared spec.
    pub fn from_declared(spec: &DeclaredSpec) -> Result<Self, SnapshotError> {
        let io = match &spec.io {
            Some(io) => Some(SpecIo {
                input: shape_from_schema(&io.input).map_err(|e| in_spec(spec, "input", e))?,
                output: shape_from_schema(&io.output).map_err(|e| in_spec(spec, "output", e))?,
            }),
            None => None,
        };
        tracing::debug!(name = %spec.name, version = %spec.version, "generated spec snapshot");
        Ok(Self {
            name: spec.name.clone(),
            version: spec.version.clone(),
            spec_type: spec.spec_type,
            io,
        })
    }
}

/// Prefix schema error paths with the spec key and IO side.
fn in_spec(spec: &DeclaredSpec, side: &str, err: SnapshotError) -> SnapshotError {
    match err {
        SnapshotError::InvalidSchema { path, detail } => SnapshotError::InvalidSchema {
            path: format!("{}@{} {side} {path}", spec.name, spec.version),
            detail,
        },
        other => other,
    }
}

/// A point-in-time capture of a whole spec set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    /// Format version, currently always 1.
    pub version: u32,
    /// ISO 8601 UTC timestamp of generation.
    pub generated_at: String,
    /// Specs sorted by name, then version.
    pub specs: Vec<SpecSnapshot>,
    /// Hex SHA-256 of the canonical JSON encoding of `specs`.
    pub hash: String,
}

impl ContractSnapshot {
    /// Capture a spec set. Rejects duplicate `name@version` keys.
    pub fn generate(mut specs: Vec<SpecSnapshot>) -> Result<Self, SnapshotError> {
        specs.sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));

        let mut seen = HashSet::new();
        for spec in &specs {
            let key = spec.key().to_string();
            if !seen.insert(key.clone()) {
                return Err(SnapshotError::DuplicateSpec(key));
            }
        }

        let hash = Self::compute_hash(&specs)?;
        tracing::debug!(specs = specs.len(), hash = %hash, "contract snapshot generated");
        Ok(Self {
            version: SNAPSHOT_FORMAT_VERSION,
            generated_at: now_iso8601(),
            specs,
            hash,
        })
    }

    /// Generate spec snapshots for every declared spec, then capture them.
    pub fn from_declared(declared: &[DeclaredSpec]) -> Result<Self, SnapshotError> {
        let specs = declared
            .iter()
            .map(SpecSnapshot::from_declared)
            .collect::<Result<Vec<_>, _>>()?;
        Self::generate(specs)
    }

    /// Hash of the canonical JSON encoding of `specs`.
    pub fn compute_hash(specs: &[SpecSnapshot]) -> Result<String, SnapshotError> {
        let bytes = serde_json::to_vec(specs)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// Check the format version and that `hash` matches `specs`.
    pub fn verify(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedFormat(self.version));
        }
        let actual = Self::compute_hash(&self.specs)?;
        if actual != self.hash {
            return Err(SnapshotError::HashMismatch {
                expected: self.hash.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Parse and verify a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: ContractSnapshot = serde_json::from_str(json)?;
        snapshot.verify()?;
        Ok(snapshot)
    }

    /// Pretty-printed JSON encoding.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Classify the impact of moving from `self` (baseline) to `head`.
    pub fn compare(&self, head: &ContractSnapshot) -> Result<ImpactResult, DiffError> {
        analyze_impact(&self.specs, &head.specs)
    }

    /// Same spec content, regardless of when either snapshot was taken.
    pub fn same_content(&self, other: &ContractSnapshot) -> bool {
        self.hash == other.hash
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
fn now_iso8601() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_unix_seconds(secs)
}

fn format_unix_seconds(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (hours, minutes, seconds) = (rem / 3600, (rem % 3600) / 60, rem % 60);

    // Civil-from-days over 400-year eras.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}Z")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::shape::TypeTag;

    fn declared(name: &str, version: &str) -> DeclaredSpec {
        DeclaredSpec {
            name: name.into(),
            version: version.into(),
            spec_type: SpecType::Operation,
            io: Some(DeclaredIo {
                input: json!({
                    "type": "object",
                    "properties": { "email": { "type": "string" } },
                    "required": ["email"]
                }),
                output: json!({ "type": "object" }),
            }),
        }
    }

    #[test]
    fn spec_snapshot_from_declared() {
        let snap = SpecSnapshot::from_declared(&declared("order.create", "1.0.0")).unwrap();
        assert_eq!(snap.key().to_string(), "order.create@1.0.0");
        let io = snap.io.unwrap();
        assert!(io.input.fields["email"].required);
        assert_eq!(io.output.type_tag, TypeTag::Object);
    }

    #[test]
    fn missing_io_sides_are_unconstrained() {
        let spec: DeclaredSpec = serde_json::from_value(json!({
            "name": "ping",
            "version": "1.0.0",
            "type": "operation",
            "io": { "input": { "type": "object" } }
        }))
        .unwrap();
        let snap = SpecSnapshot::from_declared(&spec).unwrap();
        assert_eq!(snap.io.unwrap().output, StructuralShape::unknown());
    }

    #[test]
    fn schema_errors_name_the_spec() {
        let mut spec = declared("order.create", "1.0.0");
        spec.io.as_mut().unwrap().output = json!(42);
        match SpecSnapshot::from_declared(&spec).unwrap_err() {
            SnapshotError::InvalidSchema { path, .. } => {
                assert_eq!(path, "order.create@1.0.0 output $");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn snapshot_is_sorted_and_hashed() {
        let snapshot = ContractSnapshot::from_declared(&[
            declared("b", "1.0.0"),
            declared("a", "2.0.0"),
            declared("a", "1.0.0"),
        ])
        .unwrap();

        let keys: Vec<String> = snapshot.specs.iter().map(|s| s.key().to_string()).collect();
        assert_eq!(keys, vec!["a@1.0.0", "a@2.0.0", "b@1.0.0"]);
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.hash.len(), 64);
        assert!(snapshot.generated_at.ends_with('Z'));
        snapshot.verify().unwrap();
    }

    #[test]
    fn hash_ignores_input_order() {
        let a = ContractSnapshot::from_declared(&[declared("a", "1.0.0"), declared("b", "1.0.0")])
            .unwrap();
        let b = ContractSnapshot::from_declared(&[declared("b", "1.0.0"), declared("a", "1.0.0")])
            .unwrap();
        assert!(a.same_content(&b));
    }

    #[test]
    fn duplicate_specs_are_rejected() {
        let err = ContractSnapshot::from_declared(&[declared("a", "1.0.0"), declared("a", "1.0.0")])
            .unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateSpec(ref k) if k == "a@1.0.0"));
    }

    #[test]
    fn json_round_trip_verifies_hash() {
        let snapshot = ContractSnapshot::from_declared(&[declared("a", "1.0.0")]).unwrap();
        let json = snapshot.to_json().unwrap();
        assert_eq!(ContractSnapshot::from_json(&json).unwrap(), snapshot);

        let mut tampered = snapshot.clone();
        tampered.specs[0].version = "9.9.9".into();
        let json = serde_json::to_string(&tampered).unwrap();
        assert!(matches!(
            ContractSnapshot::from_json(&json),
            Err(SnapshotError::HashMismatch { .. })
        ));

        let mut future = snapshot;
        future.version = 2;
        assert!(matches!(future.verify(), Err(SnapshotError::UnsupportedFormat(2))));
    }

    #[test]
    fn timestamp_formatting() {
        assert_eq!(format_unix_seconds(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_unix_seconds(951_782_400), "2000-02-29T00:00:00Z");
        assert_eq!(format_unix_seconds(1_700_000_000), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn compare_two_snapshots() {
        let baseline = ContractSnapshot::from_declared(&[declared("a", "1.0.0")]).unwrap();
        let head = ContractSnapshot::from_declared(&[declared("a", "1.0.0")]).unwrap();
        let result = baseline.compare(&head).unwrap();
        assert!(result.items.is_empty());
    }
}
