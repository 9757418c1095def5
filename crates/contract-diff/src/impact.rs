//! Impact classification over a whole spec set.
//!
//! Folds every diff item of every matched `name@version` pair into a single
//! verdict and suggests a semantic-version bump for each changed spec.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use contract_core::{bump_version, determine_bump_type, BumpType};

use crate::diff::{diff_specs, DiffKind, SemanticDiffItem};
use crate::error::DiffError;
use crate::snapshot::SpecSnapshot;

/// Overall verdict of an impact analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImpactStatus {
    /// At least one breaking change.
    Breaking,
    /// Changes exist, none breaking.
    NonBreaking,
    /// No changes.
    Clean,
}

impl fmt::Display for ImpactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactStatus::Breaking => write!(f, "breaking"),
            ImpactStatus::NonBreaking => write!(f, "non-breaking"),
            ImpactStatus::Clean => write!(f, "clean"),
        }
    }
}

/// Diff item counts by breaking flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub breaking: usize,
    pub non_breaking: usize,
}

/// Version bump suggestion for one changed spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionAnalysis {
    pub spec_key: String,
    pub current_version: String,
    pub suggested_version: String,
    pub bump_type: BumpType,
    pub has_breaking: bool,
}

/// The result handed to report formatters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub status: ImpactStatus,
    pub summary: ImpactSummary,
    /// Every folded diff item, grouped by spec key in key order.
    pub items: Vec<SemanticDiffItem>,
    /// One entry per spec with at least one item, in key order.
    pub version_suggestions: Vec<VersionAnalysis>,
    /// Specs only present in the head (informational).
    pub added_specs: Vec<String>,
    /// Specs only present in the baseline.
    pub removed_specs: Vec<String>,
}

impl ImpactResult {
    pub fn is_breaking(&self) -> bool {
        self.status == ImpactStatus::Breaking
    }

    /// Whether a CI gate with this policy should fail.
    pub fn should_fail(&self, fail_on_breaking: bool, fail_on_non_breaking: bool) -> bool {
        match self.status {
            ImpactStatus::Breaking => fail_on_breaking,
            ImpactStatus::NonBreaking => fail_on_non_breaking,
            ImpactStatus::Clean => false,
        }
    }

    /// Spec keys that carry at least one breaking item.
    pub fn breaking_specs(&self) -> Vec<&str> {
        self.version_suggestions
            .iter()
            .filter(|v| v.has_breaking)
            .map(|v| v.spec_key.as_str())
            .collect()
    }

    /// Format the result as a human-readable string.
    pub fn format_text(&self) -> String {
        let mut out = format!(
            "IMPACT: {} ({} breaking, {} non-breaking)\n",
            self.status, self.summary.breaking, self.summary.non_breaking
        );

        if !self.items.is_empty() {
            out.push_str("\nChanges:\n");
            for item in &self.items {
                let marker = if item.breaking { "!!" } else { "+" };
                let path = if item.path.is_empty() { "<spec>" } else { item.path.as_str() };
                out.push_str(&format!(
                    "  [{marker}] {} {} {}: {}\n",
                    item.spec_key, item.kind, path, item.description
                ));
            }
        }

        if !self.version_suggestions.is_empty() {
            out.push_str("\nSuggested versions:\n");
            for v in &self.version_suggestions {
                out.push_str(&format!(
                    "  - {}: {} -> {} ({})\n",
                    v.spec_key, v.current_version, v.suggested_version, v.bump_type
                ));
            }
        }

        if !self.added_specs.is_empty() {
            out.push_str(&format!("\nNew specs: {}\n", self.added_specs.join(", ")));
        }
        if !self.removed_specs.is_empty() {
            out.push_str(&format!("\nRemoved specs: {}\n", self.removed_specs.join(", ")));
        }

        out
    }
}

fn index<'a>(
    specs: &'a [SpecSnapshot],
    side: &'static str,
) -> Result<BTreeMap<String, &'a SpecSnapshot>, DiffError> {
    let mut map = BTreeMap::new();
    for spec in specs {
        let key = spec.key().to_string();
        if map.insert(key.clone(), spec).is_some() {
            return Err(DiffError::DuplicateSpec { key, side });
        }
    }
    Ok(map)
}

/// Fold precomputed diff items into a verdict.
///
/// Specs are matched by `name@version`. Head-only specs are listed as new and
/// contribute nothing. Baseline-only specs each add one breaking `removed`
/// item. Items whose spec is not present on both sides are ignored. An
/// unparsable or unbumpable version on a changed spec is an error.
pub fn classify_impact(
    baseline_specs: &[SpecSnapshot],
    head_specs: &[SpecSnapshot],
    diffs: &[SemanticDiffItem],
) -> Result<ImpactResult, DiffError> {
    let baseline = index(baseline_specs, "baseline")?;
    let head = index(head_specs, "head")?;

    let mut by_spec: BTreeMap<String, Vec<SemanticDiffItem>> = BTreeMap::new();

    for item in diffs {
        if baseline.contains_key(&item.spec_key) && head.contains_key(&item.spec_key) {
            by_spec
                .entry(item.spec_key.clone())
                .or_default()
                .push(item.clone());
        } else {
            tracing::debug!(spec = %item.spec_key, path = %item.path, "ignoring diff item for unmatched spec");
        }
    }

    let mut removed_specs = Vec::new();
    for key in baseline.keys() {
        if !head.contains_key(key) {
            removed_specs.push(key.clone());
            by_spec.entry(key.clone()).or_default().push(SemanticDiffItem {
                spec_key: key.clone(),
                path: String::new(),
                kind: DiffKind::Removed,
                breaking: true,
                description: "spec removed".into(),
            });
        }
    }

    let added_specs: Vec<String> = head
        .keys()
        .filter(|k| !baseline.contains_key(*k))
        .cloned()
        .collect();

    let mut summary = ImpactSummary::default();
    let mut items = Vec::new();
    let mut version_suggestions = Vec::new();

    for (key, spec_items) in by_spec {
        let has_breaking = spec_items.iter().any(|i| i.breaking);
        let has_non_breaking = spec_items.iter().any(|i| !i.breaking);
        let bump_type = determine_bump_type(has_breaking, has_non_breaking);

        let current_version = baseline[&key].version.clone();
        let suggested_version =
            bump_version(&current_version, bump_type).map_err(|source| DiffError::InvalidVersion {
                spec_key: key.clone(),
                source,
            })?;

        for item in &spec_items {
            if item.breaking {
                summary.breaking += 1;
            } else {
                summary.non_breaking += 1;
            }
        }

        version_suggestions.push(VersionAnalysis {
            spec_key: key,
            current_version,
            suggested_version,
            bump_type,
            has_breaking,
        });
        items.extend(spec_items);
    }

    let status = if summary.breaking > 0 {
        ImpactStatus::Breaking
    } else if summary.non_breaking > 0 {
        ImpactStatus::NonBreaking
    } else {
        ImpactStatus::Clean
    };

    tracing::info!(
        status = %status,
        breaking = summary.breaking,
        non_breaking = summary.non_breaking,
        added = added_specs.len(),
        removed = removed_specs.len(),
        "impact classified"
    );

    Ok(ImpactResult {
        status,
        summary,
        items,
        version_suggestions,
        added_specs,
        removed_specs,
    })
}

/// Diff every matched pair, then classify.
pub fn analyze_impact(
    baseline_specs: &[SpecSnapshot],
    head_specs: &[SpecSnapshot],
) -> Result<ImpactResult, DiffError> {
    let head = index(head_specs, "head")?;
    let mut diffs = Vec::new();
    for base in baseline_specs {
        if let Some(new) = head.get(&base.key().to_string()) {
            diffs.extend(diff_specs(base, new));
        }
    }
    classify_impact(baseline_specs, head_specs, &diffs)
}

#[cfg(test)]
mod tests {
    use contract_core::{CoreError, SpecType};

    use super::*;
    use crate::shape::{StructuralShape, TypeTag};

    fn string() -> StructuralShape {
        StructuralShape::scalar(TypeTag::String)
    }

    fn op(name: &str, version: &str, input: StructuralShape) -> SpecSnapshot {
        SpecSnapshot::new(name, version, SpecType::Operation).with_io(input, StructuralShape::object())
    }

    fn item(spec_key: &str, breaking: bool) -> SemanticDiffItem {
        SemanticDiffItem {
            spec_key: spec_key.into(),
            path: "io.input.x".into(),
            kind: DiffKind::Changed,
            breaking,
            description: "test".into(),
        }
    }

    #[test]
    fn order_create_end_to_end() {
        let baseline = vec![op(
            "order.create",
            "1.0.0",
            StructuralShape::object().required("email", string()),
        )];
        let head = vec![op(
            "order.create",
            "1.0.0",
            StructuralShape::object().optional("phone", string()),
        )];

        let result = analyze_impact(&baseline, &head).unwrap();
        assert_eq!(result.status, ImpactStatus::Breaking);
        assert_eq!(result.items.len(), 2);

        let email = &result.items[0];
        assert_eq!(email.path, "io.input.email");
        assert_eq!(email.kind, DiffKind::Removed);
        assert!(email.breaking);

        let phone = &result.items[1];
        assert_eq!(phone.path, "io.input.phone");
        assert_eq!(phone.kind, DiffKind::Added);
        assert!(!phone.breaking);

        assert_eq!(result.summary, ImpactSummary { breaking: 1, non_breaking: 1 });
        assert_eq!(result.version_suggestions.len(), 1);
        let v = &result.version_suggestions[0];
        assert_eq!(v.spec_key, "order.create@1.0.0");
        assert_eq!(v.suggested_version, "2.0.0");
        assert_eq!(v.bump_type, BumpType::Major);
        assert!(v.has_breaking);
    }

    #[test]
    fn identical_sets_are_clean() {
        let specs = vec![op("a", "1.0.0", StructuralShape::object().required("id", string()))];
        let result = analyze_impact(&specs, &specs).unwrap();
        assert_eq!(result.status, ImpactStatus::Clean);
        assert!(result.items.is_empty());
        assert!(result.version_suggestions.is_empty());
        assert!(!result.should_fail(true, true));
    }

    #[test]
    fn non_breaking_only_suggests_minor() {
        let baseline = vec![op("a", "1.4.2", StructuralShape::object())];
        let head = vec![op("a", "1.4.2", StructuralShape::object().optional("note", string()))];
        let result = analyze_impact(&baseline, &head).unwrap();
        assert_eq!(result.status, ImpactStatus::NonBreaking);
        assert_eq!(result.version_suggestions[0].suggested_version, "1.5.0");
        assert_eq!(result.version_suggestions[0].bump_type, BumpType::Minor);
        assert!(!result.should_fail(true, false));
        assert!(result.should_fail(true, true));
    }

    #[test]
    fn new_specs_are_informational() {
        let baseline = vec![op("a", "1.0.0", StructuralShape::object())];
        let head = vec![
            op("a", "1.0.0", StructuralShape::object()),
            op("b", "1.0.0", StructuralShape::object()),
        ];
        let result = analyze_impact(&baseline, &head).unwrap();
        assert_eq!(result.status, ImpactStatus::Clean);
        assert_eq!(result.added_specs, vec!["b@1.0.0".to_string()]);
        assert_eq!(result.summary, ImpactSummary::default());
    }

    #[test]
    fn version_bump_in_head_is_a_removal_plus_new_spec() {
        let baseline = vec![op("a", "1.0.0", StructuralShape::object())];
        let head = vec![op("a", "2.0.0", StructuralShape::object())];
        let result = analyze_impact(&baseline, &head).unwrap();
        assert_eq!(result.status, ImpactStatus::Breaking);
        assert_eq!(result.removed_specs, vec!["a@1.0.0".to_string()]);
        assert_eq!(result.added_specs, vec!["a@2.0.0".to_string()]);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].kind, DiffKind::Removed);
        assert!(result.items[0].breaking);
    }

    #[test]
    fn status_is_breaking_iff_any_breaking_item() {
        let specs = vec![
            op("a", "1.0.0", StructuralShape::object()),
            op("b", "1.0.0", StructuralShape::object()),
        ];

        let result = classify_impact(&specs, &specs, &[item("a@1.0.0", false)]).unwrap();
        assert_eq!(result.status, ImpactStatus::NonBreaking);

        let result = classify_impact(
            &specs,
            &specs,
            &[item("a@1.0.0", false), item("b@1.0.0", true)],
        )
        .unwrap();
        assert_eq!(result.status, ImpactStatus::Breaking);
        assert_eq!(result.breaking_specs(), vec!["b@1.0.0"]);
        assert_eq!(result.version_suggestions.len(), 2);
    }

    #[test]
    fn items_for_unmatched_specs_are_ignored() {
        let specs = vec![op("a", "1.0.0", StructuralShape::object())];
        let result = classify_impact(&specs, &specs, &[item("ghost@1.0.0", true)]).unwrap();
        assert_eq!(result.status, ImpactStatus::Clean);
        assert!(result.items.is_empty());
    }

    #[test]
    fn invalid_version_on_changed_spec_propagates() {
        let specs = vec![op("a", "one", StructuralShape::object())];
        let err = classify_impact(&specs, &specs, &[item("a@one", false)]).unwrap_err();
        assert!(matches!(err, DiffError::InvalidVersion { ref spec_key, .. } if spec_key == "a@one"));
    }

    #[test]
    fn unbumpable_version_on_breaking_spec_propagates() {
        let version = format!("{}.0.0", u64::MAX);
        let key = format!("a@{version}");
        let specs = vec![op("a", &version, StructuralShape::object())];
        let err = classify_impact(&specs, &specs, &[item(&key, true)]).unwrap_err();
        assert!(matches!(
            err,
            DiffError::InvalidVersion { source: CoreError::VersionOverflow { component: "major", .. }, .. }
        ));
    }

    #[test]
    fn invalid_version_on_unchanged_spec_is_fine() {
        let specs = vec![op("a", "one", StructuralShape::object())];
        let result = classify_impact(&specs, &specs, &[]).unwrap();
        assert_eq!(result.status, ImpactStatus::Clean);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let specs = vec![
            op("a", "1.0.0", StructuralShape::object()),
            op("a", "1.0.0", StructuralShape::object()),
        ];
        let err = analyze_impact(&specs[..1], &specs).unwrap_err();
        assert_eq!(
            err,
            DiffError::DuplicateSpec {
                key: "a@1.0.0".into(),
                side: "head",
            }
        );
    }

    #[test]
    fn result_serializes_with_kebab_case_status() {
        let result = analyze_impact(&[], &[]).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "clean");

        let status = serde_json::to_value(ImpactStatus::NonBreaking).unwrap();
        assert_eq!(status, "non-breaking");
    }

    #[test]
    fn text_report_lists_changes_and_versions() {
        let baseline = vec![op("a", "1.0.0", StructuralShape::object().required("id", string()))];
        let head = vec![op("a", "1.0.0", StructuralShape::object())];
        let text = analyze_impact(&baseline, &head).unwrap().format_text();
        assert!(text.contains("IMPACT: breaking"));
        assert!(text.contains("a@1.0.0 removed io.input.id"));
        assert!(text.contains("1.0.0 -> 2.0.0 (major)"));
    }
}
