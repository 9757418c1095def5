//! Semantic diff between two snapshots of the same spec.
//!
//! Shapes are walked field by field. Paths use dots for object fields and
//! `[]` for array elements (`io.input.lines[].sku`). Each atomic difference
//! becomes one [`SemanticDiffItem`], except array element changes, which
//! collapse into a single item anchored at the array.
//!
//! | Change                                   | Kind    | Breaking |
//! |------------------------------------------|---------|----------|
//! | new optional field                       | added   | no       |
//! | new required field                       | added   | yes      |
//! | field removed                            | removed | yes      |
//! | type tag changed                         | changed | yes      |
//! | optional → required                      | changed | yes      |
//! | required → optional                      | changed | no       |
//! | nullable → non-nullable                  | changed | yes      |
//! | non-nullable → nullable                  | changed | no       |
//! | enum value removed                       | changed | yes      |
//! | enum value added                         | changed | no       |

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shape::StructuralShape;
use crate::snapshot::SpecSnapshot;

/// What happened at a diff path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::Added => write!(f, "added"),
            DiffKind::Removed => write!(f, "removed"),
            DiffKind::Changed => write!(f, "changed"),
        }
    }
}

/// One atomic structural difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticDiffItem {
    /// `name@version` of the spec the difference belongs to.
    pub spec_key: String,
    /// Dot/bracket path of the affected position.
    pub path: String,
    pub kind: DiffKind,
    pub breaking: bool,
    pub description: String,
}

struct Collector<'a> {
    spec_key: &'a str,
    items: Vec<SemanticDiffItem>,
}

impl Collector<'_> {
    fn push(&mut self, path: &str, kind: DiffKind, breaking: bool, description: String) {
        self.items.push(SemanticDiffItem {
            spec_key: self.spec_key.to_string(),
            path: path.to_string(),
            kind,
            breaking,
            description,
        });
    }
}

/// Compare two shapes of the same logical position.
///
/// Paths in the returned items are relative to the shapes' root.
/// `compute_io_diff(k, s, s)` is always empty.
pub fn compute_io_diff(
    spec_key: &str,
    baseline: &StructuralShape,
    head: &StructuralShape,
) -> Vec<SemanticDiffItem> {
    let mut out = Collector {
        spec_key,
        items: Vec::new(),
    };
    diff_shape(&mut out, "", baseline, head);
    out.items
}

/// Compare two snapshots of the same `name@version`.
///
/// A change of spec type is reported as the old type removed and the new one
/// added, without field-level diffing.
pub fn diff_specs(baseline: &SpecSnapshot, head: &SpecSnapshot) -> Vec<SemanticDiffItem> {
    let spec_key = head.key().to_string();
    let mut out = Collector {
        spec_key: &spec_key,
        items: Vec::new(),
    };

    if baseline.spec_type != head.spec_type {
        out.push(
            "type",
            DiffKind::Removed,
            true,
            format!("spec type '{}' removed", baseline.spec_type),
        );
        out.push(
            "type",
            DiffKind::Added,
            false,
            format!("spec type '{}' added", head.spec_type),
        );
        return out.items;
    }

    match (&baseline.io, &head.io) {
        (Some(base), Some(new)) => {
            diff_shape(&mut out, "io.input", &base.input, &new.input);
            diff_shape(&mut out, "io.output", &base.output, &new.output);
        }
        (Some(_), None) => out.push("io", DiffKind::Removed, true, "input/output declaration removed".into()),
        (None, Some(_)) => out.push("io", DiffKind::Added, false, "input/output declaration added".into()),
        (None, None) => {}
    }

    if !out.items.is_empty() {
        tracing::debug!(spec = %spec_key, items = out.items.len(), "spec changed");
    }
    out.items
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn diff_shape(out: &mut Collector<'_>, path: &str, base: &StructuralShape, head: &StructuralShape) {
    if base.type_tag != head.type_tag {
        out.push(
            path,
            DiffKind::Changed,
            true,
            format!("type changed from {} to {}", base.type_tag, head.type_tag),
        );
        return;
    }

    match (base.nullable, head.nullable) {
        (true, false) => out.push(path, DiffKind::Changed, true, "no longer accepts null".into()),
        (false, true) => out.push(path, DiffKind::Changed, false, "now accepts null".into()),
        _ => {}
    }

    diff_fields(out, path, base, head);
    diff_items(out, path, base, head);
    diff_values(out, path, base, head);
}

fn diff_fields(out: &mut Collector<'_>, path: &str, base: &StructuralShape, head: &StructuralShape) {
    let names: BTreeSet<&String> = base.fields.keys().chain(head.fields.keys()).collect();

    for name in names {
        let field_path = join(path, name);
        match (base.fields.get(name), head.fields.get(name)) {
            (Some(old), Some(new)) => {
                match (old.required, new.required) {
                    (false, true) => out.push(
                        &field_path,
                        DiffKind::Changed,
                        true,
                        format!("field '{name}' changed from optional to required"),
                    ),
                    (true, false) => out.push(
                        &field_path,
                        DiffKind::Changed,
                        false,
                        format!("field '{name}' changed from required to optional"),
                    ),
                    _ => {}
                }
                diff_shape(out, &field_path, &old.shape, &new.shape);
            }
            (Some(old), None) => out.push(
                &field_path,
                DiffKind::Removed,
                true,
                format!(
                    "{} field '{name}' removed",
                    if old.required { "required" } else { "optional" }
                ),
            ),
            (None, Some(new)) => out.push(
                &field_path,
                DiffKind::Added,
                new.required,
                format!(
                    "{} field '{name}' added",
                    if new.required { "required" } else { "optional" }
                ),
            ),
            (None, None) => {}
        }
    }
}

/// Element changes collapse into one item at the array path, breaking if any
/// element-level difference is.
fn diff_items(out: &mut Collector<'_>, path: &str, base: &StructuralShape, head: &StructuralShape) {
    match (&base.items, &head.items) {
        (Some(old), Some(new)) => {
            let mut inner = Collector {
                spec_key: out.spec_key,
                items: Vec::new(),
            };
            diff_shape(&mut inner, &format!("{path}[]"), old, new);
            if inner.items.is_empty() {
                return;
            }
            let breaking = inner.items.iter().any(|i| i.breaking);
            let details: Vec<String> = inner
                .items
                .iter()
                .map(|i| format!("{}: {}", i.path, i.description))
                .collect();
            out.push(
                path,
                DiffKind::Changed,
                breaking,
                format!("array element shape changed ({})", details.join("; ")),
            );
        }
        (None, Some(_)) => out.push(
            path,
            DiffKind::Changed,
            true,
            "array elements are now constrained".into(),
        ),
        (Some(_), None) => out.push(
            path,
            DiffKind::Changed,
            false,
            "array elements are no longer constrained".into(),
        ),
        (None, None) => {}
    }
}

fn diff_values(out: &mut Collector<'_>, path: &str, base: &StructuralShape, head: &StructuralShape) {
    for value in &base.values {
        if !head.values.contains(value) {
            out.push(
                path,
                DiffKind::Changed,
                true,
                format!("enum value '{value}' removed"),
            );
        }
    }
    for value in &head.values {
        if !base.values.contains(value) {
            out.push(
                path,
                DiffKind::Changed,
                false,
                format!("enum value '{value}' added"),
            );
        }
    }
}
