//! Requirement satisfaction against local provides and the registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use contract_core::parse_version;

use crate::capability::{CapabilityKind, CapabilityRef, CapabilityRegistry};

/// A capability a spec depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRequirement {
    pub key: String,
    /// Exact version pin; `None` accepts whatever is latest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CapabilityKind>,
    #[serde(default)]
    pub optional: bool,
}

impl CapabilityRequirement {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version: None,
            kind: None,
            optional: false,
        }
    }

    pub fn pinned(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn of_kind(mut self, kind: CapabilityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl fmt::Display for CapabilityRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        if let Some(kind) = self.kind {
            write!(f, " ({kind})")?;
        }
        Ok(())
    }
}

/// Decide whether `requirement` is met.
///
/// Optional requirements always pass. Otherwise a matching entry in
/// `provided` (same key, and same version by semver precedence when pinned)
/// satisfies it. Failing that, the registry is consulted: the pinned version exactly, or
/// the latest version when unpinned, and the entry's kind must match when
/// the requirement names one.
pub fn is_requirement_satisfied(
    requirement: &CapabilityRequirement,
    provided: &[CapabilityRef],
    registry: &CapabilityRegistry,
) -> bool {
    if requirement.optional {
        return true;
    }

    let provided_locally = provided.iter().any(|p| {
        p.key == requirement.key
            && requirement
                .version
                .as_deref()
                .map_or(true, |v| same_version(&p.version, v))
    });
    if provided_locally {
        return true;
    }

    let found = match requirement.version.as_deref() {
        Some(version) => registry.get(&requirement.key, version),
        None => registry.latest(&requirement.key),
    };
    match found {
        Some(spec) => requirement.kind.map_or(true, |kind| spec.kind == kind),
        None => {
            tracing::debug!(requirement = %requirement, "capability not found in registry");
            false
        }
    }
}

/// Versions are equal by semver precedence, so build metadata is ignored.
/// Unparsable versions only match themselves.
fn same_version(a: &str, b: &str) -> bool {
    match (parse_version(a), parse_version(b)) {
        (Ok(a), Ok(b)) => a.cmp_precedence(&b).is_eq(),
        _ => a == b,
    }
}

/// All requirements that are not satisfied, in input order.
pub fn unsatisfied_requirements<'r>(
    requirements: &'r [CapabilityRequirement],
    provided: &[CapabilityRef],
    registry: &CapabilityRegistry,
) -> Vec<&'r CapabilityRequirement> {
    requirements
        .iter()
        .filter(|req| !is_requirement_satisfied(req, provided, registry))
        .collect()
}
