//! Capability declarations and the registry that holds them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use contract_core::{parse_version, Version};

use crate::error::{RegistryError, Result};

/// What a capability exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Api,
    Ui,
    Data,
    Integration,
    Event,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityKind::Api => write!(f, "api"),
            CapabilityKind::Ui => write!(f, "ui"),
            CapabilityKind::Data => write!(f, "data"),
            CapabilityKind::Integration => write!(f, "integration"),
            CapabilityKind::Event => write!(f, "event"),
        }
    }
}

/// A reference to one capability version, as listed in a spec's `provides`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityRef {
    pub key: String,
    pub version: String,
}

impl CapabilityRef {
    pub fn new(key: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for CapabilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key, self.version)
    }
}

/// A registered capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySpec {
    pub key: String,
    pub version: String,
    pub kind: CapabilityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CapabilitySpec {
    pub fn new(key: impl Into<String>, version: impl Into<String>, kind: CapabilityKind) -> Self {
        Self {
            key: key.into(),
            version: version.into(),
            kind,
            description: None,
        }
    }
}

/// Every registered capability, grouped by key with versions kept in
/// ascending semver order.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    entries: BTreeMap<String, Vec<(Version, CapabilitySpec)>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability version.
    pub fn register(&mut self, spec: CapabilitySpec) -> Result<()> {
        let version = parse_version(&spec.version).map_err(|source| RegistryError::InvalidVersion {
            key: spec.key.clone(),
            source,
        })?;

        let versions = self.entries.entry(spec.key.clone()).or_default();
        if versions.iter().any(|(v, _)| v.cmp_precedence(&version).is_eq()) {
            return Err(RegistryError::DuplicateCapability {
                key: spec.key,
                version: spec.version,
            });
        }

        tracing::debug!(key = %spec.key, version = %version, kind = %spec.kind, "registered capability");
        let at = versions.partition_point(|(v, _)| *v < version);
        versions.insert(at, (version, spec));
        Ok(())
    }

    /// Look up an exact `key@version`. `version` is compared by semver
    /// precedence, so `1.0.0` and `1.0.0+build` match.
    pub fn get(&self, key: &str, version: &str) -> Option<&CapabilitySpec> {
        let wanted = parse_version(version).ok()?;
        self.entries
            .get(key)?
            .iter()
            .find(|(v, _)| v.cmp_precedence(&wanted).is_eq())
            .map(|(_, spec)| spec)
    }

    /// The highest registered version of `key`.
    pub fn latest(&self, key: &str) -> Option<&CapabilitySpec> {
        self.entries.get(key)?.last().map(|(_, spec)| spec)
    }

    /// All registered versions of `key`, ascending.
    pub fn versions(&self, key: &str) -> Vec<&str> {
        self.entries
            .get(key)
            .map(|vs| vs.iter().map(|(_, spec)| spec.version.as_str()).collect())
            .unwrap_or_default()
    }

    /// Number of registered capability versions.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
