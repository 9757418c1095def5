//! The spec manifest produced by the source extractor.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use contract_core::SpecType;
use contract_diff::{DeclaredIo, DeclaredSpec};
use contract_graph::{build_graph, ContractGraph, SpecDescriptor};
use contract_registry::{CapabilityRef, CapabilityRegistry, CapabilityRequirement, CapabilitySpec};

/// Every spec found in a source tree plus the capabilities available to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecManifest {
    #[serde(default)]
    pub specs: Vec<ManifestSpec>,
    #[serde(default)]
    pub capabilities: Vec<CapabilitySpec>,
}

/// One extracted spec file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "type", default = "unknown_type")]
    pub spec_type: SpecType,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub io: Option<DeclaredIo>,
    #[serde(default)]
    pub provides: Vec<CapabilityRef>,
    #[serde(default)]
    pub requires: Vec<CapabilityRequirement>,
}

fn unknown_type() -> SpecType {
    SpecType::Unknown
}

impl ManifestSpec {
    pub fn descriptor(&self) -> SpecDescriptor {
        SpecDescriptor {
            key: self.key.clone(),
            spec_type: self.spec_type,
            dependencies: self.dependencies.clone(),
        }
    }

    /// The declared key, or the path slug when none was declared.
    pub fn resolved_key(&self) -> String {
        self.descriptor().resolved_key(&self.path)
    }

    pub fn declared(&self) -> Result<DeclaredSpec> {
        let name = self.resolved_key();
        let version = self
            .version
            .clone()
            .with_context(|| format!("spec '{name}' ({}) has no version", self.path.display()))?;
        Ok(DeclaredSpec {
            name,
            version,
            spec_type: self.spec_type,
            io: self.io.clone(),
        })
    }
}

impl SpecManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn graph(&self) -> Result<ContractGraph> {
        let graph = build_graph(self.specs.iter().map(|s| (&s.path, s.descriptor())))?;
        Ok(graph)
    }

    pub fn declared_specs(&self) -> Result<Vec<DeclaredSpec>> {
        self.specs.iter().map(ManifestSpec::declared).collect()
    }

    pub fn registry(&self) -> Result<CapabilityRegistry> {
        let mut registry = CapabilityRegistry::new();
        for capability in &self.capabilities {
            registry.register(capability.clone())?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "specs": [
            {
                "path": "src/orders/create.operation.ts",
                "key": "order.create",
                "type": "operation",
                "version": "1.0.0",
                "dependencies": ["user.get"],
                "provides": [{ "key": "orders", "version": "1.0.0" }],
                "requires": [{ "key": "payments" }]
            },
            { "path": "src/users/get.operation.ts", "type": "operation", "version": "1.0.0" }
        ],
        "capabilities": [{ "key": "payments", "version": "2.1.0", "kind": "api" }]
    }"#;

    #[test]
    fn parses_and_falls_back_to_slug() {
        let manifest = SpecManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.specs.len(), 2);
        assert_eq!(manifest.specs[0].resolved_key(), "order.create");
        assert_eq!(manifest.specs[1].resolved_key(), "get");
        assert_eq!(manifest.specs[0].requires[0].key, "payments");
        assert!(!manifest.specs[0].requires[0].optional);
    }

    #[test]
    fn builds_graph_with_missing_reference() {
        let manifest = SpecManifest::from_json(MANIFEST).unwrap();
        let graph = manifest.graph().unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.contains("order.create"));
        assert!(!graph.contains("user.get"));
    }

    #[test]
    fn declared_requires_version() {
        let manifest =
            SpecManifest::from_json(r#"{"specs":[{"path":"a.operation.ts","type":"operation"}]}"#)
                .unwrap();
        let err = manifest.declared_specs().unwrap_err();
        assert!(err.to_string().contains("has no version"));
    }

    #[test]
    fn registry_from_capabilities() {
        let manifest = SpecManifest::from_json(MANIFEST).unwrap();
        let registry = manifest.registry().unwrap();
        assert_eq!(registry.latest("payments").unwrap().version, "2.1.0");
    }
}
