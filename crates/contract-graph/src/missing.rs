//! Unresolved dependency detection.

use serde::{Deserialize, Serialize};

use crate::graph::ContractGraph;

/// A spec that references keys absent from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDependency {
    /// The referencing spec.
    pub contract: String,
    /// Every unresolved key it declares, in declaration order.
    pub missing: Vec<String>,
}

/// Report unresolved dependencies, one record per referencing spec.
pub fn find_missing_dependencies(graph: &ContractGraph) -> Vec<MissingDependency> {
    let mut out = Vec::new();

    for node in graph.nodes() {
        let mut missing: Vec<String> = Vec::new();
        for dep in &node.dependencies {
            if !graph.contains(dep) && !missing.contains(dep) {
                missing.push(dep.clone());
            }
        }
        if !missing.is_empty() {
            tracing::warn!(contract = %node.key, missing = ?missing, "unresolved dependencies");
            out.push(MissingDependency {
                contract: node.key.clone(),
                missing,
            });
        }
    }

    out
}
