//! Contract graph container — the central data structure.
//!
//! Stores one node per logical spec key with forward (`dependencies`) and
//! reverse (`dependents`) edges. Nodes are keyed by the unversioned spec key.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::descriptor::SpecDescriptor;
use crate::error::GraphError;

/// One spec in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractNode {
    /// Globally unique spec key.
    pub key: String,
    /// File the spec was discovered in.
    pub path: PathBuf,
    /// Keys this spec references, in declaration order. May name absent keys.
    pub dependencies: Vec<String>,
    /// Keys of the specs that reference this one. Filled by
    /// [`ContractGraph::build_reverse_edges`].
    pub dependents: Vec<String>,
}

/// The contract dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractGraph {
    nodes: BTreeMap<String, ContractNode>,
}

impl ContractGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Construction ---

    /// Register a spec. Fails if another spec already claimed `key`.
    pub fn add_node(
        &mut self,
        key: impl Into<String>,
        path: impl Into<PathBuf>,
        dependencies: Vec<String>,
    ) -> Result<(), GraphError> {
        let key = key.into();
        if self.nodes.contains_key(&key) {
            return Err(GraphError::DuplicateNode(key));
        }
        let path = path.into();
        tracing::debug!(key = %key, path = %path.display(), deps = dependencies.len(), "registered contract node");
        self.nodes.insert(
            key.clone(),
            ContractNode {
                key,
                path,
                dependencies,
                dependents: Vec::new(),
            },
        );
        Ok(())
    }

    /// Second construction pass: fill every node's `dependents`.
    ///
    /// Dependencies on unregistered keys are skipped here; they are reported
    /// by [`crate::find_missing_dependencies`]. Any previous reverse edges
    /// are discarded first.
    pub fn build_reverse_edges(&mut self) {
        for node in self.nodes.values_mut() {
            node.dependents.clear();
        }

        let edges: Vec<(String, String)> = self
            .nodes
            .values()
            .flat_map(|node| {
                node.dependencies
                    .iter()
                    .map(move |dep| (node.key.clone(), dep.clone()))
            })
            .collect();

        for (from, to) in edges {
            if let Some(target) = self.nodes.get_mut(&to) {
                if !target.dependents.contains(&from) {
                    target.dependents.push(from);
                }
            }
        }
    }

    // --- Queries ---

    /// Get a node by key.
    pub fn get(&self, key: &str) -> Option<&ContractNode> {
        self.nodes.get(key)
    }

    /// Whether a spec with this key was registered.
    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Iterate over all nodes in key order.
    pub fn nodes(&self) -> impl Iterator<Item = &ContractNode> {
        self.nodes.values()
    }

    /// Iterate over all keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of declared dependency edges, dangling ones included.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.dependencies.len()).sum()
    }

    /// Direct dependents of a spec (empty if unknown).
    pub fn dependents_of(&self, key: &str) -> &[String] {
        self.nodes
            .get(key)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Every spec that reaches `key` through one or more dependency edges,
    /// nearest first. `key` itself is only included when it sits on a cycle.
    pub fn transitive_dependents(&self, key: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut out = Vec::new();

        queue.push_back(key);
        while let Some(current) = queue.pop_front() {
            for dependent in self.dependents_of(current) {
                if seen.insert(dependent.as_str()) {
                    out.push(dependent.clone());
                    queue.push_back(dependent.as_str());
                }
            }
        }
        out
    }
}

/// Build a complete graph from extractor output in both passes.
///
/// Specs without a declared key fall back to the slug of their path.
pub fn build_graph<I, P>(entries: I) -> Result<ContractGraph, GraphError>
where
    I: IntoIterator<Item = (P, SpecDescriptor)>,
    P: AsRef<Path>,
{
    let mut graph = ContractGraph::new();
    for (path, descriptor) in entries {
        let path = path.as_ref();
        let key = descriptor.resolved_key(path);
        graph.add_node(key, path, descriptor.dependencies)?;
    }
    graph.build_reverse_edges();
    tracing::debug!(nodes = graph.len(), edges = graph.edge_count(), "contract graph built");
    Ok(graph)
}
