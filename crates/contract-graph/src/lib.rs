//! Contract dependency graph.
//!
//! Builds a directed graph over discovered contract specs and checks its
//! health. Construction is two-pass: every spec is registered first with
//! [`ContractGraph::add_node`], then [`ContractGraph::build_reverse_edges`]
//! fills in the `dependents` of each node, because dependency lists arrive
//! file by file in arbitrary order.
//!
//! Dangling edges (dependencies on keys that were never registered) are
//! legal graph data; [`find_missing_dependencies`] reports them. Cycles are
//! reported by [`detect_cycles`]. Both detectors are pure functions over an
//! immutable graph.

pub mod cycles;
pub mod descriptor;
pub mod dot;
pub mod error;
pub mod graph;
pub mod health;
pub mod missing;

pub use cycles::detect_cycles;
pub use descriptor::{slug_from_path, DescriptorExtractor, SpecDescriptor};
pub use dot::to_dot;
pub use error::GraphError;
pub use graph::{build_graph, ContractGraph, ContractNode};
pub use health::{check_health, GraphHealth};
pub use missing::{find_missing_dependencies, MissingDependency};
