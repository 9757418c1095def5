//! Graphviz DOT export.

use crate::graph::ContractGraph;

/// Render the graph as a Graphviz `digraph`.
///
/// Emits one node statement per registered spec and one edge statement per
/// declared dependency, dangling targets included. Unregistered targets are
/// drawn dashed.
pub fn to_dot(graph: &ContractGraph) -> String {
    let mut out = String::from("digraph contracts {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box];\n");

    for node in graph.nodes() {
        out.push_str(&format!("  {};\n", quote(&node.key)));
    }

    let mut dangling: Vec<&str> = Vec::new();
    for node in graph.nodes() {
        for dep in &node.dependencies {
            out.push_str(&format!("  {} -> {};\n", quote(&node.key), quote(dep)));
            if !graph.contains(dep) && !dangling.contains(&dep.as_str()) {
                dangling.push(dep.as_str());
            }
        }
    }

    for key in dangling {
        out.push_str(&format!("  {} [style=dashed];\n", quote(key)));
    }

    out.push_str("}\n");
    out
}

fn quote(id: &str) -> String {
    let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
