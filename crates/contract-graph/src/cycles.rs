//! Cycle detection over the contract graph.

use std::collections::HashSet;

use crate::graph::ContractGraph;

/// Find dependency cycles.
///
/// Runs a depth-first search from every unvisited node (in key order),
/// following dependencies in declaration order. Each back edge to a node on
/// the current recursion stack yields one cycle: the stack slice from that
/// node to the current one, closed by repeating the first key
/// (`["a", "b", "c", "a"]`). The search does not stop at the first cycle.
/// Dependencies on unregistered keys are dead ends. Repeated declarations
/// of the same dependency are followed once.
pub fn detect_cycles(graph: &ContractGraph) -> Vec<Vec<String>> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut cycles = Vec::new();

    fn dfs<'g>(
        graph: &'g ContractGraph,
        key: &'g str,
        visited: &mut HashSet<&'g str>,
        stack: &mut Vec<&'g str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        visited.insert(key);
        stack.push(key);

        if let Some(node) = graph.get(key) {
            let mut followed: HashSet<&str> = HashSet::new();
            for dep in &node.dependencies {
                if !graph.contains(dep) || !followed.insert(dep.as_str()) {
                    continue;
                }
                if let Some(start) = stack.iter().position(|k| *k == dep.as_str()) {
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|k| k.to_string()).collect();
                    cycle.push(dep.clone());
                    cycles.push(cycle);
                } else if !visited.contains(dep.as_str()) {
                    dfs(graph, dep, visited, stack, cycles);
                }
            }
        }

        stack.pop();
    }

    for key in graph.keys() {
        if !visited.contains(key) {
            dfs(graph, key, &mut visited, &mut stack, &mut cycles);
        }
    }

    for cycle in &cycles {
        tracing::warn!(cycle = %cycle.join(" -> "), "dependency cycle detected");
    }
    cycles
}
