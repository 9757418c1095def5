//! Aggregate health report for a contract graph.

use serde::{Deserialize, Serialize};

use crate::cycles::detect_cycles;
use crate::graph::ContractGraph;
use crate::missing::{find_missing_dependencies, MissingDependency};

/// Findings of both detectors plus graph size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphHealth {
    pub nodes: usize,
    pub edges: usize,
    pub cycles: Vec<Vec<String>>,
    pub missing: Vec<MissingDependency>,
}

impl GraphHealth {
    /// No cycles and no unresolved dependencies.
    pub fn is_healthy(&self) -> bool {
        self.cycles.is_empty() && self.missing.is_empty()
    }

    /// Format the findings as a human-readable string.
    pub fn format_text(&self) -> String {
        let mut out = format!("Contracts: {} nodes, {} edges\n", self.nodes, self.edges);

        if !self.cycles.is_empty() {
            out.push_str(&format!("\nCycles ({}):\n", self.cycles.len()));
            for cycle in &self.cycles {
                out.push_str(&format!("  - {}\n", cycle.join(" -> ")));
            }
        }

        if !self.missing.is_empty() {
            out.push_str(&format!("\nMissing dependencies ({}):\n", self.missing.len()));
            for m in &self.missing {
                out.push_str(&format!("  - {} -> {}\n", m.contract, m.missing.join(", ")));
            }
        }

        if self.is_healthy() {
            out.push_str("\nNo cycles or missing dependencies.\n");
        }
        out
    }
}

/// Run both detectors over `graph`.
pub fn check_health(graph: &ContractGraph) -> GraphHealth {
    GraphHealth {
        nodes: graph.len(),
        edges: graph.edge_count(),
        cycles: detect_cycles(graph),
        missing: find_missing_dependencies(graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_graph() {
        let mut g = ContractGraph::new();
        g.add_node("a", "a.ts", vec!["b".into()]).unwrap();
        g.add_node("b", "b.ts", vec![]).unwrap();
        g.build_reverse_edges();

        let health = check_health(&g);
        assert!(health.is_healthy());
        assert_eq!(health.nodes, 2);
        assert_eq!(health.edges, 1);
        assert!(health.format_text().contains("No cycles"));
    }

    #[test]
    fn unhealthy_graph_reports_both_findings() {
        let mut g = ContractGraph::new();
        g.add_node("a", "a.ts", vec!["b".into()]).unwrap();
        g.add_node("b", "b.ts", vec!["a".into(), "ghost".into()]).unwrap();
        g.build_reverse_edges();

        let health = check_health(&g);
        assert!(!health.is_healthy());
        assert_eq!(health.cycles.len(), 1);
        assert_eq!(health.missing.len(), 1);

        let text = health.format_text();
        assert!(text.contains("a -> b -> a"));
        assert!(text.contains("b -> ghost"));
    }
}
