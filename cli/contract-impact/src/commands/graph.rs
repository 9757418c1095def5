//! `contract-impact graph` — build the dependency graph and check its health.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use contract_graph::{check_health, to_dot};

use crate::commands::OutputFormat;
use crate::config::GraphConfig;
use crate::manifest::SpecManifest;

pub fn run(
    input: &Path,
    dot: Option<&Path>,
    format: OutputFormat,
    policy: GraphConfig,
) -> Result<()> {
    let manifest = SpecManifest::load(input)?;
    let graph = manifest.graph()?;
    let health = check_health(&graph);

    if let Some(dot_path) = dot {
        fs::write(dot_path, to_dot(&graph))
            .with_context(|| format!("writing {}", dot_path.display()))?;
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "graph": graph,
                "health": health,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Human => {
            print!("{}", health.format_text());
            if let Some(dot_path) = dot {
                println!("\nWrote {}", dot_path.display());
            }
        }
    }

    if policy.fail_on_cycles && !health.cycles.is_empty() {
        bail!("{} dependency cycle(s) detected", health.cycles.len());
    }
    if policy.fail_on_missing && !health.missing.is_empty() {
        bail!(
            "{} spec(s) reference missing dependencies",
            health.missing.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, json: &str) -> std::path::PathBuf {
        let path = dir.join("manifest.json");
        fs::write(&path, json).unwrap();
        path
    }

    const CYCLIC: &str = r#"{"specs":[
        {"path":"a.operation.ts","key":"a","type":"operation","dependencies":["b"]},
        {"path":"b.operation.ts","key":"b","type":"operation","dependencies":["a"]}
    ]}"#;

    const DANGLING: &str = r#"{"specs":[
        {"path":"a.operation.ts","key":"a","type":"operation","dependencies":["ghost"]}
    ]}"#;

    #[test]
    fn cycles_fail_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manifest(dir.path(), CYCLIC);
        let err = run(&input, None, OutputFormat::Human, GraphConfig::default()).unwrap_err();
        assert!(err.to_string().contains("cycle"));

        let lenient = GraphConfig {
            fail_on_cycles: false,
            fail_on_missing: false,
        };
        run(&input, None, OutputFormat::Json, lenient).unwrap();
    }

    #[test]
    fn missing_passes_unless_configured() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manifest(dir.path(), DANGLING);
        run(&input, None, OutputFormat::Human, GraphConfig::default()).unwrap();

        let strict = GraphConfig {
            fail_on_cycles: true,
            fail_on_missing: true,
        };
        assert!(run(&input, None, OutputFormat::Human, strict).is_err());
    }

    #[test]
    fn writes_dot_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manifest(dir.path(), DANGLING);
        let dot = dir.path().join("graph.dot");
        run(&input, Some(&dot), OutputFormat::Human, GraphConfig::default()).unwrap();

        let text = fs::read_to_string(&dot).unwrap();
        assert!(text.starts_with("digraph contracts {"));
        assert!(text.contains("\"a\" -> \"ghost\";"));
    }
}
