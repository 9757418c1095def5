//! `contract-impact impact` — compare two snapshots and gate on the verdict.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Result};
use contract_core::SpecKey;
use contract_diff::ImpactResult;
use contract_graph::ContractGraph;

use crate::commands::{snapshot, OutputFormat};
use crate::config::ImpactConfig;
use crate::manifest::SpecManifest;

pub fn run(
    baseline: &Path,
    head: &Path,
    format: OutputFormat,
    policy: ImpactConfig,
    manifest: Option<&Path>,
) -> Result<()> {
    let baseline = snapshot::load(baseline)?;
    let head = snapshot::load(head)?;
    let result = baseline.compare(&head)?;

    let affected = match manifest {
        Some(path) => affected_dependents(&result, &SpecManifest::load(path)?.graph()?),
        None => BTreeMap::new(),
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "impact": result,
                "affected": affected,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Human => {
            print!("{}", result.format_text());
            if !affected.is_empty() {
                println!("\nAffected dependents:");
                for (spec, dependents) in &affected {
                    let list = if dependents.is_empty() {
                        "(none)".to_string()
                    } else {
                        dependents.join(", ")
                    };
                    println!("  - {spec}: {list}");
                }
            }
        }
    }

    if result.should_fail(policy.fail_on_breaking, policy.fail_on_non_breaking) {
        bail!(
            "impact gate failed: {} ({} breaking, {} non-breaking)",
            result.status,
            result.summary.breaking,
            result.summary.non_breaking
        );
    }
    Ok(())
}

/// Every spec transitively depending on a spec with breaking changes, keyed
/// by the breaking spec's name. Graph keys are unversioned.
fn affected_dependents(
    result: &ImpactResult,
    graph: &ContractGraph,
) -> BTreeMap<String, Vec<String>> {
    let mut affected = BTreeMap::new();
    for key in result.breaking_specs() {
        let name = key
            .parse::<SpecKey>()
            .map(|k| k.name)
            .unwrap_or_else(|_| key.to_string());
        let dependents = graph.transitive_dependents(&name);
        affected.insert(name, dependents);
    }
    affected
}
