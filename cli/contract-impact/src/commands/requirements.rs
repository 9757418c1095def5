//! `contract-impact requirements` — check capability requirements.

use std::path::Path;

use anyhow::{bail, Result};
use contract_registry::unsatisfied_requirements;
use serde::Serialize;

use crate::commands::OutputFormat;
use crate::manifest::SpecManifest;

/// Unmet requirements of one spec.
#[derive(Debug, Serialize)]
pub struct UnmetRequirements {
    pub spec: String,
    pub missing: Vec<String>,
}

pub fn check(manifest: &SpecManifest) -> Result<Vec<UnmetRequirements>> {
    let registry = manifest.registry()?;
    let mut out = Vec::new();
    for spec in &manifest.specs {
        let missing = unsatisfied_requirements(&spec.requires, &spec.provides, &registry);
        if !missing.is_empty() {
            out.push(UnmetRequirements {
                spec: spec.resolved_key(),
                missing: missing.iter().map(|r| r.to_string()).collect(),
            });
        }
    }
    Ok(out)
}

pub fn run(input: &Path, format: OutputFormat) -> Result<()> {
    let manifest = SpecManifest::load(input)?;
    let unmet = check(&manifest)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&unmet)?),
        OutputFormat::Human => {
            if unmet.is_empty() {
                println!(
                    "All capability requirements satisfied ({} spec(s), {} capabilities)",
                    manifest.specs.len(),
                    manifest.capabilities.len()
                );
            } else {
                println!("Unsatisfied requirements:");
                for entry in &unmet {
                    println!("  - {}: {}", entry.spec, entry.missing.join(", "));
                }
            }
        }
    }

    if !unmet.is_empty() {
        bail!("{} spec(s) have unsatisfied requirements", unmet.len());
    }
    Ok(())
}
