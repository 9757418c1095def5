//! `contract-impact snapshot` — reduce declared specs to a hashed snapshot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use contract_diff::ContractSnapshot;

use crate::manifest::SpecManifest;

pub fn run(input: &Path, output: &Path) -> Result<()> {
    let manifest = SpecManifest::load(input)?;
    let declared = manifest.declared_specs()?;
    let snapshot = ContractSnapshot::from_declared(&declared)
        .with_context(|| format!("snapshotting {}", input.display()))?;

    fs::write(output, snapshot.to_json()?)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Wrote snapshot of {} spec(s) to {} (hash {})",
        snapshot.specs.len(),
        output.display(),
        snapshot.hash
    );
    Ok(())
}

/// Read a snapshot file, verifying its hash.
pub fn load(path: &Path) -> Result<ContractSnapshot> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ContractSnapshot::from_json(&content).with_context(|| format!("loading {}", path.display()))
}
