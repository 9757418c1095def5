//! CLI command implementations.

pub mod graph;
pub mod impact;
pub mod requirements;
pub mod snapshot;

use anyhow::{bail, Result};

/// Report format shared by every command that prints a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub fn resolve_format(name: Option<&str>) -> Result<OutputFormat> {
    match name {
        Some("human") | None => Ok(OutputFormat::Human),
        Some("json") => Ok(OutputFormat::Json),
        Some(other) => bail!("unknown format: '{other}'. Choose: human, json"),
    }
}
