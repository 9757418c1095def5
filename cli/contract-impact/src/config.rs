//! `contracts.toml` project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "contracts.toml";

/// The top-level configuration for a contracts project. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractsConfig {
    #[serde(default)]
    pub project: Option<ProjectConfig>,
    #[serde(default)]
    pub impact: ImpactConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

/// Impact gate policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactConfig {
    #[serde(default = "yes")]
    pub fail_on_breaking: bool,
    #[serde(default)]
    pub fail_on_non_breaking: bool,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            fail_on_breaking: true,
            fail_on_non_breaking: false,
        }
    }
}

/// Graph health policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "yes")]
    pub fail_on_cycles: bool,
    #[serde(default)]
    pub fail_on_missing: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            fail_on_cycles: true,
            fail_on_missing: false,
        }
    }
}

fn yes() -> bool {
    true
}

impl ContractsConfig {
    /// Search upward from `start_dir` for a `contracts.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: ContractsConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                tracing::debug!(path = %candidate.display(), "loaded config");
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Like [`find_and_load`](Self::find_and_load), falling back to defaults.
    pub fn load_or_default(start_dir: &Path) -> Result<Self> {
        Ok(Self::find_and_load(start_dir)?
            .map(|(config, _)| config)
            .unwrap_or_default())
    }

    #[cfg(test)]
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing contracts.toml")
    }
}
