//! Versioned spec keys (`name@version`).
//!
//! The dependency graph tracks logical specs by bare name, while snapshots
//! and capabilities are matched by the composite `name@version` key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A spec identity pinned to one version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpecKey {
    pub name: String,
    pub version: String,
}

impl SpecKey {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for SpecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

impl FromStr for SpecKey {
    type Err = CoreError;

    /// Splits on the last `@` so scoped names such as `@acme/orders@1.0.0`
    /// keep their leading `@`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rfind('@') {
            Some(idx) if idx > 0 && idx + 1 < s.len() => {
                Ok(SpecKey::new(&s[..idx], &s[idx + 1..]))
            }
            _ => Err(CoreError::InvalidSpecKey(s.to_string())),
        }
    }
}
