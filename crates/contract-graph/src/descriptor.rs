//! The descriptor an extractor produces for each spec file.
//!
//! Extraction itself (reading source text, finding the declared name, type
//! and references) happens outside this crate. Only its output contract
//! lives here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use contract_core::SpecType;

/// What the extractor found in one spec file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDescriptor {
    /// Declared key; `None` when the source had no resolvable name.
    #[serde(default)]
    pub key: Option<String>,
    /// Declared spec type.
    #[serde(rename = "type", default = "unknown_type")]
    pub spec_type: SpecType,
    /// Keys of the other specs this one references.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn unknown_type() -> SpecType {
    SpecType::Unknown
}

impl SpecDescriptor {
    pub fn new(spec_type: SpecType) -> Self {
        Self {
            key: None,
            spec_type,
            dependencies: Vec::new(),
        }
    }

    /// Builder: set the declared key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Builder: add a referenced spec key.
    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        self.dependencies.push(key.into());
        self
    }

    /// The declared key, or the slug derived from `path` when none was found.
    pub fn resolved_key(&self, path: &Path) -> String {
        match &self.key {
            Some(key) if !key.trim().is_empty() => key.clone(),
            _ => slug_from_path(path),
        }
    }
}

/// Turns raw spec source into a [`SpecDescriptor`].
pub trait DescriptorExtractor {
    fn extract(&self, source: &str, path: &Path) -> SpecDescriptor;
}

/// Derive a fallback key from a spec file path.
///
/// Takes the file name, drops its final extension, strips one trailing
/// spec-type suffix, and replaces whitespace with `-`:
/// `orders/create.operation.ts` becomes `create`.
pub fn slug_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[..idx].to_string(),
        _ => file_name,
    };

    for suffix in SpecType::known_suffixes() {
        if let Some(stripped) = stem.strip_suffix(suffix) {
            if !stripped.is_empty() {
                stem = stripped.to_string();
                break;
            }
        }
    }

    stem.split_whitespace().collect::<Vec<_>>().join("-")
}
