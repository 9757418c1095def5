//! The kinds of contract specification the engine understands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a contract spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecType {
    /// A command or query with an input/output shape.
    Operation,
    /// A published domain event.
    Event,
    /// A renderable view of data.
    Presentation,
    /// A bundle of related specs.
    Feature,
    /// A capability offered to other specs.
    Capability,
    DataView,
    Form,
    Workflow,
    Migration,
    Telemetry,
    Experiment,
    AppConfig,
    Integration,
    Knowledge,
    Theme,
    /// The extractor could not determine the type.
    #[serde(other)]
    Unknown,
}

impl SpecType {
    /// All known types, in declaration order.
    pub const ALL: [SpecType; 16] = [
        SpecType::Operation,
        SpecType::Event,
        SpecType::Presentation,
        SpecType::Feature,
        SpecType::Capability,
        SpecType::DataView,
        SpecType::Form,
        SpecType::Workflow,
        SpecType::Migration,
        SpecType::Telemetry,
        SpecType::Experiment,
        SpecType::AppConfig,
        SpecType::Integration,
        SpecType::Knowledge,
        SpecType::Theme,
        SpecType::Unknown,
    ];

    /// The wire name of this type (`data-view`, `operation`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecType::Operation => "operation",
            SpecType::Event => "event",
            SpecType::Presentation => "presentation",
            SpecType::Feature => "feature",
            SpecType::Capability => "capability",
            SpecType::DataView => "data-view",
            SpecType::Form => "form",
            SpecType::Workflow => "workflow",
            SpecType::Migration => "migration",
            SpecType::Telemetry => "telemetry",
            SpecType::Experiment => "experiment",
            SpecType::AppConfig => "app-config",
            SpecType::Integration => "integration",
            SpecType::Knowledge => "knowledge",
            SpecType::Theme => "theme",
            SpecType::Unknown => "unknown",
        }
    }

    /// The file-name suffix conventionally used for this type, e.g.
    /// `.operation` in `create.operation.ts`.
    pub fn file_suffix(&self) -> Option<&'static str> {
        let suffix = match self {
            SpecType::Operation => ".operation",
            SpecType::Event => ".event",
            SpecType::Presentation => ".presentation",
            SpecType::Feature => ".feature",
            SpecType::Capability => ".capability",
            SpecType::DataView => ".data-view",
            SpecType::Form => ".form",
            SpecType::Workflow => ".workflow",
            SpecType::Migration => ".migration",
            SpecType::Telemetry => ".telemetry",
            SpecType::Experiment => ".experiment",
            SpecType::AppConfig => ".app-config",
            SpecType::Integration => ".integration",
            SpecType::Knowledge => ".knowledge",
            SpecType::Theme => ".theme",
            SpecType::Unknown => return None,
        };
        Some(suffix)
    }

    /// Every suffix the path-slug fallback strips, including the generic
    /// `.contracts` and `.spec` suffixes that carry no type.
    pub fn known_suffixes() -> Vec<&'static str> {
        let mut suffixes: Vec<&'static str> =
            Self::ALL.iter().filter_map(|t| t.file_suffix()).collect();
        suffixes.push(".contracts");
        suffixes.push(".spec");
        suffixes
    }

    /// Parse a wire name; unrecognised names map to [`SpecType::Unknown`].
    pub fn from_name(name: &str) -> SpecType {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .unwrap_or(SpecType::Unknown)
    }
}

impl fmt::Display for SpecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
