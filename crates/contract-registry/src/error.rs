//! Registry error types.

use contract_core::CoreError;

/// Errors that can occur while populating a capability registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The same `key@version` was registered twice.
    #[error("capability '{key}@{version}' already registered")]
    DuplicateCapability { key: String, version: String },

    /// A capability version failed strict semver parsing.
    #[error("capability '{key}': {source}")]
    InvalidVersion {
        key: String,
        #[source]
        source: CoreError,
    },
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
