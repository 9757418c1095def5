//! Error types shared by the core utilities.

/// Errors from key parsing and version handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A version string failed strict semver parsing.
    #[error("invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// Bumping a version component would exceed `u64::MAX`.
    #[error("cannot bump version '{input}': {component} component overflows")]
    VersionOverflow {
        input: String,
        component: &'static str,
    },

    /// A versioned key was not of the form `name@version`.
    #[error("invalid spec key '{0}': expected name@version")]
    InvalidSpecKey(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
