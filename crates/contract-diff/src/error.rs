//! Error types for snapshot generation and impact classification.

use contract_core::CoreError;

/// Errors from building or loading snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid schema at {path}: {detail}")]
    InvalidSchema { path: String, detail: String },

    #[error("duplicate spec '{0}' in snapshot")]
    DuplicateSpec(String),

    #[error("snapshot hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("unsupported snapshot format version {0}")]
    UnsupportedFormat(u32),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from impact classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// One side of the comparison lists the same `name@version` twice.
    #[error("duplicate spec '{key}' in {side} specs")]
    DuplicateSpec { key: String, side: &'static str },

    /// A changed spec carries a version that cannot be bumped.
    #[error("cannot suggest a version for '{spec_key}': {source}")]
    InvalidVersion {
        spec_key: String,
        #[source]
        source: CoreError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SnapshotError::InvalidSchema {
            path: "$.email".into(),
            detail: "expected object".into(),
        };
        assert!(err.to_string().contains("$.email"));

        let err = DiffError::InvalidVersion {
            spec_key: "order.create@one".into(),
            source: CoreError::InvalidVersion {
                input: "one".into(),
                reason: "unexpected character".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("order.create@one"));
        assert!(msg.contains("invalid version 'one'"));
    }

    #[test]
    fn error_variants() {
        let _ = SnapshotError::DuplicateSpec("a@1.0.0".into());
        let _ = SnapshotError::UnsupportedFormat(2);
        let _ = DiffError::DuplicateSpec {
            key: "a@1.0.0".into(),
            side: "head",
        };
    }
}
