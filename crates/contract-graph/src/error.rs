//! Error types for graph construction.

/// Errors from building the contract graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two specs claim the same logical key.
    #[error("duplicate contract node '{0}': two specs claim the same key")]
    DuplicateNode(String),
}
