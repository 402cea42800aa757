use lassy_protocol::NodeError;
use lassy_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("malformed tree: {0}")]
    Malformed(#[from] NodeError),

    /// A coindex group must have exactly one member carrying a word or category.
    #[error("coindex group '{index}' needs exactly one content node, found {candidates:?}")]
    AmbiguousCoindex { index: String, candidates: Vec<String> },

    /// The assignment policy met a leaf it cannot handle.
    #[error("cannot assign a type to node '{node}': {reason}")]
    UnknownTraversalMode { node: String, reason: String },

    #[error("type construction failed: {0}")]
    Type(#[from] TypeError),
}
