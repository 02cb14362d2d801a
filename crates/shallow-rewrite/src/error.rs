//! Error types for the checked rewriting entry points

use shallow_aig::{AigError, AigNodeId};
use thiserror::Error;

use crate::passes::algebraic::Rule;

/// Result type for rewriting operations
pub type Result<T> = std::result::Result<T, RewriteError>;

/// Failures reported by [`crate::try_aig_algebraic_rewriting`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// The input graph failed validation before any rewrite ran
    #[error("input network is invalid: {0}")]
    InvalidNetwork(#[source] AigError),

    /// A rewrite left the graph structurally inconsistent
    #[error("{rule} at {node} corrupted the network: {source}")]
    Corrupted {
        rule: Rule,
        node: AigNodeId,
        #[source]
        source: AigError,
    },

    /// A rewrite changed the function of an output
    #[error("{rule} at {node} changed the function of output '{output}'")]
    FunctionChanged {
        rule: Rule,
        node: AigNodeId,
        output: String,
    },

    /// The network came out deeper than it went in
    #[error("depth increased from {before} to {after}")]
    DepthIncreased { before: u32, after: u32 },
}
