//! Error types for AIG construction, validation and simulation

use crate::aig::AigNodeId;
use thiserror::Error;

/// Result type for AIG operations
pub type Result<T> = std::result::Result<T, AigError>;

/// Structural problems detected in an AIG
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AigError {
    /// A gate reads a node that was reclaimed or never existed
    #[error("gate {gate} reads missing node {fanin}")]
    MissingFanin { gate: AigNodeId, fanin: AigNodeId },

    /// An output reads a node that was reclaimed or never existed
    #[error("output '{name}' reads missing node {node}")]
    MissingOutput { name: String, node: AigNodeId },

    /// The graph is not acyclic
    #[error("combinational cycle through node {0}")]
    Cycle(AigNodeId),

    /// Fanins are not in canonical order or fold to a constant or a wire
    #[error("gate {0} is not in canonical form")]
    NotCanonical(AigNodeId),

    /// The structural hash table disagrees with the node arena
    #[error("structural hash entry for gate {0} is missing or stale")]
    Strash(AigNodeId),

    /// Two live gates have identical fanins
    #[error("gates {0} and {1} are structurally identical")]
    Duplicate(AigNodeId, AigNodeId),

    /// Stored reference count differs from the recomputed one
    #[error("node {node} has reference count {stored}, expected {actual}")]
    RefCount {
        node: AigNodeId,
        stored: u32,
        actual: u32,
    },

    /// Fanout index of a node is inconsistent with the gates reading it
    #[error("fanout index of node {0} is inconsistent")]
    FanoutIndex(AigNodeId),

    /// Exhaustive simulation would need too many rows
    #[error("cannot enumerate {inputs} inputs exhaustively (limit is {max})")]
    TooManyInputs { inputs: usize, max: usize },

    /// Pattern count does not match the number of primary inputs
    #[error("expected patterns for {expected} inputs, got {actual}")]
    PatternArity { expected: usize, actual: usize },
}
