//! Network capability traits
//!
//! Rewriting algorithms are written against these traits rather than against
//! [`Aig`] directly. [`Network`] is the structural interface every logic
//! network offers; [`Leveled`] adds level and critical-path queries and is
//! only implemented by views that keep those values up to date, so an
//! algorithm that needs depth information states it as a trait bound and is
//! rejected at compile time when handed a plain network.

use crate::aig::{Aig, AigLit, AigNodeId};
use crate::topo;

/// Structural queries and mutations of a logic network
pub trait Network {
    /// All gate nodes in topological order
    fn gates(&self) -> Vec<AigNodeId>;

    /// The two fanins of a gate, or `None` for inputs and the constant
    fn fanins(&self, node: AigNodeId) -> Option<[AigLit; 2]>;

    /// Whether a node is a primary input
    fn is_pi(&self, node: AigNodeId) -> bool;

    /// Whether a node natively computes an OR
    ///
    /// A network returning `true` for `node` promises that the node's value
    /// is `!(a & b)` over its fanin literals `a` and `b`, that is `!a | !b`.
    /// Rewrites pick their replacement polarity from this answer, so a wrong
    /// `true` changes the function. AIG nodes are always ANDs; an OR is an
    /// AND read through inverted edges, which is a property of the edge and
    /// not of the node.
    fn is_or(&self, _node: AigNodeId) -> bool {
        false
    }

    /// Structurally hashed AND
    fn create_and(&mut self, a: AigLit, b: AigLit) -> AigLit;

    /// OR through De Morgan: a | b = !(!a & !b)
    fn create_or(&mut self, a: AigLit, b: AigLit) -> AigLit {
        self.create_and(!a, !b).invert()
    }

    /// NAND: !(a & b)
    fn create_nand(&mut self, a: AigLit, b: AigLit) -> AigLit {
        self.create_and(a, b).invert()
    }

    /// Complemented edge; never allocates
    fn create_not(&self, a: AigLit) -> AigLit {
        a.invert()
    }

    /// Redirect every use of `old` to `new` and reclaim dead logic
    fn substitute_node(&mut self, old: AigNodeId, new: AigLit);
}

/// Networks that expose node levels and the critical path
pub trait Leveled: Network {
    /// Longest distance from the inputs, in gate layers
    fn level(&self, node: AigNodeId) -> u32;

    /// Largest level over all primary outputs
    fn depth(&self) -> u32;

    /// Whether the node lies on at least one path of length [`Leveled::depth`]
    fn is_on_critical_path(&self, node: AigNodeId) -> bool;

    /// Recompute levels and critical-path flags for the whole network
    fn update_levels(&mut self);
}

impl Network for Aig {
    fn gates(&self) -> Vec<AigNodeId> {
        topo::topological_gates(self)
    }

    fn fanins(&self, node: AigNodeId) -> Option<[AigLit; 2]> {
        self.and_fanins(node).map(|(left, right)| [left, right])
    }

    fn is_pi(&self, node: AigNodeId) -> bool {
        self.is_input(node)
    }

    fn create_and(&mut self, a: AigLit, b: AigLit) -> AigLit {
        self.add_and(a, b)
    }

    fn substitute_node(&mut self, old: AigNodeId, new: AigLit) {
        Aig::substitute_node(self, old, new)
    }
}
