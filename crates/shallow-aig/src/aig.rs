//! And-Inverter Graph (AIG) Data Structure
//!
//! AIGs represent Boolean functions using only AND gates and inverters.
//! Inversion lives on the edges ([`AigLit`]), never on the nodes, and every
//! AND gate is structurally hashed so that two requests for the same gate
//! return the same node.
//!
//! Besides construction, the graph supports in-place substitution: every
//! consumer of a node can be redirected to another literal, rewired gates are
//! re-hashed (merging newly identical gates and folding trivial ones) and
//! nodes whose reference count drops to zero are reclaimed.

use crate::error::{AigError, Result};
use crate::topo;
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

/// Unique identifier for an AIG node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AigNodeId(pub u32);

impl AigNodeId {
    /// The constant false node
    pub const FALSE: AigNodeId = AigNodeId(0);

    /// Position of this node in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AigNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A literal in the AIG (node reference with optional inversion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AigLit {
    /// The referenced node
    pub node: AigNodeId,
    /// Whether this reference is inverted
    pub inverted: bool,
}

impl AigLit {
    /// Create a new positive literal
    pub fn new(node: AigNodeId) -> Self {
        Self {
            node,
            inverted: false,
        }
    }

    /// Create a new negative (inverted) literal
    pub fn not(node: AigNodeId) -> Self {
        Self {
            node,
            inverted: true,
        }
    }

    /// Create the constant false literal
    pub fn false_lit() -> Self {
        Self::new(AigNodeId::FALSE)
    }

    /// Create the constant true literal
    pub fn true_lit() -> Self {
        Self::not(AigNodeId::FALSE)
    }

    /// Invert this literal
    pub fn invert(self) -> Self {
        Self {
            node: self.node,
            inverted: !self.inverted,
        }
    }

    /// Invert this literal when `flag` is set
    pub fn invert_if(self, flag: bool) -> Self {
        if flag {
            self.invert()
        } else {
            self
        }
    }

    /// Check if this is a constant
    pub fn is_const(&self) -> bool {
        self.node == AigNodeId::FALSE
    }

    /// Get constant value if this is a constant literal
    pub fn const_value(&self) -> Option<bool> {
        if self.is_const() {
            Some(self.inverted)
        } else {
            None
        }
    }
}

impl std::ops::Not for AigLit {
    type Output = AigLit;

    fn not(self) -> AigLit {
        self.invert()
    }
}

impl std::fmt::Display for AigLit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.inverted {
            write!(f, "!{}", self.node)
        } else {
            write!(f, "{}", self.node)
        }
    }
}

/// An AIG node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AigNode {
    /// Constant false (node 0)
    Const,

    /// Primary input
    Input {
        /// Input name
        name: String,
    },

    /// AND gate with two inputs
    And {
        /// Left input (never references a higher node id than `right`)
        left: AigLit,
        /// Right input
        right: AigLit,
    },
}

impl AigNode {
    /// Check if this is an AND node
    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And { .. })
    }

    /// Check if this is an input node
    pub fn is_input(&self) -> bool {
        matches!(self, AigNode::Input { .. })
    }

    /// Check if this is the constant node
    pub fn is_const(&self) -> bool {
        matches!(self, AigNode::Const)
    }
}

/// Put an AND's fanins in canonical order (smaller node id first)
fn normalize(left: AigLit, right: AigLit) -> (AigLit, AigLit) {
    if left.node.0 > right.node.0 {
        (right, left)
    } else {
        (left, right)
    }
}

/// Fold an AND of canonically ordered fanins that needs no gate
fn fold_trivial(left: AigLit, right: AigLit) -> Option<AigLit> {
    // The constant has the smallest id, so it can only appear on the left
    match left.const_value() {
        // a & 0 = 0
        Some(false) => return Some(AigLit::false_lit()),
        // a & 1 = a
        Some(true) => return Some(right),
        None => {}
    }
    // a & a = a
    if left == right {
        return Some(left);
    }
    // a & !a = 0
    if left.node == right.node {
        return Some(AigLit::false_lit());
    }
    None
}

/// And-Inverter Graph
#[derive(Debug, Clone)]
pub struct Aig {
    /// Design name
    pub name: String,

    /// All nodes (index 0 is always the constant false node)
    nodes: Vec<AigNode>,

    /// Reclaimed arena slots; ids are never reused
    removed: Vec<bool>,

    /// Primary outputs as (name, literal) pairs
    outputs: Vec<(String, AigLit)>,

    /// Structural hash for AND nodes: (left, right) -> node_id
    strash_map: HashMap<(AigLit, AigLit), AigNodeId>,

    /// Gates reading each node
    fanouts: Vec<Vec<AigNodeId>>,

    /// References from live gates and outputs
    refs: Vec<u32>,
}

impl Aig {
    /// Create a new empty AIG
    pub fn new(name: String) -> Self {
        let mut aig = Self {
            name,
            nodes: Vec::new(),
            removed: Vec::new(),
            outputs: Vec::new(),
            strash_map: HashMap::new(),
            fanouts: Vec::new(),
            refs: Vec::new(),
        };

        // Node 0 is always constant false
        aig.push_node(AigNode::Const);

        aig
    }

    fn push_node(&mut self, node: AigNode) -> AigNodeId {
        let id = AigNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.removed.push(false);
        self.fanouts.push(Vec::new());
        self.refs.push(0);
        id
    }

    /// Get the number of live nodes (including the constant)
    pub fn node_count(&self) -> usize {
        self.removed.iter().filter(|r| !**r).count()
    }

    /// Size of the node arena, reclaimed slots included
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of live AND nodes
    pub fn and_count(&self) -> usize {
        self.iter_nodes().filter(|(_, n)| n.is_and()).count()
    }

    /// Get the number of input nodes
    pub fn input_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_input()).count()
    }

    /// Get the number of outputs
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Check whether a node exists and has not been reclaimed
    pub fn is_live(&self, id: AigNodeId) -> bool {
        self.removed.get(id.index()).is_some_and(|r| !*r)
    }

    /// Get a live node by ID
    pub fn get_node(&self, id: AigNodeId) -> Option<&AigNode> {
        if self.is_live(id) {
            self.nodes.get(id.index())
        } else {
            None
        }
    }

    /// Check if a node is a primary input
    pub fn is_input(&self, id: AigNodeId) -> bool {
        self.get_node(id).is_some_and(AigNode::is_input)
    }

    /// Check if a node is a live AND gate
    pub fn is_and(&self, id: AigNodeId) -> bool {
        self.get_node(id).is_some_and(AigNode::is_and)
    }

    /// Fanins of a live AND gate
    pub fn and_fanins(&self, id: AigNodeId) -> Option<(AigLit, AigLit)> {
        match self.get_node(id)? {
            AigNode::And { left, right } => Some((*left, *right)),
            _ => None,
        }
    }

    /// Get all outputs
    pub fn outputs(&self) -> &[(String, AigLit)] {
        &self.outputs
    }

    /// Number of gate and output references to a node
    pub fn fanout_count(&self, id: AigNodeId) -> u32 {
        self.refs.get(id.index()).copied().unwrap_or(0)
    }

    /// Gates reading a node
    pub fn fanouts(&self, id: AigNodeId) -> &[AigNodeId] {
        self.fanouts
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over all live nodes in id order
    pub fn iter_nodes(&self) -> impl Iterator<Item = (AigNodeId, &AigNode)> {
        self.nodes
            .iter()
            .zip(&self.removed)
            .enumerate()
            .filter(|(_, (_, removed))| !**removed)
            .map(|(i, (n, _))| (AigNodeId(i as u32), n))
    }

    /// Iterate over all live AND nodes in id order
    pub fn iter_and_nodes(&self) -> impl Iterator<Item = (AigNodeId, AigLit, AigLit)> + '_ {
        self.iter_nodes().filter_map(|(id, n)| match n {
            AigNode::And { left, right } => Some((id, *left, *right)),
            _ => None,
        })
    }

    /// Iterate over all input nodes in creation order
    pub fn iter_inputs(&self) -> impl Iterator<Item = (AigNodeId, &str)> + '_ {
        self.iter_nodes().filter_map(|(id, n)| match n {
            AigNode::Input { name } => Some((id, name.as_str())),
            _ => None,
        })
    }

    /// Add a primary input
    pub fn add_input(&mut self, name: String) -> AigNodeId {
        self.push_node(AigNode::Input { name })
    }

    /// Add an AND gate with structural hashing
    pub fn add_and(&mut self, left: AigLit, right: AigLit) -> AigLit {
        debug_assert!(self.is_live(left.node), "fanin {left} is not live");
        debug_assert!(self.is_live(right.node), "fanin {right} is not live");

        let (left, right) = normalize(left, right);
        if let Some(lit) = fold_trivial(left, right) {
            return lit;
        }

        // Check strash map
        let key = (left, right);
        if let Some(&existing) = self.strash_map.get(&key) {
            return AigLit::new(existing);
        }

        // Create new AND node
        let id = self.push_node(AigNode::And { left, right });
        self.attach(left.node, id);
        self.attach(right.node, id);
        self.strash_map.insert(key, id);
        AigLit::new(id)
    }

    /// Build an OR gate: a | b = !(!a & !b)
    pub fn add_or(&mut self, left: AigLit, right: AigLit) -> AigLit {
        let nand = self.add_and(left.invert(), right.invert());
        nand.invert()
    }

    /// Build a NAND gate: !(a & b)
    pub fn add_nand(&mut self, left: AigLit, right: AigLit) -> AigLit {
        self.add_and(left, right).invert()
    }

    /// Build an XOR gate: a ^ b = (a & !b) | (!a & b)
    pub fn add_xor(&mut self, left: AigLit, right: AigLit) -> AigLit {
        let and1 = self.add_and(left, right.invert());
        let and2 = self.add_and(left.invert(), right);
        self.add_or(and1, and2)
    }

    /// Build a MUX: sel ? then : else = (sel & then) | (!sel & else)
    pub fn add_mux(&mut self, sel: AigLit, then_lit: AigLit, else_lit: AigLit) -> AigLit {
        let sel_then = self.add_and(sel, then_lit);
        let not_sel_else = self.add_and(sel.invert(), else_lit);
        self.add_or(sel_then, not_sel_else)
    }

    /// Add a primary output
    pub fn add_output(&mut self, name: String, lit: AigLit) {
        debug_assert!(self.is_live(lit.node), "output {name} reads dead node");
        self.refs[lit.node.index()] += 1;
        self.outputs.push((name, lit));
    }

    fn attach(&mut self, fanin: AigNodeId, gate: AigNodeId) {
        self.fanouts[fanin.index()].push(gate);
        self.refs[fanin.index()] += 1;
    }

    fn detach(&mut self, fanin: AigNodeId, gate: AigNodeId) {
        let fanouts = &mut self.fanouts[fanin.index()];
        if let Some(pos) = fanouts.iter().position(|g| *g == gate) {
            fanouts.swap_remove(pos);
        }
        self.refs[fanin.index()] -= 1;
    }

    /// Hold an extra reference so `lit` survives while a substitution is pending
    fn pin(&mut self, lit: AigLit) -> AigLit {
        self.refs[lit.node.index()] += 1;
        lit
    }

    fn unpin(&mut self, lit: AigLit) {
        let refs = &mut self.refs[lit.node.index()];
        *refs -= 1;
        if *refs == 0 {
            self.take_out_node(lit.node);
        }
    }

    /// Replace every use of `old` by `new`, then reclaim dead logic.
    ///
    /// Gates reading `old` are rewired in place. When a rewired gate becomes
    /// trivial or structurally identical to an existing gate, that gate is
    /// itself substituted, so the graph stays fully hashed. Nodes whose
    /// reference count drops to zero are reclaimed, including `new` if no
    /// consumer ends up reading it.
    pub fn substitute_node(&mut self, old: AigNodeId, new: AigLit) {
        debug_assert!(self.is_live(new.node), "replacement {new} is not live");

        let mut pending = vec![(old, self.pin(new))];
        while let Some((old, new)) = pending.pop() {
            if self.is_live(old) && old != new.node {
                self.redirect(old, new, &mut pending);
                if self.refs[old.index()] == 0 {
                    self.take_out_node(old);
                }
            }
            self.unpin(new);
        }
    }

    fn redirect(&mut self, old: AigNodeId, new: AigLit, pending: &mut Vec<(AigNodeId, AigLit)>) {
        for i in 0..self.outputs.len() {
            let lit = self.outputs[i].1;
            if lit.node == old {
                self.outputs[i].1 = new.invert_if(lit.inverted);
                self.refs[old.index()] -= 1;
                self.refs[new.node.index()] += 1;
            }
        }

        let consumers = self.fanouts[old.index()].clone();
        for gate in consumers {
            let Some((left, right)) = self.and_fanins(gate) else {
                continue;
            };
            let rewire = |lit: AigLit| {
                if lit.node == old {
                    new.invert_if(lit.inverted)
                } else {
                    lit
                }
            };
            let (l, r) = normalize(rewire(left), rewire(right));

            if let Some(lit) = fold_trivial(l, r) {
                trace!("[SUBST] {} folds to {}", gate, lit);
                let lit = self.pin(lit);
                pending.push((gate, lit));
                continue;
            }
            if let Some(&existing) = self.strash_map.get(&(l, r)) {
                if existing != gate {
                    trace!("[SUBST] {} merges into {}", gate, existing);
                    let lit = self.pin(AigLit::new(existing));
                    pending.push((gate, lit));
                    continue;
                }
            }

            if self.strash_map.get(&(left, right)) == Some(&gate) {
                self.strash_map.remove(&(left, right));
            }
            self.nodes[gate.index()] = AigNode::And { left: l, right: r };
            self.strash_map.insert((l, r), gate);
            self.detach(old, gate);
            self.attach(new.node, gate);
        }
    }

    /// Reclaim a node and, recursively, every gate only it kept alive
    fn take_out_node(&mut self, id: AigNodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some((left, right)) = self.and_fanins(id) else {
                // Inputs and the constant are never reclaimed
                continue;
            };
            if self.refs[id.index()] != 0 {
                continue;
            }

            if self.strash_map.get(&(left, right)) == Some(&id) {
                self.strash_map.remove(&(left, right));
            }
            self.removed[id.index()] = true;
            self.fanouts[id.index()].clear();

            for fanin in [left.node, right.node] {
                self.detach(fanin, id);
                if self.refs[fanin.index()] == 0 {
                    stack.push(fanin);
                }
            }
        }
    }

    /// Compute AIG statistics
    pub fn compute_stats(&self) -> AigStats {
        let levels = topo::compute_levels(self);
        let max_level = topo::output_depth(self, &levels);

        let mut max_fanout = 0;
        let mut total_fanout = 0u64;
        let mut counted = 0usize;
        for (id, node) in self.iter_nodes() {
            if node.is_const() {
                continue;
            }
            let refs = self.refs[id.index()];
            max_fanout = max_fanout.max(refs);
            total_fanout += refs as u64;
            counted += 1;
        }
        let avg_fanout = if counted > 0 {
            total_fanout as f64 / counted as f64
        } else {
            0.0
        };

        AigStats {
            node_count: self.node_count(),
            and_count: self.and_count(),
            input_count: self.input_count(),
            output_count: self.output_count(),
            max_level,
            max_fanout,
            avg_fanout,
        }
    }

    /// Validate every structural invariant of the graph
    ///
    /// Checks that gates and outputs only read live nodes, gates are in
    /// canonical form and registered in the structural hash, no two gates are
    /// identical, reference counts and fanout lists match the edges, and the
    /// graph is acyclic.
    pub fn check(&self) -> Result<()> {
        let mut actual_refs = vec![0u32; self.nodes.len()];
        let mut actual_fanouts: Vec<Vec<AigNodeId>> = vec![Vec::new(); self.nodes.len()];
        let mut seen: HashMap<(AigLit, AigLit), AigNodeId> = HashMap::new();

        for (id, left, right) in self.iter_and_nodes() {
            for fanin in [left, right] {
                if !self.is_live(fanin.node) {
                    return Err(AigError::MissingFanin {
                        gate: id,
                        fanin: fanin.node,
                    });
                }
                actual_refs[fanin.node.index()] += 1;
                actual_fanouts[fanin.node.index()].push(id);
            }
            if normalize(left, right) != (left, right) || fold_trivial(left, right).is_some() {
                return Err(AigError::NotCanonical(id));
            }
            if self.strash_map.get(&(left, right)) != Some(&id) {
                return Err(AigError::Strash(id));
            }
            if let Some(other) = seen.insert((left, right), id) {
                return Err(AigError::Duplicate(other, id));
            }
        }
        if let Some((_, &stale)) = self.strash_map.iter().find(|(k, _)| !seen.contains_key(*k)) {
            return Err(AigError::Strash(stale));
        }

        for (name, lit) in &self.outputs {
            if !self.is_live(lit.node) {
                return Err(AigError::MissingOutput {
                    name: name.clone(),
                    node: lit.node,
                });
            }
            actual_refs[lit.node.index()] += 1;
        }

        for (id, _) in self.iter_nodes() {
            let stored = self.refs[id.index()];
            let actual = actual_refs[id.index()];
            if stored != actual {
                return Err(AigError::RefCount {
                    node: id,
                    stored,
                    actual,
                });
            }
            let mut stored_fanouts = self.fanouts[id.index()].clone();
            stored_fanouts.sort();
            actual_fanouts[id.index()].sort();
            if stored_fanouts != actual_fanouts[id.index()] {
                return Err(AigError::FanoutIndex(id));
            }
        }

        if let Some(node) = topo::find_cycle(self) {
            return Err(AigError::Cycle(node));
        }
        Ok(())
    }
}

/// Statistics for an AIG
#[derive(Debug, Clone, Default, Serialize)]
pub struct AigStats {
    /// Live nodes (including const)
    pub node_count: usize,
    /// Number of AND nodes
    pub and_count: usize,
    /// Number of input nodes
    pub input_count: usize,
    /// Number of output nodes
    pub output_count: usize,
    /// Maximum output level (depth)
    pub max_level: u32,
    /// Maximum fanout
    pub max_fanout: u32,
    /// Average fanout
    pub avg_fanout: f64,
}

impl std::fmt::Display for AigStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "AIG Statistics:")?;
        writeln!(f, "  Nodes: {} ({} AND)", self.node_count, self.and_count)?;
        writeln!(f, "  Inputs: {}", self.input_count)?;
        writeln!(f, "  Outputs: {}", self.output_count)?;
        writeln!(f, "  Levels: {}", self.max_level)?;
        writeln!(f, "  Max fanout: {}", self.max_fanout)?;
        writeln!(f, "  Avg fanout: {:.2}", self.avg_fanout)
    }
}
