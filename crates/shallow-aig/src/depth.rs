//! Depth view: levels and critical path over a mutable AIG
//!
//! [`DepthView`] borrows an [`Aig`] exclusively and caches, for every node,
//! its level and whether it lies on a longest input-to-output path. The cache
//! is invalidated by every substitution made through the view and must be
//! refreshed with [`Leveled::update_levels`] before it is read again.

use crate::aig::{Aig, AigLit, AigNodeId};
use crate::network::{Leveled, Network};
use crate::topo::{self, INPUT_LEVEL};

/// Level and critical-path tracking over an exclusively borrowed AIG
#[derive(Debug)]
pub struct DepthView<'a> {
    aig: &'a mut Aig,
    levels: Vec<u32>,
    critical: Vec<bool>,
    depth: u32,
    /// Set by substitutions until the next `update_levels`
    stale: bool,
}

impl<'a> DepthView<'a> {
    /// Wrap an AIG and compute its levels
    pub fn new(aig: &'a mut Aig) -> Self {
        let mut view = Self {
            aig,
            levels: Vec::new(),
            critical: Vec::new(),
            depth: INPUT_LEVEL,
            stale: true,
        };
        view.update_levels();
        view
    }

    /// The wrapped AIG
    pub fn aig(&self) -> &Aig {
        &*self.aig
    }

    /// Whether the graph changed since the last level update
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of nodes currently on the critical path
    pub fn critical_count(&self) -> usize {
        self.critical.iter().filter(|c| **c).count()
    }

    /// Mark the critical cone backwards from every output at full depth
    fn compute_critical_path(&mut self) {
        self.critical = vec![false; self.aig.capacity()];

        let mut stack: Vec<AigNodeId> = self
            .aig
            .outputs()
            .iter()
            .map(|(_, lit)| lit.node)
            .filter(|id| *id != AigNodeId::FALSE && self.levels[id.index()] == self.depth)
            .collect();

        while let Some(id) = stack.pop() {
            if self.critical[id.index()] {
                continue;
            }
            self.critical[id.index()] = true;

            if let Some((left, right)) = self.aig.and_fanins(id) {
                let level = self.levels[id.index()];
                for fanin in [left.node, right.node] {
                    if self.levels[fanin.index()] + 1 == level && !self.critical[fanin.index()] {
                        stack.push(fanin);
                    }
                }
            }
        }
    }
}

impl Network for DepthView<'_> {
    fn gates(&self) -> Vec<AigNodeId> {
        self.aig.gates()
    }

    fn fanins(&self, node: AigNodeId) -> Option<[AigLit; 2]> {
        self.aig.fanins(node)
    }

    fn is_pi(&self, node: AigNodeId) -> bool {
        self.aig.is_pi(node)
    }

    fn is_or(&self, node: AigNodeId) -> bool {
        self.aig.is_or(node)
    }

    fn create_and(&mut self, a: AigLit, b: AigLit) -> AigLit {
        self.aig.add_and(a, b)
    }

    fn substitute_node(&mut self, old: AigNodeId, new: AigLit) {
        self.aig.substitute_node(old, new);
        self.stale = true;
    }
}

impl Leveled for DepthView<'_> {
    fn level(&self, node: AigNodeId) -> u32 {
        debug_assert!(!self.stale, "level of {node} read before update_levels");
        self.levels
            .get(node.index())
            .copied()
            .unwrap_or(INPUT_LEVEL)
    }

    fn depth(&self) -> u32 {
        debug_assert!(!self.stale, "depth read before update_levels");
        self.depth
    }

    fn is_on_critical_path(&self, node: AigNodeId) -> bool {
        debug_assert!(!self.stale, "critical flag of {node} read before update_levels");
        self.critical.get(node.index()).copied().unwrap_or(false)
    }

    fn update_levels(&mut self) {
        self.levels = topo::compute_levels(self.aig);
        self.depth = topo::output_depth(self.aig, &self.levels);
        self.compute_critical_path();
        self.stale = false;
    }
}
