//! Three-layer distributivity
//!
//! Matches an alternating chain hanging off the critical path:
//!
//! ```text
//! n  = !x1 & o0
//! x1 = !x2 & o1
//! x2 =  c2 & o2
//! ```
//!
//! which equals `(c2 & (o2 & o0)) | (o0 & !o1)`. When `o0` is at least three
//! levels shallower than `x1`, the expanded form is one level shallower than
//! `n`.

use shallow_aig::{AigLit, AigNodeId, Leveled};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    CollectLayer1,
    CollectLayer2,
    CollectLayer3,
    Evaluate,
    Fire,
    Reject,
}

/// Signals collected while descending, one critical and one side per layer
#[derive(Debug, Default)]
struct Layers {
    critical: Vec<AigLit>,
    other: Vec<AigLit>,
}

impl Layers {
    /// Classify the fanins of `node`; true if exactly one landed on each side
    ///
    /// Critical fanins are only kept when complemented if
    /// `require_complement` is set.
    fn collect<N: Leveled>(&mut self, ntk: &N, node: AigNodeId, require_complement: bool) -> bool {
        let Some(fanins) = ntk.fanins(node) else {
            return false;
        };
        let (critical, other) = (self.critical.len(), self.other.len());
        for fanin in fanins {
            if !ntk.is_on_critical_path(fanin.node) {
                self.other.push(fanin);
            } else if fanin.inverted || !require_complement {
                self.critical.push(fanin);
            }
        }
        self.critical.len() == critical + 1 && self.other.len() == other + 1
    }
}

pub(super) fn try_three_layer_distributivity<N: Leveled>(ntk: &mut N, n: AigNodeId) -> bool {
    let mut layers = Layers::default();
    let mut stage = Stage::CollectLayer1;

    loop {
        stage = match stage {
            Stage::CollectLayer1 => {
                if ntk.is_on_critical_path(n) && !ntk.is_pi(n) && layers.collect(ntk, n, true) {
                    Stage::CollectLayer2
                } else {
                    Stage::Reject
                }
            }
            Stage::CollectLayer2 => {
                if layers.collect(ntk, layers.critical[0].node, true) {
                    Stage::CollectLayer3
                } else {
                    Stage::Reject
                }
            }
            Stage::CollectLayer3 => {
                if layers.collect(ntk, layers.critical[1].node, false) {
                    Stage::Evaluate
                } else {
                    Stage::Reject
                }
            }
            Stage::Evaluate => {
                let deep = ntk.level(layers.critical[0].node);
                let shallow = ntk.level(layers.other[0].node);
                // level(x1) - 2 > level(o0)
                if deep > shallow.saturating_add(2) {
                    Stage::Fire
                } else {
                    Stage::Reject
                }
            }
            Stage::Fire => break,
            Stage::Reject => return false,
        };
    }

    let (c2, o) = (layers.critical[2], &layers.other);
    let bottom = ntk.create_and(o[2], o[0]);
    let right = ntk.create_and(c2, bottom);
    let not_o1 = ntk.create_not(o[1]);
    let left = ntk.create_and(o[0], not_o1);
    let (not_right, not_left) = (ntk.create_not(right), ntk.create_not(left));
    let result = ntk.create_nand(not_right, not_left);
    ntk.substitute_node(n, result);
    true
}
