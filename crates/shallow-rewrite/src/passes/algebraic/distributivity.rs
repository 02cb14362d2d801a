//! Distributivity: `!(β & s1) & !(β & s2)` becomes `!((s1 | s2) & β)`
//!
//! Both fanins of `n` must be complemented critical gates that share the same
//! critical input `β`. Factoring `β` out feeds it through a single gate.

use shallow_aig::{AigLit, AigNodeId, Leveled};

use super::split_critical;

/// The shared critical signal and the side signal of one complemented branch
fn factor_branch<N: Leveled>(ntk: &N, fanin: AigLit) -> Option<(AigLit, AigLit)> {
    if !fanin.inverted || !ntk.is_on_critical_path(fanin.node) || ntk.is_pi(fanin.node) {
        return None;
    }
    split_critical(ntk, ntk.fanins(fanin.node)?)
}

pub(super) fn try_distributivity<N: Leveled>(ntk: &mut N, n: AigNodeId) -> bool {
    if !ntk.is_on_critical_path(n) || ntk.is_pi(n) {
        return false;
    }
    let Some([first, second]) = ntk.fanins(n) else {
        return false;
    };
    if ntk.is_pi(first.node) && ntk.is_pi(second.node) {
        return false;
    }
    let (Some((beta, s1)), Some((shared, s2))) =
        (factor_branch(ntk, first), factor_branch(ntk, second))
    else {
        return false;
    };
    if beta != shared {
        return false;
    }

    let or = ntk.create_or(s1, s2);
    let replacement = if ntk.is_or(n) {
        ntk.create_and(or, beta)
    } else {
        ntk.create_nand(or, beta)
    };
    ntk.substitute_node(n, replacement);
    true
}
