//! Associativity: `(β & g) & s` becomes `(s & g) & β`
//!
//! `n` reads one critical, non-inverted gate and one side signal; that gate in
//! turn reads one critical signal `β` and one side signal `g`. Combining the
//! two side signals first lets `β` enter one layer later.

use shallow_aig::{AigNodeId, Leveled};

use super::split_critical;

pub(super) fn try_associativity<N: Leveled>(ntk: &mut N, n: AigNodeId) -> bool {
    if !ntk.is_on_critical_path(n) || ntk.is_pi(n) {
        return false;
    }
    let Some(fanins) = ntk.fanins(n) else {
        return false;
    };
    let Some((child, side)) = split_critical(ntk, fanins) else {
        return false;
    };
    if child.inverted || ntk.is_pi(child.node) {
        return false;
    }
    let Some(grand) = ntk.fanins(child.node) else {
        return false;
    };
    let Some((beta, side_grandchild)) = split_critical(ntk, grand) else {
        return false;
    };
    // level(side) <= level(β) - 1
    if ntk.level(side.node) >= ntk.level(beta.node) {
        return false;
    }

    let shallow = ntk.create_and(side, side_grandchild);
    let replacement = ntk.create_and(shallow, beta);
    ntk.substitute_node(n, replacement);
    true
}
