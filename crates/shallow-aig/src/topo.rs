//! Topological traversal and level computation
//!
//! Node ids stop being a topological order as soon as the graph is rewritten
//! in place (a rewired gate may read a node created after it), so every
//! consumer that needs fanins-before-fanouts goes through this module.

use crate::aig::{Aig, AigNodeId};

/// Level of primary inputs and of the constant node
pub const INPUT_LEVEL: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Depth-first post-order over all live nodes; also reports the first node
/// found closing a cycle.
fn visit(aig: &Aig) -> (Vec<AigNodeId>, Option<AigNodeId>) {
    let mut marks = vec![Mark::Unvisited; aig.capacity()];
    let mut order = Vec::with_capacity(aig.node_count());
    let mut cycle = None;

    // Outputs first so the order follows the cones the design actually uses
    let roots = aig
        .outputs()
        .iter()
        .map(|(_, lit)| lit.node)
        .chain(aig.iter_nodes().map(|(id, _)| id))
        .filter(|id| aig.is_live(*id))
        .collect::<Vec<_>>();

    for root in roots {
        if marks[root.index()] != Mark::Unvisited {
            continue;
        }
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                marks[id.index()] = Mark::Done;
                order.push(id);
                continue;
            }
            match marks[id.index()] {
                Mark::Done => continue,
                Mark::OnStack => {
                    // Only descendants of `id` sit above its post-visit entry
                    cycle.get_or_insert(id);
                    continue;
                }
                Mark::Unvisited => {}
            }
            marks[id.index()] = Mark::OnStack;
            stack.push((id, true));
            if let Some((left, right)) = aig.and_fanins(id) {
                for fanin in [right.node, left.node] {
                    if aig.is_live(fanin) && marks[fanin.index()] != Mark::Done {
                        stack.push((fanin, false));
                    }
                }
            }
        }
    }

    (order, cycle)
}

/// Live nodes ordered so that every gate follows its fanins
pub fn topological_order(aig: &Aig) -> Vec<AigNodeId> {
    visit(aig).0
}

/// Live AND gates in topological order
pub fn topological_gates(aig: &Aig) -> Vec<AigNodeId> {
    topological_order(aig)
        .into_iter()
        .filter(|id| aig.is_and(*id))
        .collect()
}

/// First node found on a combinational cycle, if any
pub fn find_cycle(aig: &Aig) -> Option<AigNodeId> {
    visit(aig).1
}

/// Level of every node, indexed by node id (reclaimed slots read as
/// [`INPUT_LEVEL`])
pub fn compute_levels(aig: &Aig) -> Vec<u32> {
    let mut levels = vec![INPUT_LEVEL; aig.capacity()];
    for id in topological_order(aig) {
        if let Some((left, right)) = aig.and_fanins(id) {
            levels[id.index()] = levels[left.node.index()].max(levels[right.node.index()]) + 1;
        }
    }
    levels
}

/// Largest level among the nodes driving primary outputs
pub fn output_depth(aig: &Aig, levels: &[u32]) -> u32 {
    aig.outputs()
        .iter()
        .map(|(_, lit)| levels.get(lit.node.index()).copied().unwrap_or(INPUT_LEVEL))
        .max()
        .unwrap_or(INPUT_LEVEL)
}
