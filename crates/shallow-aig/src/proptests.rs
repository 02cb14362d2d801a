//! Property-based tests for structural hashing and substitution.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::sim::truth_tables;
    use crate::{Aig, AigLit, AigNodeId, DepthView, Leveled};

    /// Gate recipe: (fanin index, inverted, fanin index, inverted)
    type Recipe = (usize, bool, usize, bool);

    fn recipes() -> impl Strategy<Value = (usize, Vec<Recipe>, Vec<(usize, bool)>)> {
        (2usize..=6).prop_flat_map(|inputs| {
            (
                Just(inputs),
                prop::collection::vec(
                    (0usize..64, any::<bool>(), 0usize..64, any::<bool>()),
                    1..32,
                ),
                prop::collection::vec((0usize..64, any::<bool>()), 1..4),
            )
        })
    }

    fn build(inputs: usize, gates: &[Recipe], outputs: &[(usize, bool)]) -> Aig {
        let mut aig = Aig::new("random".to_string());
        let mut lits: Vec<AigLit> = (0..inputs)
            .map(|i| AigLit::new(aig.add_input(format!("x{i}"))))
            .collect();
        for &(l, li, r, ri) in gates {
            let left = lits[l % lits.len()].invert_if(li);
            let right = lits[r % lits.len()].invert_if(ri);
            let lit = aig.add_and(left, right);
            lits.push(lit);
        }
        for (i, &(o, inv)) in outputs.iter().enumerate() {
            let lit = lits[lits.len() - 1 - (o % lits.len())].invert_if(inv);
            aig.add_output(format!("y{i}"), lit);
        }
        aig
    }

    fn mask(inputs: usize) -> u64 {
        if inputs < 6 {
            (1u64 << (1 << inputs)) - 1
        } else {
            u64::MAX
        }
    }

    /// Reference semantics of replacing every use of `old` by `new`
    fn expected_after_substitution(aig: &Aig, old: AigNodeId, new: AigLit) -> Vec<u64> {
        let patterns = crate::sim::exhaustive_patterns(aig.input_count());
        let mut values = vec![0u64; aig.capacity()];
        let value = |values: &[u64], lit: AigLit| {
            let v = values[lit.node.index()];
            if lit.inverted {
                !v
            } else {
                v
            }
        };
        let mut next_input = 0;
        // Freshly built graphs are stored in topological order
        for (id, node) in aig.iter_nodes() {
            values[id.index()] = match node {
                crate::AigNode::Const => 0,
                crate::AigNode::Input { .. } => {
                    next_input += 1;
                    patterns[next_input - 1][0]
                }
                crate::AigNode::And { left, right } => {
                    value(&values, *left) & value(&values, *right)
                }
            };
            if id == old {
                values[id.index()] = value(&values, new);
            }
        }
        let m = mask(aig.input_count());
        aig.outputs()
            .iter()
            .map(|(_, lit)| value(&values, *lit) & m)
            .collect()
    }

    proptest! {
        #[test]
        fn built_graphs_are_consistent((inputs, gates, outputs) in recipes()) {
            let aig = build(inputs, &gates, &outputs);
            prop_assert!(aig.check().is_ok());
            prop_assert_eq!(truth_tables(&aig).unwrap().len(), outputs.len());
        }

        #[test]
        fn substitution_matches_reference(
            (inputs, gates, outputs) in recipes(),
            pick in any::<prop::sample::Index>(),
            target in any::<prop::sample::Index>(),
            inv in any::<bool>(),
        ) {
            let mut aig = build(inputs, &gates, &outputs);
            let ands: Vec<AigNodeId> = aig.iter_and_nodes().map(|(id, _, _)| id).collect();
            prop_assume!(!ands.is_empty());
            let old = *pick.get(&ands);

            // Any node created before `old` is outside its fanout cone
            let earlier: Vec<AigNodeId> = aig
                .iter_nodes()
                .map(|(id, _)| id)
                .filter(|id| *id < old)
                .collect();
            let new = AigLit::new(*target.get(&earlier)).invert_if(inv);

            let expected = expected_after_substitution(&aig, old, new);
            aig.substitute_node(old, new);

            prop_assert!(aig.check().is_ok(), "{:?}", aig.check());
            let actual: Vec<u64> = truth_tables(&aig)
                .unwrap()
                .iter()
                .map(|tt| tt.words()[0])
                .collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn depth_matches_critical_output((inputs, gates, outputs) in recipes()) {
            let mut aig = build(inputs, &gates, &outputs);
            let drivers: Vec<AigNodeId> = aig.outputs().iter().map(|(_, l)| l.node).collect();
            let view = DepthView::new(&mut aig);

            let deepest = drivers.iter().map(|n| view.level(*n)).max().unwrap_or(0);
            prop_assert_eq!(view.depth(), deepest);
            for node in drivers {
                if node != AigNodeId::FALSE && view.level(node) == deepest {
                    prop_assert!(view.is_on_critical_path(node));
                }
            }
        }
    }
}
