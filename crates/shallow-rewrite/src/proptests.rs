//! Property-based tests for the algebraic rewriting pass.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use shallow_aig::{truth_tables, Aig, AigLit, AigNodeId, DepthView, Leveled};

    use crate::passes::algebraic::{
        aig_algebraic_rewriting, try_aig_algebraic_rewriting, AlgebraicConfig, AlgebraicRewrite,
        Rule,
    };

    /// Gate recipe: (fanin index, inverted, fanin index, inverted)
    type Recipe = (usize, bool, usize, bool);

    fn recipes() -> impl Strategy<Value = (usize, Vec<Recipe>, Vec<(usize, bool)>)> {
        (2usize..=7).prop_flat_map(|inputs| {
            (
                Just(inputs),
                prop::collection::vec(
                    (0usize..64, any::<bool>(), 0usize..64, any::<bool>()),
                    1..48,
                ),
                prop::collection::vec((0usize..64, any::<bool>()), 1..4),
            )
        })
    }

    /// Random AIG; gates prefer recent signals so that deep chains appear
    fn build(inputs: usize, gates: &[Recipe], outputs: &[(usize, bool)]) -> Aig {
        let mut aig = Aig::new("random".to_string());
        let mut lits: Vec<AigLit> = (0..inputs)
            .map(|i| AigLit::new(aig.add_input(format!("x{i}"))))
            .collect();
        for &(l, li, r, ri) in gates {
            let left = lits[lits.len() - 1 - (l % 3).min(lits.len() - 1)].invert_if(li);
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

    /// Config whose sweep cap fails a run that cycles instead of hanging it
    fn bounded(aig: &Aig) -> AlgebraicConfig {
        let stats = aig.compute_stats();
        AlgebraicConfig {
            max_sweeps: Some(4 * (stats.and_count + 1) * (stats.max_level as usize + 1)),
            ..Default::default()
        }
    }

    fn snapshot(aig: &Aig) -> (Vec<(AigNodeId, AigLit, AigLit)>, Vec<(String, AigLit)>) {
        (aig.iter_and_nodes().collect(), aig.outputs().to_vec())
    }

    /// Leaves for the per-rule patterns: four inputs and three side inputs
    fn leaves(aig: &mut Aig) -> Vec<AigLit> {
        (0..7)
            .map(|i| AigLit::new(aig.add_input(format!("x{i}"))))
            .collect()
    }

    proptest! {
        #[test]
        fn rewriting_preserves_function_and_depth((inputs, gates, outputs) in recipes()) {
            let mut aig = build(inputs, &gates, &outputs);
            let before = truth_tables(&aig).unwrap();
            let depth = aig.compute_stats().max_level;

            let config = bounded(&aig);
            let stats = AlgebraicRewrite::with_config(config).run_on(&mut DepthView::new(&mut aig));

            prop_assert!(!stats.sweep_limit_reached);
            prop_assert!(aig.check().is_ok(), "{:?}", aig.check());
            prop_assert_eq!(truth_tables(&aig).unwrap(), before);
            prop_assert_eq!(stats.depth_before, depth);
            prop_assert!(stats.depth_after <= stats.depth_before);
            prop_assert_eq!(aig.compute_stats().max_level, stats.depth_after);
        }

        #[test]
        fn depth_never_grows_between_rewrites((inputs, gates, outputs) in recipes()) {
            let mut aig = build(inputs, &gates, &outputs);
            let before = truth_tables(&aig).unwrap();
            let mut pass = AlgebraicRewrite::with_config(bounded(&aig));
            let mut view = DepthView::new(&mut aig);
            let mut last = view.depth();
            let mut steps = 0usize;

            let run = pass.drive(&mut view, |view, rule, node| {
                steps += 1;
                let depth = view.depth();
                if depth > last {
                    return Err(format!("{rule} at {node} raised depth from {last} to {depth}"));
                }
                last = depth;
                Ok(())
            });

            let stats = run.map_err(|reason| TestCaseError::fail(reason))?;
            prop_assert!(!stats.sweep_limit_reached);
            prop_assert_eq!(steps, stats.rewrites());
            prop_assert_eq!(last, stats.depth_after);
            prop_assert_eq!(truth_tables(&aig).unwrap(), before);
        }

        #[test]
        fn rewriting_is_idempotent((inputs, gates, outputs) in recipes()) {
            let mut aig = build(inputs, &gates, &outputs);
            aig_algebraic_rewriting(&mut aig);
            let first = snapshot(&aig);

            let again = aig_algebraic_rewriting(&mut aig);

            prop_assert_eq!(again.rewrites(), 0);
            prop_assert_eq!(again.sweeps, 1);
            prop_assert_eq!(snapshot(&aig), first);
        }

        #[test]
        fn verified_run_accepts_every_rewrite((inputs, gates, outputs) in recipes()) {
            let mut aig = build(inputs, &gates, &outputs);
            let mut reference = aig.clone();

            let checked = try_aig_algebraic_rewriting(&mut aig, AlgebraicConfig::verified());
            let plain = aig_algebraic_rewriting(&mut reference);

            prop_assert_eq!(checked, Ok(plain));
            prop_assert_eq!(snapshot(&aig), snapshot(&reference));
        }

        #[test]
        fn single_rule_runs_stay_equivalent(
            (inputs, gates, outputs) in recipes(),
            rule in prop::sample::select(Rule::ALL.to_vec()),
        ) {
            let mut aig = build(inputs, &gates, &outputs);
            let before = truth_tables(&aig).unwrap();

            let mut pass = AlgebraicRewrite::with_config(AlgebraicConfig::only(rule));
            let stats = pass.run_on(&mut DepthView::new(&mut aig));

            for other in Rule::ALL.into_iter().filter(|r| *r != rule) {
                prop_assert_eq!(stats.count(other), 0);
            }
            prop_assert!(stats.depth_after <= stats.depth_before);
            prop_assert_eq!(truth_tables(&aig).unwrap(), before);
        }

        #[test]
        fn distributivity_pattern_with_random_polarities(
            s1_inv in any::<bool>(),
            s2_inv in any::<bool>(),
            out_inv in any::<bool>(),
        ) {
            let mut aig = Aig::new("dist".to_string());
            let v = leaves(&mut aig);
            let ab = aig.add_and(v[0], v[1]);
            let cd = aig.add_and(v[2], v[3]);
            let beta = aig.add_and(ab, cd);
            let c1 = aig.add_and(beta, v[4].invert_if(s1_inv));
            let c2 = aig.add_and(beta, v[5].invert_if(s2_inv));
            let n = aig.add_and(!c1, !c2);
            aig.add_output("y".to_string(), n.invert_if(out_inv));
            let before = truth_tables(&aig).unwrap();

            let stats = aig_algebraic_rewriting(&mut aig);

            prop_assert_eq!(stats.distributivity, 1);
            prop_assert_eq!(stats.depth_after, 3);
            prop_assert_eq!(truth_tables(&aig).unwrap(), before);
        }

        #[test]
        fn three_layer_pattern_with_random_polarities(
            c_inv in any::<bool>(),
            o0_inv in any::<bool>(),
            o1_inv in any::<bool>(),
            o2_inv in any::<bool>(),
        ) {
            let mut aig = Aig::new("three".to_string());
            let v = leaves(&mut aig);
            let ab = aig.add_and(v[0], v[1]);
            let cd = aig.add_and(v[2], v[3]);
            let x3 = aig.add_and(ab, cd);
            let x2 = aig.add_and(x3.invert_if(c_inv), v[6].invert_if(o2_inv));
            let x1 = aig.add_and(!x2, v[5].invert_if(o1_inv));
            let n = aig.add_and(!x1, v[4].invert_if(o0_inv));
            aig.add_output("y".to_string(), n);
            let before = truth_tables(&aig).unwrap();

            let stats = aig_algebraic_rewriting(&mut aig);

            prop_assert!(stats.three_layer_distributivity >= 1);
            prop_assert!(stats.depth_after < stats.depth_before);
            prop_assert_eq!(truth_tables(&aig).unwrap(), before);
        }
    }
}
