//! Algebraic depth rewriting
//!
//! Walks the gates of a [`Leveled`] network and applies three local
//! identities to nodes on the critical path, each of which strictly lowers
//! the level of the node it replaces:
//!
//! - [`Rule::Associativity`]: `(β & g) & s` becomes `(s & g) & β`
//! - [`Rule::Distributivity`]: `!(β & s1) & !(β & s2)` becomes `!((s1 | s2) & β)`
//! - [`Rule::ThreeLayerDistributivity`]: factors a three-gate alternating
//!   chain into a two-level OR of ANDs
//!
//! # Algorithm
//!
//! 1. Refresh levels and critical-path flags
//! 2. Visit every gate in topological order and try the rules in priority
//!    order; the first one that matches substitutes the node
//! 3. After a substitution, refresh levels and restart from step 2
//! 4. Stop when a sweep completes without a rewrite
//!
//! Every accepted rewrite lowers the level of its node without raising any
//! other level, so the number of paths at full depth shrinks each time and
//! the loop reaches a fixpoint.

mod associativity;
mod distributivity;
mod three_layer;

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use shallow_aig::{random_patterns, simulate, Aig, AigLit, AigNodeId, DepthView, Leveled};
use tracing::{debug, trace, warn};

use super::{Pass, PassResult};
use crate::error::{Result, RewriteError};

/// Words of random patterns simulated per output in verification mode
const VERIFY_WORDS: usize = 4;

/// One of the local rewrite identities, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Associativity,
    Distributivity,
    ThreeLayerDistributivity,
}

impl Rule {
    /// All rules in the order the driver tries them
    pub const ALL: [Rule; 3] = [
        Rule::Associativity,
        Rule::Distributivity,
        Rule::ThreeLayerDistributivity,
    ];

    /// Short identifier used in logs and pass reports
    pub fn name(self) -> &'static str {
        match self {
            Rule::Associativity => "associativity",
            Rule::Distributivity => "distributivity",
            Rule::ThreeLayerDistributivity => "three_layer_distributivity",
        }
    }

    /// Try this rule at `n`; the network is untouched unless it returns true
    fn apply<N: Leveled>(self, ntk: &mut N, n: AigNodeId) -> bool {
        match self {
            Rule::Associativity => associativity::try_associativity(ntk, n),
            Rule::Distributivity => distributivity::try_distributivity(ntk, n),
            Rule::ThreeLayerDistributivity => three_layer::try_three_layer_distributivity(ntk, n),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Algebraic rewriting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgebraicConfig {
    /// Enable the associativity rule
    pub associativity: bool,
    /// Enable the distributivity rule
    pub distributivity: bool,
    /// Enable the three-layer distributivity rule
    pub three_layer_distributivity: bool,
    /// Stop after this many sweeps even if rewrites are still found
    pub max_sweeps: Option<usize>,
    /// Validate structure and compare output signatures after every rewrite
    /// (checked entry point only)
    pub verify: bool,
    /// Seed for the verification patterns
    pub seed: u64,
}

impl Default for AlgebraicConfig {
    fn default() -> Self {
        Self {
            associativity: true,
            distributivity: true,
            three_layer_distributivity: true,
            max_sweeps: None,
            verify: false,
            seed: 0xDEADBEEF,
        }
    }
}

impl AlgebraicConfig {
    /// All rules enabled, every rewrite verified
    pub fn verified() -> Self {
        Self {
            verify: true,
            ..Default::default()
        }
    }

    /// Only `rule` enabled
    pub fn only(rule: Rule) -> Self {
        Self {
            associativity: rule == Rule::Associativity,
            distributivity: rule == Rule::Distributivity,
            three_layer_distributivity: rule == Rule::ThreeLayerDistributivity,
            ..Default::default()
        }
    }

    /// Whether `rule` takes part in the sweep
    pub fn enables(&self, rule: Rule) -> bool {
        match rule {
            Rule::Associativity => self.associativity,
            Rule::Distributivity => self.distributivity,
            Rule::ThreeLayerDistributivity => self.three_layer_distributivity,
        }
    }
}

/// Statistics from one rewriting run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Sweeps started, including the final one that found nothing
    pub sweeps: usize,
    /// Accepted associativity rewrites
    pub associativity: usize,
    /// Accepted distributivity rewrites
    pub distributivity: usize,
    /// Accepted three-layer distributivity rewrites
    pub three_layer_distributivity: usize,
    /// Depth before the first sweep
    pub depth_before: u32,
    /// Depth after the last sweep
    pub depth_after: u32,
    /// Gate count before the first sweep
    pub ands_before: usize,
    /// Gate count after the last sweep
    pub ands_after: usize,
    /// The run stopped at `max_sweeps` before reaching a fixpoint
    pub sweep_limit_reached: bool,
}

impl RewriteStats {
    /// Accepted rewrites of one rule
    pub fn count(&self, rule: Rule) -> usize {
        match rule {
            Rule::Associativity => self.associativity,
            Rule::Distributivity => self.distributivity,
            Rule::ThreeLayerDistributivity => self.three_layer_distributivity,
        }
    }

    /// Accepted rewrites over all rules
    pub fn rewrites(&self) -> usize {
        Rule::ALL.iter().map(|rule| self.count(*rule)).sum()
    }

    /// Levels removed from the network
    pub fn depth_reduction(&self) -> i64 {
        i64::from(self.depth_before) - i64::from(self.depth_after)
    }

    fn record(&mut self, rule: Rule) {
        match rule {
            Rule::Associativity => self.associativity += 1,
            Rule::Distributivity => self.distributivity += 1,
            Rule::ThreeLayerDistributivity => self.three_layer_distributivity += 1,
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Algebraic: {} rewrites in {} sweeps (assoc {}, dist {}, 3-layer {}), depth {} -> {}, ANDs {} -> {}",
            self.rewrites(),
            self.sweeps,
            self.associativity,
            self.distributivity,
            self.three_layer_distributivity,
            self.depth_before,
            self.depth_after,
            self.ands_before,
            self.ands_after,
        )
    }
}

/// Depth-reducing algebraic rewriting pass
#[derive(Debug, Clone, Default)]
pub struct AlgebraicRewrite {
    config: AlgebraicConfig,
    stats: RewriteStats,
}

impl AlgebraicRewrite {
    /// Create a new pass with every rule enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific config
    pub fn with_config(config: AlgebraicConfig) -> Self {
        Self {
            config,
            stats: RewriteStats::default(),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &AlgebraicConfig {
        &self.config
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Rewrite `ntk` to a fixpoint
    pub fn run_on<N: Leveled>(&mut self, ntk: &mut N) -> RewriteStats {
        match self.drive(ntk, |_, _, _| Ok::<(), Infallible>(())) {
            Ok(stats) => stats,
            Err(never) => match never {},
        }
    }

    /// Fixpoint loop; `on_rewrite` sees the refreshed network after every
    /// accepted rewrite and can abort the run
    pub(crate) fn drive<N, E, F>(
        &mut self,
        ntk: &mut N,
        mut on_rewrite: F,
    ) -> std::result::Result<RewriteStats, E>
    where
        N: Leveled,
        F: FnMut(&N, Rule, AigNodeId) -> std::result::Result<(), E>,
    {
        ntk.update_levels();
        let mut stats = RewriteStats {
            depth_before: ntk.depth(),
            ands_before: ntk.gates().len(),
            ..Default::default()
        };
        debug!(
            depth = stats.depth_before,
            ands = stats.ands_before,
            "algebraic rewriting started"
        );

        loop {
            if self.config.max_sweeps.is_some_and(|max| stats.sweeps >= max) {
                warn!(
                    sweeps = stats.sweeps,
                    "sweep limit reached before fixpoint"
                );
                stats.sweep_limit_reached = true;
                break;
            }
            stats.sweeps += 1;
            debug!(sweep = stats.sweeps, depth = ntk.depth(), "sweep started");

            let mut rewritten = None;
            for n in ntk.gates() {
                if let Some(rule) = self.try_algebraic_rules(ntk, n) {
                    rewritten = Some((rule, n));
                    break;
                }
            }
            let Some((rule, n)) = rewritten else {
                break;
            };

            ntk.update_levels();
            stats.record(rule);
            trace!(%rule, node = %n, depth = ntk.depth(), "rewrite accepted");
            on_rewrite(ntk, rule, n)?;
        }

        stats.depth_after = ntk.depth();
        stats.ands_after = ntk.gates().len();
        debug!("{}", stats.summary());
        self.stats = stats.clone();
        Ok(stats)
    }

    /// First enabled rule that rewrites `n`
    fn try_algebraic_rules<N: Leveled>(&self, ntk: &mut N, n: AigNodeId) -> Option<Rule> {
        Rule::ALL
            .into_iter()
            .filter(|rule| self.config.enables(*rule))
            .find(|rule| rule.apply(ntk, n))
    }
}

impl Pass for AlgebraicRewrite {
    fn name(&self) -> &str {
        "algebraic"
    }

    fn run(&mut self, aig: &mut Aig) -> PassResult {
        let mut result = PassResult::new(self.name());
        result.record_before(aig);

        let stats = self.run_on(&mut DepthView::new(aig));

        result.record_after(aig);
        result.add_extra("sweeps", stats.sweeps);
        for rule in Rule::ALL {
            result.add_extra(rule.name(), stats.count(rule));
        }
        result
    }
}

/// Split a gate's fanins into (critical, side) when exactly one of them is
/// on the critical path
fn split_critical<N: Leveled>(ntk: &N, fanins: [AigLit; 2]) -> Option<(AigLit, AigLit)> {
    let [a, b] = fanins;
    match (
        ntk.is_on_critical_path(a.node),
        ntk.is_on_critical_path(b.node),
    ) {
        (true, false) => Some((a, b)),
        (false, true) => Some((b, a)),
        _ => None,
    }
}

/// Rewrite an AIG to the algebraic depth fixpoint
pub fn aig_algebraic_rewriting(aig: &mut Aig) -> RewriteStats {
    AlgebraicRewrite::new().run_on(&mut DepthView::new(aig))
}

/// Rewrite an AIG with a specific config, validating the input first
///
/// With `config.verify` set, the graph is checked and its outputs are
/// simulated on random patterns after every rewrite; the run stops at the
/// first rewrite that breaks structure or changes an output.
pub fn try_aig_algebraic_rewriting(
    aig: &mut Aig,
    config: AlgebraicConfig,
) -> Result<RewriteStats> {
    aig.check().map_err(RewriteError::InvalidNetwork)?;

    let verify = config.verify;
    let patterns = random_patterns(aig.input_count(), VERIFY_WORDS, config.seed);
    let reference = if verify {
        simulate(aig, &patterns).map_err(RewriteError::InvalidNetwork)?
    } else {
        Vec::new()
    };

    let mut pass = AlgebraicRewrite::with_config(config);
    let mut view = DepthView::new(aig);
    let stats = pass.drive(&mut view, |view, rule, node| {
        if !verify {
            return Ok(());
        }
        let aig = view.aig();
        aig.check().map_err(|source| RewriteError::Corrupted {
            rule,
            node,
            source,
        })?;
        let signatures = simulate(aig, &patterns).map_err(|source| RewriteError::Corrupted {
            rule,
            node,
            source,
        })?;
        let changed = signatures
            .iter()
            .zip(&reference)
            .position(|(now, before)| now != before);
        match changed {
            Some(index) => Err(RewriteError::FunctionChanged {
                rule,
                node,
                output: aig.outputs()[index].0.clone(),
            }),
            None => Ok(()),
        }
    })?;

    if stats.depth_after > stats.depth_before {
        return Err(RewriteError::DepthIncreased {
            before: stats.depth_before,
            after: stats.depth_after,
        });
    }
    Ok(stats)
}
