//! AIG Optimization Passes
//!
//! Passes transform an [`Aig`] in place while preserving the function of
//! every output. Each one reports what it did through a [`PassResult`].
//!
//! # Example
//!
//! ```
//! use shallow_aig::{Aig, AigLit};
//! use shallow_rewrite::passes::{run_passes, AlgebraicRewrite, Pass};
//!
//! let mut aig = Aig::new("chain".to_string());
//! let v: Vec<AigLit> = ["a", "b", "c"]
//!     .iter()
//!     .map(|n| AigLit::new(aig.add_input(n.to_string())))
//!     .collect();
//! let ab = aig.add_and(v[0], v[1]);
//! let abc = aig.add_and(ab, v[2]);
//! aig.add_output("y".to_string(), abc);
//!
//! let mut passes: Vec<Box<dyn Pass>> = vec![Box::new(AlgebraicRewrite::new())];
//! let results = run_passes(&mut aig, &mut passes);
//! assert_eq!(results[0].pass_name, "algebraic");
//! ```

pub mod algebraic;

pub use algebraic::{
    aig_algebraic_rewriting, try_aig_algebraic_rewriting, AlgebraicConfig, AlgebraicRewrite,
    RewriteStats, Rule,
};

use indexmap::IndexMap;
use shallow_aig::Aig;

/// Result of running an optimization pass
#[derive(Debug, Clone, Default)]
pub struct PassResult {
    /// Name of the pass
    pub pass_name: String,
    /// Number of nodes before the pass
    pub nodes_before: usize,
    /// Number of nodes after the pass
    pub nodes_after: usize,
    /// Number of AND nodes before
    pub ands_before: usize,
    /// Number of AND nodes after
    pub ands_after: usize,
    /// Maximum level before
    pub levels_before: u32,
    /// Maximum level after
    pub levels_after: u32,
    /// Whether the pass made any changes
    pub changed: bool,
    /// Pass-specific counters, in insertion order
    pub extra: IndexMap<String, String>,
}

impl PassResult {
    /// Create a new pass result
    pub fn new(pass_name: &str) -> Self {
        Self {
            pass_name: pass_name.to_string(),
            ..Default::default()
        }
    }

    /// Record the "before" stats
    pub fn record_before(&mut self, aig: &Aig) {
        let stats = aig.compute_stats();
        self.nodes_before = stats.node_count;
        self.ands_before = stats.and_count;
        self.levels_before = stats.max_level;
    }

    /// Record the "after" stats
    pub fn record_after(&mut self, aig: &Aig) {
        let stats = aig.compute_stats();
        self.nodes_after = stats.node_count;
        self.ands_after = stats.and_count;
        self.levels_after = stats.max_level;
        self.changed = self.nodes_before != self.nodes_after
            || self.ands_before != self.ands_after
            || self.levels_before != self.levels_after;
    }

    /// Add or overwrite a pass-specific counter
    pub fn add_extra(&mut self, key: &str, value: impl ToString) {
        self.extra.insert(key.to_string(), value.to_string());
    }

    /// Look up a pass-specific counter
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    /// Get reduction in AND nodes
    pub fn and_reduction(&self) -> i64 {
        self.ands_before as i64 - self.ands_after as i64
    }

    /// Get reduction in levels
    pub fn level_reduction(&self) -> i64 {
        i64::from(self.levels_before) - i64::from(self.levels_after)
    }
}

fn signed_delta(reduction: i64) -> String {
    if reduction >= 0 {
        format!("-{reduction}")
    } else {
        format!("+{}", -reduction)
    }
}

impl std::fmt::Display for PassResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: ANDs {} → {} ({}), Levels {} → {} ({})",
            self.pass_name,
            self.ands_before,
            self.ands_after,
            signed_delta(self.and_reduction()),
            self.levels_before,
            self.levels_after,
            signed_delta(self.level_reduction()),
        )?;
        for (key, value) in &self.extra {
            write!(f, ", {key}={value}")?;
        }
        Ok(())
    }
}

/// Trait for AIG optimization passes
pub trait Pass {
    /// Get the name of this pass
    fn name(&self) -> &str;

    /// Run the pass on an AIG
    fn run(&mut self, aig: &mut Aig) -> PassResult;
}

/// Run a sequence of passes on an AIG
pub fn run_passes(aig: &mut Aig, passes: &mut [Box<dyn Pass>]) -> Vec<PassResult> {
    passes.iter_mut().map(|pass| pass.run(aig)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_result() {
        let mut result = PassResult::new("test");
        result.nodes_before = 100;
        result.ands_before = 50;
        result.levels_before = 10;
        result.nodes_after = 80;
        result.ands_after = 52;
        result.levels_after = 8;
        result.changed = true;

        assert_eq!(result.and_reduction(), -2);
        assert_eq!(result.level_reduction(), 2);
    }

    #[test]
    fn test_display_keeps_extra_order() {
        let mut result = PassResult::new("algebraic");
        result.ands_before = 3;
        result.ands_after = 3;
        result.levels_before = 3;
        result.levels_after = 2;
        result.add_extra("sweeps", 2);
        result.add_extra("associativity", 1);
        result.add_extra("sweeps", 3);

        assert_eq!(result.extra("sweeps"), Some("3"));
        assert_eq!(
            result.to_string(),
            "algebraic: ANDs 3 → 3 (-0), Levels 3 → 2 (-1), sweeps=3, associativity=1"
        );
    }
}
