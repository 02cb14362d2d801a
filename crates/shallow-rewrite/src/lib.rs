//! Shallow Rewrite - depth-reducing algebraic rewriting for AIGs
//!
//! Rewrites nodes on the critical path of an And-Inverter Graph with
//! associativity and distributivity identities until no rule applies. The
//! function of every output is preserved and the depth never grows.
//!
//! # Example
//!
//! ```
//! use shallow_aig::{Aig, AigLit};
//! use shallow_rewrite::aig_algebraic_rewriting;
//!
//! let mut aig = Aig::new("chain".to_string());
//! let v: Vec<AigLit> = ["a", "b", "c", "d"]
//!     .iter()
//!     .map(|n| AigLit::new(aig.add_input(n.to_string())))
//!     .collect();
//! let ab = aig.add_and(v[0], v[1]);
//! let abc = aig.add_and(ab, v[2]);
//! let y = aig.add_and(abc, v[3]);
//! aig.add_output("y".to_string(), y);
//!
//! let stats = aig_algebraic_rewriting(&mut aig);
//! assert_eq!((stats.depth_before, stats.depth_after), (3, 2));
//! ```

pub mod error;
pub mod passes;

pub use error::{Result, RewriteError};
pub use passes::{
    aig_algebraic_rewriting, run_passes, try_aig_algebraic_rewriting, AlgebraicConfig,
    AlgebraicRewrite, Pass, PassResult, RewriteStats, Rule,
};

#[cfg(test)]
mod proptests;
