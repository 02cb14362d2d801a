//! Shallow AIG - And-Inverter Graph substrate
//!
//! This crate provides the graph that the depth-reducing rewriter operates on:
//! - [`Aig`] - arena-backed AIG with structural hashing, in-place
//!   substitution and reference-count based reclamation
//! - [`topo`] - topological traversal and level computation
//! - [`DepthView`] - levels and critical-path flags over a borrowed AIG
//! - [`Network`] / [`Leveled`] - capability traits algorithms are written against
//! - [`sim`] - bit-parallel simulation and exhaustive truth tables
//!
//! # Example
//!
//! ```
//! use shallow_aig::{Aig, AigLit, DepthView, Leveled};
//!
//! let mut aig = Aig::new("example".to_string());
//! let a = AigLit::new(aig.add_input("a".to_string()));
//! let b = AigLit::new(aig.add_input("b".to_string()));
//! let y = aig.add_and(a, !b);
//! aig.add_output("y".to_string(), y);
//!
//! let view = DepthView::new(&mut aig);
//! assert_eq!(view.depth(), 1);
//! assert!(view.is_on_critical_path(y.node));
//! ```

mod aig;
mod depth;
pub mod error;
mod network;
pub mod sim;
pub mod topo;

pub use aig::{Aig, AigLit, AigNode, AigNodeId, AigStats};
pub use depth::DepthView;
pub use error::{AigError, Result};
pub use network::{Leveled, Network};
pub use sim::{random_patterns, simulate, truth_tables, TruthTable};
pub use topo::INPUT_LEVEL;

#[cfg(test)]
mod proptests;
