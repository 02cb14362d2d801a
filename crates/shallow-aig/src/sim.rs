//! Bit-parallel simulation
//!
//! Every node carries a vector of 64-bit words, one bit per input pattern.
//! [`truth_tables`] enumerates all input combinations, which is what the
//! rewriting tests use to prove that a transformation kept the function.

use crate::aig::{Aig, AigLit, AigNodeId};
use crate::error::{AigError, Result};
use crate::topo;

/// Largest input count [`truth_tables`] will enumerate
pub const MAX_EXHAUSTIVE_INPUTS: usize = 16;

/// Projection functions of the first six variables within one word
const VAR_MASKS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// Complete truth table of one output
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TruthTable {
    num_vars: usize,
    words: Vec<u64>,
}

impl TruthTable {
    /// Number of input variables
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Raw words; row `r` is bit `r % 64` of word `r / 64`
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Value for input assignment `row` (bit `i` of `row` is input `i`)
    pub fn bit(&self, row: usize) -> bool {
        self.words
            .get(row / 64)
            .is_some_and(|w| (w >> (row % 64)) & 1 == 1)
    }

    /// Number of satisfying assignments
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl std::fmt::Display for TruthTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for word in self.words.iter().rev() {
            write!(f, "{word:016x}")?;
        }
        Ok(())
    }
}

/// Patterns enumerating every assignment of `num_vars` inputs
pub fn exhaustive_patterns(num_vars: usize) -> Vec<Vec<u64>> {
    let words = 1usize << num_vars.saturating_sub(6);
    (0..num_vars)
        .map(|i| {
            if i < 6 {
                vec![VAR_MASKS[i]; words]
            } else {
                (0..words)
                    .map(|w| if (w >> (i - 6)) & 1 == 1 { u64::MAX } else { 0 })
                    .collect()
            }
        })
        .collect()
}

/// Pseudo-random patterns for `num_inputs` inputs, `words` words each
///
/// Deterministic for a given seed (xorshift64).
pub fn random_patterns(num_inputs: usize, words: usize, seed: u64) -> Vec<Vec<u64>> {
    let mut state = seed.max(1);
    (0..num_inputs)
        .map(|_| {
            (0..words)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    state
                })
                .collect()
        })
        .collect()
}

fn lit_word(values: &[Vec<u64>], lit: AigLit, w: usize) -> u64 {
    let word = values[lit.node.index()].get(w).copied().unwrap_or(0);
    if lit.inverted {
        !word
    } else {
        word
    }
}

/// Simulate the AIG on the given input patterns
///
/// `patterns[i]` holds the words for the `i`-th primary input in creation
/// order; shorter vectors are padded with zeros. Returns one word vector per
/// primary output.
pub fn simulate(aig: &Aig, patterns: &[Vec<u64>]) -> Result<Vec<Vec<u64>>> {
    let inputs: Vec<AigNodeId> = aig.iter_inputs().map(|(id, _)| id).collect();
    if patterns.len() != inputs.len() {
        return Err(AigError::PatternArity {
            expected: inputs.len(),
            actual: patterns.len(),
        });
    }
    let words = patterns.iter().map(Vec::len).max().unwrap_or(1).max(1);

    let mut values: Vec<Vec<u64>> = vec![Vec::new(); aig.capacity()];
    values[AigNodeId::FALSE.index()] = vec![0; words];
    for (id, pattern) in inputs.iter().zip(patterns) {
        values[id.index()] = (0..words)
            .map(|w| pattern.get(w).copied().unwrap_or(0))
            .collect();
    }

    for id in topo::topological_order(aig) {
        if let Some((left, right)) = aig.and_fanins(id) {
            values[id.index()] = (0..words)
                .map(|w| lit_word(&values, left, w) & lit_word(&values, right, w))
                .collect();
        }
    }

    Ok(aig
        .outputs()
        .iter()
        .map(|(_, lit)| (0..words).map(|w| lit_word(&values, *lit, w)).collect())
        .collect())
}

/// Exhaustive truth table of every primary output
pub fn truth_tables(aig: &Aig) -> Result<Vec<TruthTable>> {
    let num_vars = aig.input_count();
    if num_vars > MAX_EXHAUSTIVE_INPUTS {
        return Err(AigError::TooManyInputs {
            inputs: num_vars,
            max: MAX_EXHAUSTIVE_INPUTS,
        });
    }

    let outputs = simulate(aig, &exhaustive_patterns(num_vars))?;
    let mask = if num_vars < 6 {
        (1u64 << (1 << num_vars)) - 1
    } else {
        u64::MAX
    };

    Ok(outputs
        .into_iter()
        .map(|mut words| {
            if let Some(last) = words.last_mut() {
                *last &= mask;
            }
            TruthTable { num_vars, words }
        })
        .collect())
}
