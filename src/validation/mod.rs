// src/validation/mod.rs

//! Gates that must pass before anything touches the amplitude store.

use crate::core::{AmplitudeState, EmulationError};
use crate::permutation::PermutationTable;

// Default tolerance values (can be overridden by caller)
const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Returns `true` if `entries` is a bijection on `[0, entries.len())`.
///
/// Every index of the codomain is marked as it is hit. Since domain and
/// codomain have the same finite size, full coverage is equivalent to
/// injectivity. Entries outside the range make the table invalid.
pub fn is_permutation(entries: &[usize]) -> bool {
    let mut seen = vec![false; entries.len()];
    for &target in entries {
        match seen.get_mut(target) {
            Some(slot) => *slot = true,
            None => return false,
        }
    }
    seen.into_iter().all(|hit| hit)
}

/// Certifies that `table` is a bijection.
///
/// # Errors
/// `EmulationError::InvalidPermutation` naming the first basis index that
/// no entry maps to, or the first out-of-range entry.
pub fn check_permutation(table: &PermutationTable) -> Result<(), EmulationError> {
    let entries = table.entries();
    let mut seen = vec![false; entries.len()];
    for (source, &target) in entries.iter().enumerate() {
        match seen.get_mut(target) {
            Some(slot) => *slot = true,
            None => {
                return Err(EmulationError::InvalidPermutation {
                    message: format!(
                        "Entry {} maps to {}, outside the table range 0..{}",
                        source,
                        target,
                        entries.len()
                    ),
                });
            }
        }
    }
    match seen.iter().position(|hit| !hit) {
        Some(missing) => Err(EmulationError::InvalidPermutation {
            message: format!(
                "Basis index {} of a width-{} table is never reached; the oracle is not reversible",
                missing,
                table.width()
            ),
        }),
        None => Ok(()),
    }
}

/// Checks that the state is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Errors
/// `EmulationError::Incoherence` if the norm deviates by more than
/// `tolerance` (default 1e-9).
pub fn check_normalization(state: &AmplitudeState, tolerance: Option<f64>) -> Result<(), EmulationError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq: f64 = state.vector().iter().map(|c| c.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(EmulationError::Incoherence {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}
