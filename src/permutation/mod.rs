// src/permutation/mod.rs

//! Truth-table unrolling of oracles into basis permutations.
//!
//! A table of width `w` has `2^w` entries; entry `i` is the basis index the
//! amplitude at `i` moves to. Basis indices pack the input register in the
//! low `nx` bits and the accumulator in the next `ny` bits, first qubit of
//! each register being the least significant bit.

use crate::core::EmulationError;
use crate::oracles::OracleFunction;
use std::fmt;

/// Default upper bound on `nx + ny` for unrolled tables.
pub const DEFAULT_MAX_REGISTER_WIDTH: usize = 24;

/// An explicit permutation of the basis states of a `width`-qubit register.
///
/// Construction guarantees the length is `2^width`, so domain and codomain
/// always have the same size. Whether the entries actually form a bijection
/// is checked separately by [`crate::validation::check_permutation`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PermutationTable {
    entries: Vec<usize>,
    width: usize,
}

impl PermutationTable {
    /// Wraps raw table entries, typically a hand-written permutation that will
    /// be registered under an operation identifier.
    ///
    /// # Errors
    /// `EmulationError::ContractViolation` if the length is not a positive
    /// power of two.
    pub fn from_entries(entries: Vec<usize>) -> Result<Self, EmulationError> {
        if entries.is_empty() || !entries.len().is_power_of_two() {
            return Err(EmulationError::ContractViolation {
                message: format!("Permutation table length {} is not a positive power of two", entries.len()),
            });
        }
        let width = entries.len().trailing_zeros() as usize;
        Ok(Self { entries, width })
    }

    /// The identity permutation on `width` qubits.
    pub fn identity(width: usize) -> Result<Self, EmulationError> {
        let size = table_size(width)?;
        Ok(Self { entries: (0..size).collect(), width })
    }

    /// The table entries.
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    /// Number of qubits the table acts on.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target of basis index `index`.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.entries.get(index).copied()
    }

    /// The inverse permutation.
    ///
    /// Only meaningful for a validated table: entries out of range are
    /// skipped and colliding entries keep the last writer.
    pub fn inverse(&self) -> PermutationTable {
        let mut inverse = vec![0usize; self.entries.len()];
        for (i, &target) in self.entries.iter().enumerate() {
            if let Some(slot) = inverse.get_mut(target) {
                *slot = i;
            }
        }
        PermutationTable { entries: inverse, width: self.width }
    }

    /// `true` if applying the table twice is the identity.
    pub fn is_involution(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, &target)| self.entries.get(target) == Some(&i))
    }
}

impl fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full tables run to millions of entries; show the head only.
        const SHOWN: usize = 16;
        write!(f, "PermutationTable(width={}, [", self.width)?;
        for (i, entry) in self.entries.iter().take(SHOWN).enumerate() {
            write!(f, "{}{}", if i > 0 { ", " } else { "" }, entry)?;
        }
        if self.entries.len() > SHOWN {
            write!(f, ", ...")?;
        }
        write!(f, "])")
    }
}

/// `2^width`, or a contract violation if that does not fit in `usize`.
fn table_size(width: usize) -> Result<usize, EmulationError> {
    u32::try_from(width)
        .ok()
        .and_then(|w| 1usize.checked_shl(w))
        .ok_or_else(|| EmulationError::ContractViolation {
            message: format!("Register width {} overflows the addressable table size", width),
        })
}

/// Unrolls `oracle` into the permutation `(x, y) -> (x, oracle(parameter, x, y))`
/// over an `nx`-qubit input register and an `ny`-qubit accumulator.
///
/// # Errors
/// * `EmulationError::ContractViolation` if `nx + ny` exceeds
///   [`DEFAULT_MAX_REGISTER_WIDTH`] or if the oracle returns a value that
///   does not fit in `ny` bits.
pub fn build_permutation_table(
    oracle: &dyn OracleFunction,
    parameter: u64,
    nx: usize,
    ny: usize,
) -> Result<PermutationTable, EmulationError> {
    build_permutation_table_bounded(oracle, parameter, nx, ny, DEFAULT_MAX_REGISTER_WIDTH)
}

/// [`build_permutation_table`] with an explicit width bound.
pub fn build_permutation_table_bounded(
    oracle: &dyn OracleFunction,
    parameter: u64,
    nx: usize,
    ny: usize,
    max_width: usize,
) -> Result<PermutationTable, EmulationError> {
    let width = nx.checked_add(ny).ok_or_else(|| EmulationError::ContractViolation {
        message: "Register width overflows usize".to_string(),
    })?;
    if width > max_width {
        return Err(EmulationError::ContractViolation {
            message: format!(
                "Register width {} (nx={}, ny={}) exceeds the emulation limit of {} qubits",
                width, nx, ny, max_width
            ),
        });
    }
    let size = table_size(width)?;
    let x_mask = (1usize << nx) - 1;
    let y_mask = (1usize << ny) - 1;

    let mut entries = Vec::with_capacity(size);
    for state in 0..size {
        let x = state & x_mask;
        let y = (state >> nx) & y_mask;
        let z = oracle.evaluate(parameter, x as u64, y as u64);
        if z > y_mask as u64 {
            return Err(EmulationError::ContractViolation {
                message: format!(
                    "Oracle returned {} for (parameter={}, x={}, y={}), which does not fit in {} accumulator qubit(s)",
                    z, parameter, x, y, ny
                ),
            });
        }
        entries.push(x | ((z as usize) << nx));
    }

    tracing::trace!(nx, ny, parameter, size, "unrolled oracle into permutation table");
    Ok(PermutationTable { entries, width })
}
