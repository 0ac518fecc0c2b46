// src/operations/mod.rs

//! Operations a [`Circuit`](crate::Circuit) can hold.
//!
//! All of them are basis permutations, so every operation has an exact
//! adjoint and the engine never does amplitude arithmetic.

use crate::core::QubitId;
use crate::permutation::PermutationTable;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Bit flip of a single qubit (the permutation [1, 0]).
    Flip {
        target: QubitId,
    },

    /// A fixed permutation applied to an explicit register.
    ///
    /// The table is certified before it is applied.
    PermuteBasis {
        /// Register bit `j` is `targets[j]`.
        targets: Vec<QubitId>,
        table: PermutationTable,
        inverse: bool,
    },

    /// An oracle resolved through the [`OracleRegistry`](crate::OracleRegistry)
    /// at run time and applied as `(x, y) -> (x, oracle(parameter, x, y))`.
    EmulatedOracle {
        /// Registry key of the oracle.
        operation_id: String,
        /// Runtime argument handed to the oracle (e.g. the tree's layer count).
        parameter: u64,
        /// Input register, least significant bit first.
        inputs: Vec<QubitId>,
        /// Accumulator qubit receiving the oracle's output.
        accumulator: QubitId,
        /// Apply the inverse permutation.
        inverse: bool,
    },

    /// Hands a qubit back; it must be in |0> and cannot be addressed again.
    Release {
        target: QubitId,
    },
}

impl Operation {
    /// Returns every qubit id mentioned in the operation's parameters.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Flip { target } | Operation::Release { target } => vec![*target],
            Operation::PermuteBasis { targets, .. } => targets.clone(),
            Operation::EmulatedOracle { inputs, accumulator, .. } => {
                let mut qubits = inputs.clone();
                qubits.push(*accumulator);
                qubits
            }
        }
    }

    /// The operation undoing this one.
    ///
    /// Flips are their own inverse; permutations toggle their `inverse`
    /// flag. A release has no adjoint and is returned unchanged.
    pub fn adjoint(&self) -> Operation {
        match self {
            Operation::PermuteBasis { targets, table, inverse } => Operation::PermuteBasis {
                targets: targets.clone(),
                table: table.clone(),
                inverse: !inverse,
            },
            Operation::EmulatedOracle { operation_id, parameter, inputs, accumulator, inverse } => {
                Operation::EmulatedOracle {
                    operation_id: operation_id.clone(),
                    parameter: *parameter,
                    inputs: inputs.clone(),
                    accumulator: *accumulator,
                    inverse: !inverse,
                }
            }
            Operation::Flip { .. } | Operation::Release { .. } => self.clone(),
        }
    }
}
