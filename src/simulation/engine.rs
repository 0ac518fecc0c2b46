// src/simulation/engine.rs
use crate::core::{AmplitudeState, EmulationError, QubitId};
use crate::emulator::PermutationBackend;
use crate::permutation::PermutationTable;
use crate::validation::check_normalization;
use num_complex::Complex;
use num_traits::Zero;
use std::collections::{HashMap, HashSet};

/// Amplitudes at or below this squared magnitude count as zero when a
/// qubit is released.
const RELEASE_TOLERANCE: f64 = 1e-12;

/// Host engine owning the amplitude store the emulator permutes.
///
/// It knows no gates beyond basis permutations: states are prepared by
/// flipping qubits or supplied whole through [`SimulationEngine::with_state`].
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    /// Maps qubit ids to their index (0..N-1); index 0 is the most
    /// significant bit of a global basis index.
    qubit_indices: HashMap<QubitId, usize>,
    /// Qubits that were released and may no longer be addressed.
    released: HashSet<QubitId>,
    global_state: AmplitudeState,
    num_qubits: usize,
}

impl SimulationEngine {
    /// Initializes the engine for the given qubits in the state |0...0>.
    pub fn init(qubit_ids: &HashSet<QubitId>) -> Result<Self, EmulationError> {
        if qubit_ids.is_empty() {
            return Err(EmulationError::SimulationError {
                message: "Cannot initialize simulation engine with zero qubits".to_string(),
            });
        }
        let num_qubits = qubit_ids.len();
        let initial = AmplitudeState::basis(num_qubits, 0)?;
        Ok(Self::assemble(qubit_ids, initial))
    }

    /// Initializes the engine for the given qubits starting from `state`.
    ///
    /// # Errors
    /// * `EmulationError::SimulationError` if the state dimension does not
    ///   match the qubit count.
    /// * `EmulationError::Incoherence` if the state is not normalized.
    pub fn with_state(qubit_ids: &HashSet<QubitId>, state: AmplitudeState) -> Result<Self, EmulationError> {
        if qubit_ids.is_empty() || state.num_qubits() != qubit_ids.len() {
            return Err(EmulationError::SimulationError {
                message: format!(
                    "Cannot set state: dimension {} does not match {} qubits",
                    state.dim(),
                    qubit_ids.len()
                ),
            });
        }
        check_normalization(&state, None)?;
        Ok(Self::assemble(qubit_ids, state))
    }

    fn assemble(qubit_ids: &HashSet<QubitId>, global_state: AmplitudeState) -> Self {
        // Sort ids so index assignment does not depend on HashSet order.
        let mut sorted_ids: Vec<QubitId> = qubit_ids.iter().copied().collect();
        sorted_ids.sort();
        let qubit_indices = sorted_ids.into_iter().enumerate().map(|(index, id)| (id, index)).collect();
        Self {
            qubit_indices,
            released: HashSet::new(),
            global_state,
            num_qubits: qubit_ids.len(),
        }
    }

    /// The current amplitude store.
    pub fn state(&self) -> &AmplitudeState {
        &self.global_state
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// All qubits of the engine, most significant first.
    pub fn qubit_order(&self) -> Vec<QubitId> {
        let mut order: Vec<(usize, QubitId)> = self.qubit_indices.iter().map(|(id, index)| (*index, *id)).collect();
        order.sort();
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// `true` if the qubit belongs to the engine and has not been released.
    pub fn is_live(&self, qubit: QubitId) -> bool {
        self.qubit_indices.contains_key(&qubit) && !self.released.contains(&qubit)
    }

    /// Bit position of `qubit` inside a global basis index.
    pub(crate) fn bit_position(&self, qubit: QubitId) -> Result<usize, EmulationError> {
        self.qubit_indices
            .get(&qubit)
            .map(|index| self.num_qubits - 1 - index)
            .ok_or_else(|| EmulationError::LivenessViolation {
                qubit_id: qubit,
                message: "qubit is not part of this simulation".to_string(),
            })
    }

    /// Flips `qubit`, i.e. applies the one-qubit permutation [1, 0].
    pub fn flip(&mut self, qubit: QubitId) -> Result<(), EmulationError> {
        let flip = PermutationTable::from_entries(vec![1, 0])?;
        self.apply_permutation(&[qubit], &flip, false)
    }

    /// XORs `value` into `register` (bit `j` into `register[j]`) by flipping
    /// qubits. From `|0...0⟩` this prepares the basis state `|value⟩`.
    pub fn prepare_basis_state(&mut self, register: &[QubitId], value: u64) -> Result<(), EmulationError> {
        if register.len() < 64 && value >> register.len() != 0 {
            return Err(EmulationError::ContractViolation {
                message: format!("Value {} does not fit a register of {} qubits", value, register.len()),
            });
        }
        self.check_qubits(register, "prepare")?;
        for (bit, qubit) in register.iter().enumerate() {
            if bit < 64 && (value >> bit) & 1 == 1 {
                self.flip(*qubit)?;
            }
        }
        Ok(())
    }

    /// Releases `qubit`. It must be live and in the |0> state on every branch
    /// of the superposition.
    pub fn release(&mut self, qubit: QubitId) -> Result<(), EmulationError> {
        self.check_qubits(&[qubit], "release")?;
        let mask = 1usize << self.bit_position(qubit)?;
        let dirty = self
            .global_state
            .vector()
            .iter()
            .enumerate()
            .any(|(index, amp)| index & mask != 0 && amp.norm_sqr() > RELEASE_TOLERANCE);
        if dirty {
            return Err(EmulationError::ContractViolation {
                message: format!("Released qubit {} is not in the zero state", qubit),
            });
        }
        self.released.insert(qubit);
        tracing::trace!(%qubit, "released qubit");
        Ok(())
    }

    /// Moves amplitudes according to `table` across the register `qubits`.
    ///
    /// Register bit `j` (bit `j` of a table index) is `qubits[j]`. Forward
    /// application sends the amplitude at local index `i` to `table[i]`;
    /// inverse application undoes exactly that. Every assignment of the
    /// remaining qubits is permuted the same way.
    ///
    /// The new vector is assembled aside and swapped in at the end, so a
    /// failure leaves the store untouched.
    fn apply_permutation(
        &mut self,
        qubits: &[QubitId],
        table: &PermutationTable,
        inverse: bool,
    ) -> Result<(), EmulationError> {
        if qubits.len() != table.width() {
            return Err(EmulationError::ContractViolation {
                message: format!(
                    "Register of {} qubits cannot take a table of width {} ({} entries)",
                    qubits.len(),
                    table.width(),
                    table.len()
                ),
            });
        }
        self.check_qubits(qubits, "register")?;

        let positions = qubits
            .iter()
            .map(|qubit| self.bit_position(*qubit))
            .collect::<Result<Vec<usize>, _>>()?;
        // scatter[local] = the register bits of `local` placed at their global positions
        let scatter: Vec<usize> = (0..table.len())
            .map(|local| {
                positions
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| (local >> bit) & 1 == 1)
                    .fold(0usize, |acc, (_, position)| acc | (1 << position))
            })
            .collect();
        let register_mask = positions.iter().fold(0usize, |acc, position| acc | (1 << position));

        let dim = self.global_state.dim();
        let old = self.global_state.vector();
        let mut new_vec = vec![Complex::zero(); dim];

        for rest in (0..dim).filter(|index| index & register_mask == 0) {
            for (local, &target) in table.entries().iter().enumerate() {
                let mapped = scatter.get(target).ok_or_else(|| EmulationError::ContractViolation {
                    message: format!("Table entry {} -> {} is outside the register range", local, target),
                })?;
                let source = rest | scatter[local];
                let dest = rest | mapped;
                if inverse {
                    new_vec[source] = old[dest];
                } else {
                    new_vec[dest] = old[source];
                }
            }
        }

        self.global_state = AmplitudeState::new(new_vec);
        Ok(())
    }
}

impl PermutationBackend for SimulationEngine {
    fn check_qubits(&self, qubits: &[QubitId], label: &str) -> Result<(), EmulationError> {
        let mut seen = HashSet::with_capacity(qubits.len());
        for &qubit in qubits {
            if !self.qubit_indices.contains_key(&qubit) {
                return Err(EmulationError::LivenessViolation {
                    qubit_id: qubit,
                    message: format!("qubit in '{}' is not part of this simulation", label),
                });
            }
            if self.released.contains(&qubit) {
                return Err(EmulationError::LivenessViolation {
                    qubit_id: qubit,
                    message: format!("qubit in '{}' has already been released", label),
                });
            }
            if !seen.insert(qubit) {
                return Err(EmulationError::LivenessViolation {
                    qubit_id: qubit,
                    message: format!("qubit appears more than once in '{}'", label),
                });
            }
        }
        Ok(())
    }

    fn permute_basis(&mut self, qubits: &[QubitId], table: &PermutationTable) -> Result<(), EmulationError> {
        self.apply_permutation(qubits, table, false)
    }

    fn adj_permute_basis(&mut self, qubits: &[QubitId], table: &PermutationTable) -> Result<(), EmulationError> {
        self.apply_permutation(qubits, table, true)
    }
}
