// src/simulation/results.rs
use crate::core::{AmplitudeState, QubitId};
use std::collections::HashMap;
use std::fmt;

/// Squared magnitudes at or below this are left out of the printed state.
const DISPLAY_THRESHOLD: f64 = 1e-12;

/// Holds the results of a circuit simulation: the final amplitude store and
/// the qubit layout needed to read it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationResult {
    /// Qubits of the run, most significant bit of a basis index first.
    qubit_order: Vec<QubitId>,
    final_state: Option<AmplitudeState>,
}

impl SimulationResult {
    /// Creates a new, empty result set. (Internal visibility)
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_state(qubit_order: Vec<QubitId>, final_state: AmplitudeState) -> Self {
        Self {
            qubit_order,
            final_state: Some(final_state),
        }
    }

    /// The amplitudes after the last operation; `None` for an empty circuit.
    pub fn final_state(&self) -> Option<&AmplitudeState> {
        self.final_state.as_ref()
    }

    pub fn qubit_order(&self) -> &[QubitId] {
        &self.qubit_order
    }

    /// Reads the value of `qubit` in the basis index `index`.
    /// Returns `None` if the qubit was not part of the run.
    pub fn qubit_value(&self, index: usize, qubit: QubitId) -> Option<u64> {
        let n = self.qubit_order.len();
        let position = self.qubit_order.iter().position(|q| *q == qubit)?;
        Some(((index >> (n - 1 - position)) & 1) as u64)
    }

    /// The basis index carrying the largest probability, if any.
    pub fn dominant_index(&self) -> Option<usize> {
        let state = self.final_state.as_ref()?;
        state
            .vector()
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm_sqr().total_cmp(&b.norm_sqr()))
            .map(|(index, _)| index)
    }

    /// Per-qubit values of the most probable basis state.
    ///
    /// Permutations never spread amplitude, so a run started from a basis
    /// state ends in exactly one basis state and this is its readout.
    pub fn dominant_outcome(&self) -> Option<HashMap<QubitId, u64>> {
        let index = self.dominant_index()?;
        self.qubit_order
            .iter()
            .map(|qubit| self.qubit_value(index, *qubit).map(|value| (*qubit, value)))
            .collect()
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        let Some(state) = &self.final_state else {
            return writeln!(f, "  No qubits were simulated.");
        };
        let order: Vec<String> = self.qubit_order.iter().map(|q| q.to_string()).collect();
        writeln!(f, "  Qubit order (MSB first): {}", order.join(" "))?;
        let n = self.qubit_order.len();
        for (index, amp) in state.vector().iter().enumerate() {
            if amp.norm_sqr() > DISPLAY_THRESHOLD {
                writeln!(f, "    |{:0width$b}>: {:.6} (p={:.6})", index, amp, amp.norm_sqr(), width = n)?;
            }
        }
        Ok(())
    }
}
