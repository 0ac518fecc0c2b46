// src/core/state.rs

use super::error::EmulationError;
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// The amplitude store of a simulation: one complex coefficient per basis
/// state of `n` qubits, so the vector always has length `2^n`.
///
/// The crate never does amplitude arithmetic on it. Oracles only move
/// coefficients between slots, so norms and phases are carried through
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeState {
    amplitudes: Vec<Complex<f64>>,
}

impl AmplitudeState {
    /// Wraps a raw amplitude vector. Internal callers guarantee the length.
    pub(crate) fn new(amplitudes: Vec<Complex<f64>>) -> Self {
        Self { amplitudes }
    }

    /// Builds a state from caller-supplied amplitudes.
    ///
    /// # Errors
    /// Returns `EmulationError::SimulationError` if the vector is empty or
    /// its length is not a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Result<Self, EmulationError> {
        if amplitudes.is_empty() || !amplitudes.len().is_power_of_two() {
            return Err(EmulationError::SimulationError {
                message: format!("Amplitude vector length {} is not a positive power of two", amplitudes.len()),
            });
        }
        Ok(Self { amplitudes })
    }

    /// The computational basis state `|index⟩` over `num_qubits` qubits.
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self, EmulationError> {
        let dim = 1usize.checked_shl(num_qubits as u32).ok_or_else(|| EmulationError::SimulationError {
            message: format!("{} qubits overflow the addressable state dimension", num_qubits),
        })?;
        if index >= dim {
            return Err(EmulationError::SimulationError {
                message: format!("Basis index {} out of range for dimension {}", index, dim),
            });
        }
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[index] = Complex::new(1.0, 0.0);
        Ok(Self { amplitudes })
    }

    /// Read-only access to the amplitudes.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Number of basis states.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits the state spans.
    pub fn num_qubits(&self) -> usize {
        self.amplitudes.len().trailing_zeros() as usize
    }
}

impl fmt::Display for AmplitudeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amplitudes[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_amplitudes_rejects_odd_lengths() {
        let three = vec![Complex::new(1.0, 0.0), Complex::zero(), Complex::zero()];
        assert!(matches!(
            AmplitudeState::from_amplitudes(three),
            Err(EmulationError::SimulationError { .. })
        ));
        assert!(AmplitudeState::from_amplitudes(Vec::new()).is_err());
    }

    #[test]
    fn basis_state_has_single_unit_amplitude() -> Result<(), EmulationError> {
        let state = AmplitudeState::basis(3, 5)?;
        assert_eq!(state.dim(), 8);
        assert_eq!(state.num_qubits(), 3);
        for (i, amp) in state.vector().iter().enumerate() {
            let expected = if i == 5 { 1.0 } else { 0.0 };
            assert_eq!(amp.re, expected);
            assert_eq!(amp.im, 0.0);
        }
        assert!(AmplitudeState::basis(2, 4).is_err());
        Ok(())
    }
}
