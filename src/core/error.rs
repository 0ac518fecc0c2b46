//! Error handling logic

use std::fmt;

/// Identifier of a qubit position inside a simulation.
///
/// Uniqueness is the responsibility of whoever allocates the qubits; the
/// engine orders its qubits by ascending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q({})", self.0)
    }
}

/// Errors raised while building, validating or applying an emulated oracle.
///
/// Every variant reflects a static misuse of the API (a malformed oracle,
/// a missing registration, a bad register) rather than a transient
/// condition. None of them is retried; they all stop the invocation before
/// the amplitude store is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulationError {
    /// The caller broke a precondition: an oracle returned a value that does
    /// not fit the accumulator, a register width does not match a table, or
    /// a register is too wide to unroll.
    ContractViolation {
        /// ContractViolation failure message
        message: String,
    },

    /// An emulated operation was invoked without a backing registration.
    UnregisteredOperation {
        /// Identifier that failed to resolve
        operation_id: String,
    },

    /// A permutation table is not a bijection over its index range.
    InvalidPermutation {
        /// InvalidPermutation failure message
        message: String,
    },

    /// A referenced qubit is not live in the engine, or was passed twice.
    LivenessViolation {
        /// Offending qubit
        qubit_id: QubitId,
        /// LivenessViolation failure message
        message: String,
    },

    /// A supplied amplitude state is not normalized.
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// General failure of the host engine itself.
    SimulationError {
        /// SimulationError failure message
        message: String,
    },
}

impl fmt::Display for EmulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmulationError::ContractViolation { message } => write!(f, "Contract Violation: {}", message),
            EmulationError::UnregisteredOperation { operation_id } => {
                write!(f, "Unregistered Operation: no oracle is registered for '{}'", operation_id)
            }
            EmulationError::InvalidPermutation { message } => write!(f, "Invalid Permutation: {}", message),
            EmulationError::LivenessViolation { qubit_id, message } => {
                write!(f, "Liveness Violation ({}): {}", qubit_id, message)
            }
            EmulationError::Incoherence { message } => write!(f, "Incoherence: {}", message),
            EmulationError::SimulationError { message } => write!(f, "Simulation Process Error: {}", message),
        }
    }
}

impl std::error::Error for EmulationError {}
