// src/lib.rs

//! `qoracle` - emulation of classical oracles on a simulated quantum register
//!
//! A classical function `f(parameter, x, y)` that is bijective in `(x, y)` is
//! unrolled into a table over every basis state of the register `x ++ y`,
//! certified as a permutation, and applied to the simulator's amplitudes in
//! one pass instead of being synthesized into gates.
//!
//! The crate ships the decoration oracle used by a tree-decorating search
//! ([`DecorationOracle`]), a registry binding operation identifiers to
//! oracles, and a small simulator made only of basis permutations.

pub mod core;
pub mod oracles;
pub mod permutation;
pub mod validation;
pub mod registry;
pub mod emulator;
pub mod operations;
pub mod circuits;
pub mod simulation;

// Re-export the most common types for easier top-level use
pub use core::{AmplitudeState, EmulationError, QubitId};
pub use oracles::{decorations_check, xor_accumulate, DecorationOracle, OracleFunction, XorOracle};
pub use permutation::{build_permutation_table, PermutationTable};
pub use validation::{check_permutation, is_permutation};
pub use registry::{OracleEntry, OracleRegistry};
pub use emulator::{apply_oracle, EmulatorConfig, OracleEmulator, PermutationBackend};
pub use operations::Operation;
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{SimulationEngine, SimulationResult, Simulator};

// Example 1: Marking valid decorations
// Prepares each input of a two-layer tree as a basis state and lets the
// emulated oracle write the verdict into the accumulator.
/// ```
/// use qoracle::{
///     decorations_check, CircuitBuilder, DecorationOracle, EmulationError, OracleRegistry,
///     QubitId, Simulator,
/// };
///
/// fn qid(id: u64) -> QubitId { QubitId(id) }
///
/// let mut registry = OracleRegistry::new();
/// registry.register("decorations", DecorationOracle);
///
/// let inputs: Vec<QubitId> = (0..4).map(qid).collect(); // 2 layers -> 4 branches
/// let accumulator = qid(4);
/// let simulator = Simulator::new();
///
/// for x in 0..16u64 {
///     let circuit = CircuitBuilder::new()
///         .prepare_value(&inputs, x)
///         .oracle("decorations", 2, &inputs, accumulator)
///         .build();
///     let result = simulator.run(&circuit, &registry)?;
///     let outcome = result.dominant_outcome().unwrap_or_default();
///     assert_eq!(outcome.get(&accumulator), Some(&decorations_check(2, x)));
/// }
/// # Ok::<(), EmulationError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Rejecting a non-bijective oracle
// An oracle that overwrites the accumulator instead of XORing into it is not
// a permutation; the invocation fails and the state is left as it was.
/// ```
/// use qoracle::{EmulationError, OracleEmulator, OracleRegistry, QubitId, SimulationEngine};
/// use std::collections::HashSet;
///
/// let mut registry = OracleRegistry::new();
/// registry.register("overwrite", |_p: u64, x: u64, _y: u64| x & 1);
///
/// let qubits: HashSet<QubitId> = [QubitId(0), QubitId(1)].into_iter().collect();
/// let mut engine = SimulationEngine::init(&qubits)?;
/// let before = engine.state().clone();
///
/// let mut emulator = OracleEmulator::new(&registry);
/// let err = emulator
///     .invoke(&mut engine, "overwrite", 0, &[QubitId(0)], QubitId(1), false)
///     .unwrap_err();
/// assert!(matches!(err, EmulationError::InvalidPermutation { .. }));
/// assert_eq!(engine.state(), &before);
/// # Ok::<(), EmulationError>(())
/// ```
#[doc(hidden)]
const _: () = ();
