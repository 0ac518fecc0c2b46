// src/simulation/mod.rs

//! Runs [`Circuit`]s of basis permutations and emulated oracles.
//! This module contains the `Simulator` entry point and the
//! `SimulationEngine` that owns the amplitude store.

mod engine;
mod results;

pub use engine::SimulationEngine;
pub use results::SimulationResult;

use crate::circuits::Circuit;
use crate::core::EmulationError;
use crate::emulator::{EmulatorConfig, OracleEmulator, PermutationBackend};
use crate::operations::Operation;
use crate::registry::OracleRegistry;
use crate::validation::check_permutation;

/// Executes circuits against a [`SimulationEngine`], resolving emulated
/// oracles through an [`OracleRegistry`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Simulator {
    config: EmulatorConfig,
}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Runs `circuit` from `|0...0⟩` over exactly the qubits it involves.
    ///
    /// # Returns
    /// * `Ok(SimulationResult)` holding the final state, or an empty result
    ///   when the circuit touches no qubits.
    /// * `Err(EmulationError)` from the first operation that fails.
    pub fn run(&self, circuit: &Circuit, registry: &OracleRegistry) -> Result<SimulationResult, EmulationError> {
        if circuit.qubits().is_empty() {
            return Ok(SimulationResult::new());
        }
        let mut engine = SimulationEngine::init(circuit.qubits())?;
        self.run_on(&mut engine, circuit, registry)
    }

    /// Runs `circuit` on an existing engine, e.g. one built with
    /// [`SimulationEngine::with_state`].
    ///
    /// Each operation is all-or-nothing. When one fails, the operations
    /// before it stay applied and the engine is left in that state.
    pub fn run_on(
        &self,
        engine: &mut SimulationEngine,
        circuit: &Circuit,
        registry: &OracleRegistry,
    ) -> Result<SimulationResult, EmulationError> {
        let _span = tracing::debug_span!("run", operations = circuit.len()).entered();
        let mut emulator = OracleEmulator::with_config(registry, self.config);

        for (step, op) in circuit.operations().iter().enumerate() {
            tracing::trace!(step, ?op, "applying operation");
            match op {
                Operation::Flip { target } => engine.flip(*target)?,
                Operation::Release { target } => engine.release(*target)?,
                Operation::PermuteBasis { targets, table, inverse } => {
                    check_permutation(table)?;
                    if *inverse {
                        engine.adj_permute_basis(targets, table)?;
                    } else {
                        engine.permute_basis(targets, table)?;
                    }
                }
                Operation::EmulatedOracle { operation_id, parameter, inputs, accumulator, inverse } => {
                    emulator.invoke(engine, operation_id, *parameter, inputs, *accumulator, *inverse)?;
                }
            }
        }

        Ok(SimulationResult::from_state(engine.qubit_order(), engine.state().clone()))
    }
}
