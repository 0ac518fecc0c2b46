// src/emulator/mod.rs

//! The emulated-operation invocation point.
//!
//! An invocation resolves the operation identifier, checks the register,
//! unrolls the oracle into a table, certifies the table and only then lets
//! the backend move amplitudes. Every failure is reported before the
//! backend is mutated.

mod config;

pub use config::EmulatorConfig;

use crate::core::{EmulationError, QubitId};
use crate::oracles::OracleFunction;
use crate::permutation::{build_permutation_table_bounded, PermutationTable};
use crate::registry::{OracleEntry, OracleRegistry};
use crate::validation::check_permutation;
use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// The boundary the emulator needs from a simulation engine.
pub trait PermutationBackend {
    /// Fails unless every qubit is live and no qubit appears twice.
    /// `label` names the register in error messages.
    fn check_qubits(&self, qubits: &[QubitId], label: &str) -> Result<(), EmulationError>;

    /// Applies `table` to the register `qubits` in place. Register bit `j`
    /// is `qubits[j]`; the table width must equal `qubits.len()`.
    fn permute_basis(&mut self, qubits: &[QubitId], table: &PermutationTable) -> Result<(), EmulationError>;

    /// Applies the inverse of `table` to the register `qubits` in place.
    fn adj_permute_basis(&mut self, qubits: &[QubitId], table: &PermutationTable) -> Result<(), EmulationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TableKey {
    operation_id: String,
    parameter: u64,
    nx: usize,
    ny: usize,
}

/// Runs registered oracles against a [`PermutationBackend`].
///
/// ```
/// use qoracle::{DecorationOracle, OracleEmulator, OracleRegistry, QubitId, SimulationEngine};
/// use std::collections::HashSet;
///
/// let mut registry = OracleRegistry::new();
/// registry.register("decorations", DecorationOracle);
///
/// // one-layer tree: a single input qubit and the accumulator
/// let qubits: HashSet<QubitId> = [QubitId(0), QubitId(1)].into_iter().collect();
/// let mut engine = SimulationEngine::init(&qubits).unwrap();
/// engine.flip(QubitId(0)).unwrap(); // decorate the only branch
///
/// let mut emulator = OracleEmulator::new(&registry);
/// emulator
///     .invoke(&mut engine, "decorations", 1, &[QubitId(0)], QubitId(1), false)
///     .unwrap();
///
/// // |x=1, y=0> became |x=1, y=1>
/// assert_eq!(engine.state().vector()[0b11].re, 1.0);
/// ```
#[derive(Debug)]
pub struct OracleEmulator<'r> {
    registry: &'r OracleRegistry,
    config: EmulatorConfig,
    cache: HashMap<TableKey, PermutationTable>,
}

impl<'r> OracleEmulator<'r> {
    /// Creates an emulator over `registry` with the default configuration.
    pub fn new(registry: &'r OracleRegistry) -> Self {
        Self::with_config(registry, EmulatorConfig::default())
    }

    pub fn with_config(registry: &'r OracleRegistry, config: EmulatorConfig) -> Self {
        Self {
            registry,
            config,
            cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Number of tables currently held by the cache.
    pub fn cached_tables(&self) -> usize {
        self.cache.len()
    }

    /// Invokes `operation_id` on the input register `inputs` with the single
    /// accumulator qubit `accumulator`.
    pub fn invoke<B>(
        &mut self,
        backend: &mut B,
        operation_id: &str,
        parameter: u64,
        inputs: &[QubitId],
        accumulator: QubitId,
        inverse: bool,
    ) -> Result<(), EmulationError>
    where
        B: PermutationBackend + ?Sized,
    {
        self.invoke_register(backend, operation_id, parameter, inputs, &[accumulator], inverse)
    }

    /// Invokes `operation_id` with an accumulator register of any width.
    pub fn invoke_register<B>(
        &mut self,
        backend: &mut B,
        operation_id: &str,
        parameter: u64,
        inputs: &[QubitId],
        accumulators: &[QubitId],
        inverse: bool,
    ) -> Result<(), EmulationError>
    where
        B: PermutationBackend + ?Sized,
    {
        let _span = tracing::debug_span!("emulated_oracle", operation_id, parameter, inverse).entered();

        let registry = self.registry;
        let entry = registry.resolve(operation_id)?;
        let register = check_register(backend, inputs, accumulators)?;
        let table = self.table_for(entry, operation_id, parameter, inputs.len(), accumulators.len())?;
        apply_table(backend, &register, &table, inverse)
    }

    /// Produces a certified table for one invocation.
    fn table_for<'s>(
        &'s mut self,
        entry: &'s OracleEntry,
        operation_id: &str,
        parameter: u64,
        nx: usize,
        ny: usize,
    ) -> Result<Cow<'s, PermutationTable>, EmulationError> {
        let oracle = match entry {
            OracleEntry::Table(table) => {
                if table.width() != nx + ny {
                    return Err(EmulationError::ContractViolation {
                        message: format!(
                            "Operation '{}' is registered with a width-{} table but was invoked on {} + {} qubits",
                            operation_id,
                            table.width(),
                            nx,
                            ny
                        ),
                    });
                }
                check_permutation(table)?;
                return Ok(Cow::Borrowed(table));
            }
            OracleEntry::Function(oracle) => oracle,
        };

        if !self.config.cache_tables {
            let table = certified_table(oracle.as_ref(), parameter, nx, ny, &self.config)?;
            return Ok(Cow::Owned(table));
        }

        let key = TableKey {
            operation_id: operation_id.to_string(),
            parameter,
            nx,
            ny,
        };
        match self.cache.entry(key) {
            Entry::Occupied(cached) => {
                tracing::trace!("table cache hit");
                Ok(Cow::Borrowed(cached.into_mut()))
            }
            Entry::Vacant(slot) => {
                let table = certified_table(oracle.as_ref(), parameter, nx, ny, &self.config)?;
                tracing::trace!("table cache miss");
                Ok(Cow::Borrowed(slot.insert(table)))
            }
        }
    }
}

/// Builds and certifies a table; a non-bijective table never leaves here.
fn certified_table(
    oracle: &dyn OracleFunction,
    parameter: u64,
    nx: usize,
    ny: usize,
    config: &EmulatorConfig,
) -> Result<PermutationTable, EmulationError> {
    let table = build_permutation_table_bounded(oracle, parameter, nx, ny, config.max_register_width)?;
    check_permutation(&table)?;
    tracing::debug!(nx, ny, entries = table.len(), "built permutation table");
    Ok(table)
}

/// Checks both registers and returns the joint register `inputs ++ accumulators`.
fn check_register<B>(backend: &B, inputs: &[QubitId], accumulators: &[QubitId]) -> Result<Vec<QubitId>, EmulationError>
where
    B: PermutationBackend + ?Sized,
{
    backend.check_qubits(inputs, "x")?;
    backend.check_qubits(accumulators, "y")?;
    let register: Vec<QubitId> = inputs.iter().chain(accumulators).copied().collect();
    backend.check_qubits(&register, "x ++ y")?;
    Ok(register)
}

fn apply_table<B>(backend: &mut B, register: &[QubitId], table: &PermutationTable, inverse: bool) -> Result<(), EmulationError>
where
    B: PermutationBackend + ?Sized,
{
    if inverse {
        backend.adj_permute_basis(register, table)?;
    } else {
        backend.permute_basis(register, table)?;
    }
    tracing::debug!(qubits = register.len(), inverse, "applied permutation");
    Ok(())
}

/// Emulates `oracle` directly, without a registry or cache.
///
/// Applies `(x, y) -> (x, oracle(parameter, x, y))` to the register
/// `inputs ++ accumulators`, or its inverse.
pub fn apply_oracle<B>(
    backend: &mut B,
    oracle: &dyn OracleFunction,
    parameter: u64,
    inputs: &[QubitId],
    accumulators: &[QubitId],
    inverse: bool,
    config: &EmulatorConfig,
) -> Result<(), EmulationError>
where
    B: PermutationBackend + ?Sized,
{
    let register = check_register(backend, inputs, accumulators)?;
    let table = certified_table(oracle, parameter, inputs.len(), accumulators.len(), config)?;
    apply_table(backend, &register, &table, inverse)
}
