// src/registry/mod.rs

//! Binding of operation identifiers to oracle implementations.
//!
//! The registry is filled during setup (`&mut`) and read during a run
//! (`&`). It is an ordinary value handed to whatever drives the
//! simulation; nothing is stored globally.

use crate::core::EmulationError;
use crate::oracles::OracleFunction;
use crate::permutation::PermutationTable;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What an operation identifier resolves to.
#[derive(Clone)]
pub enum OracleEntry {
    /// A classical function unrolled into a table on each invocation.
    Function(Arc<dyn OracleFunction>),
    /// A fixed permutation; the invocation parameter is ignored.
    Table(PermutationTable),
}

impl fmt::Debug for OracleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleEntry::Function(_) => write!(f, "OracleEntry::Function(..)"),
            OracleEntry::Table(table) => write!(f, "OracleEntry::Table({:?})", table),
        }
    }
}

/// Maps operation identifiers to oracle entries.
///
/// ```
/// use qoracle::{DecorationOracle, OracleRegistry};
///
/// let mut registry = OracleRegistry::new();
/// registry.register("decorations", DecorationOracle);
/// assert!(registry.resolve("decorations").is_ok());
/// assert!(registry.resolve("sudoku").is_err());
/// ```
#[derive(Clone, Default)]
pub struct OracleRegistry {
    entries: HashMap<String, OracleEntry>,
}

impl OracleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `operation_id` to `oracle`. A previous binding is replaced and
    /// returned.
    pub fn register<O>(&mut self, operation_id: impl Into<String>, oracle: O) -> Option<OracleEntry>
    where
        O: OracleFunction + 'static,
    {
        self.insert(operation_id.into(), OracleEntry::Function(Arc::new(oracle)))
    }

    /// Binds `operation_id` to an oracle that is already shared elsewhere.
    pub fn register_shared(
        &mut self,
        operation_id: impl Into<String>,
        oracle: Arc<dyn OracleFunction>,
    ) -> Option<OracleEntry> {
        self.insert(operation_id.into(), OracleEntry::Function(oracle))
    }

    /// Binds `operation_id` to a pre-built permutation.
    pub fn register_table(&mut self, operation_id: impl Into<String>, table: PermutationTable) -> Option<OracleEntry> {
        self.insert(operation_id.into(), OracleEntry::Table(table))
    }

    fn insert(&mut self, operation_id: String, entry: OracleEntry) -> Option<OracleEntry> {
        let previous = self.entries.insert(operation_id.clone(), entry);
        tracing::debug!(operation_id = %operation_id, replaced = previous.is_some(), "registered oracle");
        previous
    }

    /// Looks up the entry bound to `operation_id`.
    ///
    /// # Errors
    /// `EmulationError::UnregisteredOperation` if nothing was registered
    /// under that identifier.
    pub fn resolve(&self, operation_id: &str) -> Result<&OracleEntry, EmulationError> {
        self.entries.get(operation_id).ok_or_else(|| EmulationError::UnregisteredOperation {
            operation_id: operation_id.to_string(),
        })
    }

    pub fn contains(&self, operation_id: &str) -> bool {
        self.entries.contains_key(operation_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered identifiers in sorted order.
    pub fn operation_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for OracleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleRegistry").field("operation_ids", &self.operation_ids()).finish()
    }
}
