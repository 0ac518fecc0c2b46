// src/circuits/mod.rs

//! Ordered sequences of [`Operation`]s and a builder for them.

use crate::core::QubitId;
use crate::operations::Operation;
use std::collections::HashSet;
use std::fmt;

/// An ordered sequence of operations together with the set of qubits they
/// touch. The simulator allocates exactly that set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circuit {
    qubits: HashSet<QubitId>,
    operations: Vec<Operation>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation and records the qubits it involves.
    pub fn add_operation(&mut self, op: Operation) {
        self.qubits.extend(op.involved_qubits());
        self.operations.push(op);
    }

    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op);
        }
    }

    /// Declares a qubit without operating on it, e.g. an accumulator that is
    /// only read after the run.
    pub fn declare_qubit(&mut self, qubit: QubitId) {
        self.qubits.insert(qubit);
    }

    pub fn qubits(&self) -> &HashSet<QubitId> {
        &self.qubits
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The circuit undoing this one: adjoint operations in reverse order.
    ///
    /// Releases are dropped, since a released qubit cannot be revived.
    pub fn adjoint(&self) -> Circuit {
        let mut adjoint = Circuit {
            qubits: self.qubits.clone(),
            operations: Vec::with_capacity(self.operations.len()),
        };
        for op in self.operations.iter().rev() {
            if !matches!(op, Operation::Release { .. }) {
                adjoint.operations.push(op.adjoint());
            }
        }
        adjoint
    }
}

/// Fluent construction of [`Circuit`]s.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Flips every qubit of `register` whose bit is set in `value`, bit 0
    /// being `register[0]`. Prepares the basis input `|value⟩` from `|0...0⟩`.
    pub fn prepare_value(mut self, register: &[QubitId], value: u64) -> Self {
        for (bit, qubit) in register.iter().enumerate() {
            self.circuit.declare_qubit(*qubit);
            if bit < 64 && (value >> bit) & 1 == 1 {
                self.circuit.add_operation(Operation::Flip { target: *qubit });
            }
        }
        self
    }

    /// Appends an emulated oracle invocation.
    pub fn oracle(
        self,
        operation_id: impl Into<String>,
        parameter: u64,
        inputs: &[QubitId],
        accumulator: QubitId,
    ) -> Self {
        self.add_op(Operation::EmulatedOracle {
            operation_id: operation_id.into(),
            parameter,
            inputs: inputs.to_vec(),
            accumulator,
            inverse: false,
        })
    }

    pub fn build(self) -> Circuit {
        self.circuit
    }
}

fn register_label(qubits: &[QubitId]) -> String {
    let ids: Vec<String> = qubits.iter().map(|q| q.0.to_string()).collect();
    format!("[{}]", ids.join(","))
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qoracle::Circuit[{} operations on {} qubits]", self.operations.len(), self.qubits.len())?;
        for (t, op) in self.operations.iter().enumerate() {
            let dagger = |inverse: &bool| if *inverse { "†" } else { "" };
            match op {
                Operation::Flip { target } => writeln!(f, "  {:04}: X {}", t, target)?,
                Operation::Release { target } => writeln!(f, "  {:04}: release {}", t, target)?,
                Operation::PermuteBasis { targets, table, inverse } => writeln!(
                    f,
                    "  {:04}: Perm{} {} ({} entries)",
                    t,
                    dagger(inverse),
                    register_label(targets),
                    table.len()
                )?,
                Operation::EmulatedOracle { operation_id, parameter, inputs, accumulator, inverse } => writeln!(
                    f,
                    "  {:04}: {}{}({}) x={} y={}",
                    t,
                    operation_id,
                    dagger(inverse),
                    parameter,
                    register_label(inputs),
                    accumulator
                )?,
            }
        }
        Ok(())
    }
}
