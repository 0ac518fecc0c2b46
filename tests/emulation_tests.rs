// tests/emulation_tests.rs

use qoracle::{
    decorations_check, xor_accumulate, AmplitudeState, CircuitBuilder, DecorationOracle, EmulationError,
    EmulatorConfig, Operation, OracleEmulator, OracleRegistry, PermutationTable, QubitId, SimulationEngine,
    Simulator,
};

use num_complex::Complex;
use std::collections::HashSet;

// Helper function to create QubitId for tests
fn qid(id: u64) -> QubitId {
    QubitId(id)
}

fn qubit_set(ids: &[QubitId]) -> HashSet<QubitId> {
    ids.iter().copied().collect()
}

/// Global basis index in which `register` holds `value` and every other
/// qubit is 0. `order` is the engine's qubit order, most significant first.
fn index_of(order: &[QubitId], register: &[QubitId], value: u64) -> usize {
    let n = order.len();
    register
        .iter()
        .enumerate()
        .filter(|(bit, _)| (value >> bit) & 1 == 1)
        .map(|(_, qubit)| {
            let position = order.iter().position(|q| q == qubit).expect("qubit in order");
            1usize << (n - 1 - position)
        })
        .sum()
}

fn decoration_registry() -> OracleRegistry {
    let mut registry = OracleRegistry::new();
    registry.register("decorations", DecorationOracle);
    registry
}

#[test]
fn test_every_two_layer_input_is_marked_correctly() -> Result<(), EmulationError> {
    let registry = decoration_registry();
    let inputs: Vec<QubitId> = (0..4).map(qid).collect();
    let y = qid(4);
    let simulator = Simulator::new();

    for x in 0..16u64 {
        for y_start in 0..2u64 {
            let circuit = CircuitBuilder::new()
                .prepare_value(&inputs, x)
                .prepare_value(&[y], y_start)
                .oracle("decorations", 2, &inputs, y)
                .build();
            let result = simulator.run(&circuit, &registry)?;
            let outcome = result.dominant_outcome().expect("non-empty result");
            assert_eq!(outcome[&y], decorations_check(2, x) ^ y_start, "x = {:04b}, y = {}", x, y_start);
            for (bit, qubit) in inputs.iter().enumerate() {
                assert_eq!(outcome[qubit], (x >> bit) & 1, "input register must be unchanged");
            }
        }
    }
    Ok(())
}

#[test]
fn test_superposition_over_inputs_is_permuted_coherently() -> Result<(), EmulationError> {
    let inputs: Vec<QubitId> = (0..4).map(qid).collect();
    let y = qid(4);
    let mut all = inputs.clone();
    all.push(y);

    // uniform superposition over x with y = 0, and a phase on x = 3
    let order: Vec<QubitId> = all.clone();
    let mut amplitudes = vec![Complex::new(0.0, 0.0); 32];
    for x in 0..16u64 {
        let sign = if x == 3 { -0.25 } else { 0.25 };
        amplitudes[index_of(&order, &inputs, x)] = Complex::new(sign, 0.0);
    }
    let mut engine = SimulationEngine::with_state(&qubit_set(&all), AmplitudeState::from_amplitudes(amplitudes)?)?;
    assert_eq!(engine.qubit_order(), order);

    let registry = decoration_registry();
    let mut emulator = OracleEmulator::new(&registry);
    emulator.invoke(&mut engine, "decorations", 2, &inputs, y, false)?;

    let vector = engine.state().vector();
    for x in 0..16u64 {
        let marked = decorations_check(2, x);
        let index = index_of(&order, &inputs, x) | index_of(&order, &[y], marked);
        let expected = if x == 3 { -0.25 } else { 0.25 };
        assert_eq!(vector[index], Complex::new(expected, 0.0), "x = {:04b}", x);
    }
    Ok(())
}

#[test]
fn test_unregistered_operation_leaves_state_unchanged() -> Result<(), EmulationError> {
    let registry = decoration_registry();
    let mut engine = SimulationEngine::init(&qubit_set(&[qid(0), qid(1)]))?;
    engine.flip(qid(0))?;
    let before = engine.state().clone();

    let mut emulator = OracleEmulator::new(&registry);
    let err = emulator.invoke(&mut engine, "sudoku", 2, &[qid(0)], qid(1), false).unwrap_err();
    assert_eq!(err, EmulationError::UnregisteredOperation { operation_id: "sudoku".to_string() });
    assert_eq!(engine.state(), &before);
    Ok(())
}

#[test]
fn test_non_bijective_table_is_rejected_before_mutation() -> Result<(), EmulationError> {
    let mut registry = OracleRegistry::new();
    registry.register_table("collapse", PermutationTable::from_entries(vec![0, 1, 1, 3])?);

    let mut engine = SimulationEngine::init(&qubit_set(&[qid(0), qid(1)]))?;
    engine.flip(qid(1))?;
    let before = engine.state().clone();

    let mut emulator = OracleEmulator::new(&registry);
    let err = emulator.invoke(&mut engine, "collapse", 0, &[qid(0)], qid(1), false).unwrap_err();
    assert!(matches!(err, EmulationError::InvalidPermutation { .. }), "got {:?}", err);
    assert_eq!(engine.state(), &before);
    Ok(())
}

#[test]
fn test_liveness_violations() -> Result<(), EmulationError> {
    let registry = decoration_registry();
    let mut engine = SimulationEngine::init(&qubit_set(&[qid(0), qid(1), qid(2)]))?;
    let mut emulator = OracleEmulator::new(&registry);

    // accumulator also used as input
    let err = emulator.invoke(&mut engine, "decorations", 1, &[qid(0)], qid(0), false).unwrap_err();
    assert!(matches!(err, EmulationError::LivenessViolation { qubit_id: QubitId(0), .. }));

    // qubit outside the simulation
    let err = emulator.invoke(&mut engine, "decorations", 1, &[qid(9)], qid(1), false).unwrap_err();
    assert!(matches!(err, EmulationError::LivenessViolation { qubit_id: QubitId(9), .. }));

    // released accumulator
    engine.release(qid(2))?;
    let err = emulator.invoke(&mut engine, "decorations", 1, &[qid(0)], qid(2), false).unwrap_err();
    assert!(matches!(err, EmulationError::LivenessViolation { qubit_id: QubitId(2), .. }));
    Ok(())
}

#[test]
fn test_contract_violations() -> Result<(), EmulationError> {
    let mut registry = OracleRegistry::new();
    registry.register_table("swap3", PermutationTable::from_entries(vec![0, 2, 1, 3, 4, 6, 5, 7])?);
    registry.register("too_big", |_p: u64, _x: u64, y: u64| y + 2);

    let mut engine = SimulationEngine::init(&qubit_set(&[qid(0), qid(1)]))?;
    let mut emulator = OracleEmulator::new(&registry);

    // width-3 table on a 1 + 1 register
    let err = emulator.invoke(&mut engine, "swap3", 0, &[qid(0)], qid(1), false).unwrap_err();
    assert!(matches!(err, EmulationError::ContractViolation { .. }), "got {:?}", err);

    // oracle value does not fit a single accumulator qubit
    let err = emulator.invoke(&mut engine, "too_big", 0, &[qid(0)], qid(1), false).unwrap_err();
    assert!(matches!(err, EmulationError::ContractViolation { .. }), "got {:?}", err);
    Ok(())
}

#[test]
fn test_register_width_limit_comes_from_config() -> Result<(), EmulationError> {
    let registry = decoration_registry();
    let inputs: Vec<QubitId> = (0..4).map(qid).collect();
    let mut all = inputs.clone();
    all.push(qid(4));
    let mut engine = SimulationEngine::init(&qubit_set(&all))?;

    let config = EmulatorConfig::new().with_max_register_width(4);
    let mut emulator = OracleEmulator::with_config(&registry, config);
    let err = emulator.invoke(&mut engine, "decorations", 2, &inputs, qid(4), false).unwrap_err();
    assert!(matches!(err, EmulationError::ContractViolation { .. }));

    let mut emulator = OracleEmulator::with_config(&registry, config.with_max_register_width(5));
    emulator.invoke(&mut engine, "decorations", 2, &inputs, qid(4), false)?;
    Ok(())
}

#[test]
fn test_table_cache_does_not_change_outcomes() -> Result<(), EmulationError> {
    let registry = decoration_registry();
    let inputs: Vec<QubitId> = (0..4).map(qid).collect();
    let y = qid(4);
    let mut all = inputs.clone();
    all.push(y);

    let mut plain = SimulationEngine::init(&qubit_set(&all))?;
    let mut cached = plain.clone();
    let mut uncached_emulator = OracleEmulator::new(&registry);
    let mut cached_emulator = OracleEmulator::with_config(&registry, EmulatorConfig::new().with_table_cache(true));

    for x in [0b0011u64, 0b0101, 0b1001] {
        plain.prepare_basis_state(&inputs, x)?;
        cached.prepare_basis_state(&inputs, x)?;
        uncached_emulator.invoke(&mut plain, "decorations", 2, &inputs, y, false)?;
        cached_emulator.invoke(&mut cached, "decorations", 2, &inputs, y, false)?;
        assert_eq!(plain.state(), cached.state());
        // undo the preparation so the next input starts from x = 0
        plain.prepare_basis_state(&inputs, x)?;
        cached.prepare_basis_state(&inputs, x)?;
    }
    assert_eq!(uncached_emulator.cached_tables(), 0);
    assert_eq!(cached_emulator.cached_tables(), 1);

    // a different parameter is a different table
    let one_layer = [qid(0)];
    cached_emulator.invoke(&mut cached, "decorations", 1, &one_layer, y, false)?;
    assert_eq!(cached_emulator.cached_tables(), 2);
    Ok(())
}

#[test]
fn test_inverse_invocation_undoes_forward() -> Result<(), EmulationError> {
    let mut registry = OracleRegistry::new();
    // a non-involutive oracle: add x into the two-qubit accumulator
    registry.register("add", |_p: u64, x: u64, y: u64| (x + y) & 0b11);

    let inputs = [qid(0), qid(1)];
    let accumulators = [qid(2), qid(3)];
    let all = [qid(0), qid(1), qid(2), qid(3)];
    // distinct weights so that any misplaced amplitude shows
    let amplitudes: Vec<Complex<f64>> = (0..16).map(|i| Complex::new(((i + 1) as f64 / 136.0).sqrt(), 0.0)).collect();
    let start = AmplitudeState::from_amplitudes(amplitudes)?;
    let mut engine = SimulationEngine::with_state(&qubit_set(&all), start)?;
    let before = engine.state().clone();

    let mut emulator = OracleEmulator::new(&registry);
    emulator.invoke_register(&mut engine, "add", 0, &inputs, &accumulators, false)?;
    emulator.invoke_register(&mut engine, "add", 0, &inputs, &accumulators, false)?;
    assert_ne!(engine.state(), &before);
    emulator.invoke_register(&mut engine, "add", 0, &inputs, &accumulators, true)?;
    emulator.invoke_register(&mut engine, "add", 0, &inputs, &accumulators, true)?;
    assert_eq!(engine.state(), &before);
    Ok(())
}

#[test]
fn test_circuit_adjoint_restores_initial_state() -> Result<(), EmulationError> {
    let mut registry = decoration_registry();
    registry.register("parity", xor_accumulate(|_, x| (x.count_ones() % 2) as u64));
    let inputs: Vec<QubitId> = (0..4).map(qid).collect();

    let circuit = CircuitBuilder::new()
        .prepare_value(&inputs, 0b1001)
        .oracle("decorations", 2, &inputs, qid(4))
        .oracle("parity", 0, &inputs, qid(5))
        .add_op(Operation::PermuteBasis {
            targets: vec![qid(4), qid(5)],
            table: PermutationTable::from_entries(vec![3, 0, 1, 2])?,
            inverse: false,
        })
        .build();
    let mut round_trip = circuit.clone();
    round_trip.add_operations(circuit.adjoint().operations().iter().cloned());
    round_trip.add_operations((0..6).map(|id| Operation::Release { target: qid(id) }));

    let result = Simulator::new().run(&round_trip, &registry)?;
    assert_eq!(result.dominant_index(), Some(0));
    Ok(())
}
