// tests/permutation_properties.rs

use proptest::prelude::*;
use qoracle::{
    build_permutation_table, decorations_check, is_permutation, xor_accumulate, AmplitudeState, OracleEmulator,
    OracleRegistry, PermutationTable, QubitId, SimulationEngine,
};

use num_complex::Complex;
use std::collections::{BTreeSet, HashSet};

fn qid(id: u64) -> QubitId {
    QubitId(id)
}

/// Normalized amplitudes with distinct, non-zero magnitudes.
fn normalized(weights: &[f64]) -> Vec<Complex<f64>> {
    let norm: f64 = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
    weights.iter().map(|w| Complex::new(w / norm, 0.0)).collect()
}

fn nx_ny_and_predicate() -> impl Strategy<Value = (usize, usize, Vec<u64>)> {
    (0usize..=10, 1usize..=2).prop_flat_map(|(nx, ny)| {
        let values = prop::collection::vec(0u64..(1u64 << ny), 1usize << nx);
        (Just(nx), Just(ny), values)
    })
}

proptest! {
    #[test]
    fn xor_oracles_are_always_bijective((nx, ny, values) in nx_ny_and_predicate()) {
        let oracle = xor_accumulate(move |_, x| values[x as usize]);
        let table = build_permutation_table(&oracle, 0, nx, ny).expect("oracle stays in range");
        prop_assert_eq!(table.len(), 1usize << (nx + ny));
        prop_assert!(is_permutation(table.entries()));
        prop_assert!(table.is_involution());
    }

    #[test]
    fn oracles_ignoring_the_accumulator_are_rejected((nx, ny, values) in nx_ny_and_predicate()) {
        let overwrite = move |_p: u64, x: u64, _y: u64| values[x as usize];
        let table = build_permutation_table(&overwrite, 0, nx, ny).expect("oracle stays in range");
        prop_assert!(!is_permutation(table.entries()));
    }

    #[test]
    fn forward_then_inverse_restores_the_state(
        entries in Just((0..16usize).collect::<Vec<usize>>()).prop_shuffle(),
        weights in prop::collection::vec(0.1f64..1.0, 32),
    ) {
        let mut registry = OracleRegistry::new();
        registry.register_table("shuffle", PermutationTable::from_entries(entries).expect("16 entries"));

        let qubits: HashSet<QubitId> = (0..5).map(qid).collect();
        let start = AmplitudeState::from_amplitudes(normalized(&weights)).expect("32 amplitudes");
        let mut engine = SimulationEngine::with_state(&qubits, start.clone()).expect("normalized");

        // register x = [q3, q0, q4], y = [q1]; q2 is a spectator
        let inputs = [qid(3), qid(0), qid(4)];
        let mut emulator = OracleEmulator::new(&registry);
        emulator.invoke(&mut engine, "shuffle", 0, &inputs, qid(1), false).expect("forward");
        emulator.invoke(&mut engine, "shuffle", 0, &inputs, qid(1), true).expect("inverse");
        prop_assert_eq!(engine.state(), &start);
    }
}

#[test]
fn three_layer_decorations_match_enumeration() {
    // branch p_L on layer L (2L+1 branches), ornaments never stacked
    let mut expected = BTreeSet::new();
    for p0 in 0..1u64 {
        for p1 in 0..3u64 {
            for p2 in 0..5u64 {
                if p1 == p0 + 1 || p2 == p1 + 1 {
                    continue;
                }
                expected.insert((1u64 << p0) | (1u64 << (1 + p1)) | (1u64 << (4 + p2)));
            }
        }
    }

    let found: BTreeSet<u64> = (0..1u64 << 9).filter(|x| decorations_check(3, *x) == 1).collect();
    assert_eq!(found, expected);
    assert_eq!(found.len(), 8);
}
