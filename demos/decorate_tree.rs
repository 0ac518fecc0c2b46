//! Example: marking valid tree decorations with an emulated oracle.
//! Prepares a uniform superposition over every decoration of an n-layer tree,
//! applies the decoration oracle once and lists the basis states it marked.
//!
//! Run with `cargo run --example decorate_tree -- 3`; set `RUST_LOG=qoracle=debug`
//! to see the emulator's spans and events.

use num_complex::Complex;
use qoracle::oracles::decoration_width;
use qoracle::{AmplitudeState, DecorationOracle, EmulatorConfig, OracleEmulator, OracleRegistry, QubitId, SimulationEngine};
use std::collections::HashSet;
use tracing_subscriber::EnvFilter;

// Helper for QubitId creation
fn qid(id: u64) -> QubitId {
    QubitId(id)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let n_layers: u64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 2,
    };
    let width = decoration_width(n_layers) as usize;
    println!("--- Decorating a {}-layer tree ({} branches) ---", n_layers, width);

    let mut registry = OracleRegistry::new();
    registry.register("decorations", DecorationOracle);

    // x occupies q0..q(width-1), the accumulator is the last qubit
    let inputs: Vec<QubitId> = (0..width as u64).map(qid).collect();
    let accumulator = qid(width as u64);
    let qubits: HashSet<QubitId> = inputs.iter().copied().chain([accumulator]).collect();

    // Uniform over x, accumulator |0>. The accumulator is the least significant
    // bit of a global index, so the populated entries are the even ones.
    let dim = 1usize << (width + 1);
    let amplitude = Complex::new(1.0 / ((1usize << width) as f64).sqrt(), 0.0);
    let amplitudes = (0..dim)
        .map(|index| if index % 2 == 0 { amplitude } else { Complex::new(0.0, 0.0) })
        .collect();
    let mut engine = SimulationEngine::with_state(&qubits, AmplitudeState::from_amplitudes(amplitudes)?)?;

    let mut emulator = OracleEmulator::with_config(&registry, EmulatorConfig::new().with_table_cache(true));
    emulator.invoke(&mut engine, "decorations", n_layers, &inputs, accumulator, false)?;

    // Global bit of q_j is (width - j), so x is read back in reverse.
    let order = engine.qubit_order();
    let mut marked = Vec::new();
    for (index, amp) in engine.state().vector().iter().enumerate() {
        if index % 2 == 1 && amp.norm_sqr() > 0.0 {
            let x = (0..width).fold(0u64, |x, bit| x | ((((index >> (order.len() - 1 - bit)) & 1) as u64) << bit));
            marked.push(x);
        }
    }
    marked.sort_unstable();

    println!("Marked {} of {} decorations:", marked.len(), 1u64 << width);
    for x in &marked {
        print_tree(n_layers, *x);
    }
    Ok(())
}

/// Prints one decoration, one layer per line, `*` for an ornament.
fn print_tree(n_layers: u64, x: u64) {
    println!("  x = {:0width$b}", x, width = decoration_width(n_layers) as usize);
    for layer in 0..n_layers {
        let pattern = qoracle::oracles::layer_pattern(x, layer);
        let row: String = (0..2 * layer + 1).map(|p| if (pattern >> p) & 1 == 1 { '*' } else { '.' }).collect();
        println!("    {:>pad$}{}", "", row, pad = (n_layers - 1 - layer) as usize);
    }
}
