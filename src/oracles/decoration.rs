// src/oracles/decoration.rs

//! The tree-decoration constraint.
//!
//! A tree of `n` layers has `2L+1` branches on layer `L`. A decoration is a
//! bit pattern with one bit per branch, packed little-endian: layer `L`
//! starts at bit `L²`, so the whole tree takes `n²` bits. A decoration is
//! valid when every layer holds exactly one ornament and no ornament sits
//! directly above another one, i.e. branch `p` of layer `L` and branch `p+1`
//! of layer `L+1` are never both marked.

use super::OracleFunction;

/// Number of input bits needed for a tree with `n_layers` layers.
pub fn decoration_width(n_layers: u64) -> u64 {
    n_layers * n_layers
}

/// Branch bits of layer `layer` in the packed decoration `x`, shifted down so
/// that branch 0 is bit 0. Layers lying past bit 63 read as empty.
pub fn layer_pattern(x: u64, layer: u64) -> u64 {
    let offset = layer.saturating_mul(layer);
    let width = 2 * layer + 1;
    let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
    u32::try_from(offset)
        .ok()
        .and_then(|offset| x.checked_shr(offset))
        .unwrap_or(0)
        & mask
}

/// Returns 1 if `x` is a valid decoration of a tree with `n_layers` layers,
/// 0 otherwise.
///
/// ```
/// use qoracle::oracles::decorations_check;
///
/// assert_eq!(decorations_check(2, 0b0011), 1);
/// assert_eq!(decorations_check(2, 0b0101), 0); // stacked ornaments
/// ```
pub fn decorations_check(n_layers: u64, x: u64) -> u64 {
    // exactly one ornament per layer
    if (0..n_layers).any(|layer| layer_pattern(x, layer).count_ones() != 1) {
        return 0;
    }

    // branch p of the upper layer sits above branch p+1 of the lower one
    for layer in 1..n_layers {
        let upper = layer_pattern(x, layer - 1);
        let lower = layer_pattern(x, layer);
        if (upper << 1) & lower != 0 {
            return 0;
        }
    }

    1
}

/// The decoration constraint as an emulatable oracle: the runtime parameter
/// is the layer count and the predicate is XORed into the accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecorationOracle;

impl OracleFunction for DecorationOracle {
    fn evaluate(&self, n_layers: u64, x: u64, y: u64) -> u64 {
        decorations_check(n_layers, x) ^ y
    }
}
