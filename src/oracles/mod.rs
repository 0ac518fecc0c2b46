// src/oracles/mod.rs

//! Classical functions that can be emulated as reversible oracles.
//!
//! An oracle is any pure mapping `(parameter, x, y) -> z` where `x` is the
//! value of the input register, `y` the value of the accumulator register
//! and `z` the new accumulator value. The emulator unrolls it into a
//! permutation `(x, y) -> (x, z)` over the joint basis.
//!
//! Oracles written as `z = f(parameter, x) XOR y` are bijective whatever
//! `f` computes, and are their own inverse. [`xor_accumulate`] builds one
//! from a plain predicate.

pub mod decoration;

pub use decoration::{decoration_width, decorations_check, layer_pattern, DecorationOracle};

/// A classical function usable as the body of an emulated oracle.
///
/// Implementations must be pure: the emulator may call `evaluate` once per
/// basis index, in any order, and may cache the resulting table.
pub trait OracleFunction: Send + Sync {
    /// Computes the new accumulator value for input `x` and accumulator `y`.
    /// `parameter` is the runtime argument of the emulated operation.
    fn evaluate(&self, parameter: u64, x: u64, y: u64) -> u64;
}

impl<F> OracleFunction for F
where
    F: Fn(u64, u64, u64) -> u64 + Send + Sync,
{
    fn evaluate(&self, parameter: u64, x: u64, y: u64) -> u64 {
        self(parameter, x, y)
    }
}

/// Wraps a predicate `f(parameter, x)` as the oracle `f(parameter, x) XOR y`.
#[derive(Debug, Clone, Copy)]
pub struct XorOracle<P> {
    predicate: P,
}

impl<P> XorOracle<P>
where
    P: Fn(u64, u64) -> u64 + Send + Sync,
{
    /// Creates the XOR oracle for `predicate`.
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<P> OracleFunction for XorOracle<P>
where
    P: Fn(u64, u64) -> u64 + Send + Sync,
{
    fn evaluate(&self, parameter: u64, x: u64, y: u64) -> u64 {
        (self.predicate)(parameter, x) ^ y
    }
}

/// Shorthand for [`XorOracle::new`].
///
/// ```
/// use qoracle::oracles::{xor_accumulate, OracleFunction};
///
/// // Marks the inputs equal to the parameter.
/// let oracle = xor_accumulate(|target, x| u64::from(x == target));
/// assert_eq!(oracle.evaluate(5, 5, 0), 1);
/// assert_eq!(oracle.evaluate(5, 5, 1), 0);
/// assert_eq!(oracle.evaluate(5, 4, 1), 1);
/// ```
pub fn xor_accumulate<P>(predicate: P) -> XorOracle<P>
where
    P: Fn(u64, u64) -> u64 + Send + Sync,
{
    XorOracle::new(predicate)
}
