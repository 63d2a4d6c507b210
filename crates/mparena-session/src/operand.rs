//! Arithmetic operands: pool ranges or plain doubles.

use mparena_core::{Precision, Range};
use mparena_float::BigFloat;

/// One side of an element-wise arithmetic operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand<'a> {
    /// Values already in the pool.
    Pool(Range),
    /// Doubles supplied by the caller. Converted exactly.
    Doubles(&'a [f64]),
}

impl Operand<'_> {
    /// Convert caller doubles to values at double precision.
    pub(crate) fn doubles_to_values(values: &[f64]) -> Vec<BigFloat> {
        values
            .iter()
            .map(|&v| BigFloat::from_f64(v, Precision::DOUBLE))
            .collect()
    }
}

impl From<Range> for Operand<'_> {
    fn from(r: Range) -> Self {
        Self::Pool(r)
    }
}

impl<'a> From<&'a [f64]> for Operand<'a> {
    fn from(v: &'a [f64]) -> Self {
        Self::Doubles(v)
    }
}

/// Length of the operation output, or `None` if the lengths admit no
/// broadcasting.
///
/// Either all three lengths agree, or one input has length 1 and the
/// other matches the output.
pub(crate) fn broadcast(rop: usize, lhs: usize, rhs: usize) -> Option<usize> {
    let ok = (rop == lhs && rop == rhs) || (rop == lhs && rhs == 1) || (rop == rhs && lhs == 1);
    ok.then_some(rop)
}
