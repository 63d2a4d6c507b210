//! Operand shape inference.

use crate::error::KernelError;

/// Dimensions of `C[M×N] += A[M×K] · B[K×N]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GemmShape {
    /// Rows of `A` and `C`.
    pub m: usize,
    /// Columns of `A`, rows of `B`.
    pub k: usize,
    /// Columns of `B` and `C`.
    pub n: usize,
}

impl GemmShape {
    /// Infer `N` and `K` from the operand lengths and `M`.
    ///
    /// `N = len(C) / M` and `K = len(A) / M`; each operand must then
    /// have exactly the implied number of values.
    pub fn infer(len_c: usize, len_a: usize, len_b: usize, m: usize) -> Result<Self, KernelError> {
        if m == 0 {
            return Err(KernelError::ZeroRows { operand: "C" });
        }
        let n = len_c / m;
        if n == 0 || m * n != len_c {
            return Err(KernelError::RowsMismatch {
                operand: "C",
                rows: m,
                len: len_c,
            });
        }
        let k = len_a / m;
        if k == 0 || m * k != len_a {
            return Err(KernelError::ShapeMismatch {
                operand: "A",
                rows: m,
                cols: k,
                len: len_a,
            });
        }
        if k.checked_mul(n) != Some(len_b) {
            return Err(KernelError::ShapeMismatch {
                operand: "B",
                rows: k,
                cols: n,
                len: len_b,
            });
        }
        Ok(Self { m, k, n })
    }

    /// Number of output elements, `M·N`.
    pub fn outputs(&self) -> usize {
        self.m * self.n
    }
}

/// `(rows, cols)` of a transpose output with `rop_m` rows.
///
/// Both operands must have the same length, a multiple of `rop_m`.
pub fn transpose_dims(len_rop: usize, len_op: usize, rop_m: usize) -> Result<(usize, usize), KernelError> {
    if len_rop != len_op {
        return Err(KernelError::LengthMismatch {
            operand: "op",
            expected: len_rop,
            len: len_op,
        });
    }
    if rop_m == 0 {
        return Err(KernelError::ZeroRows { operand: "rop" });
    }
    if len_rop % rop_m != 0 {
        return Err(KernelError::RowsMismatch {
            operand: "rop",
            rows: rop_m,
            len: len_rop,
        });
    }
    Ok((rop_m, len_rop / rop_m))
}
