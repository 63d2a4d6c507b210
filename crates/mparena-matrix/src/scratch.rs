//! Per-call scratch row for the row-copy multiply.
//!
//! [`ScratchRow`] holds one row of `A` at the working precision so the
//! dot products for that row read contiguous memory. It is an owned
//! buffer: reserved fallibly at the start of a multiply and dropped on
//! every exit path, so a failed call leaks nothing.

use mparena_core::{Precision, RoundingMode};
use mparena_float::BigFloat;
use rayon::prelude::*;

use crate::error::KernelError;
use crate::view::MatrixView;

/// A row of values at a fixed working precision.
#[derive(Debug)]
pub struct ScratchRow {
    values: Vec<BigFloat>,
    prec: Precision,
}

impl ScratchRow {
    /// Reserve `len` values at `prec`.
    ///
    /// Fails with [`KernelError::ScratchReservation`] if the allocator
    /// refuses.
    pub fn reserve(len: usize, prec: Precision) -> Result<Self, KernelError> {
        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|_| KernelError::ScratchReservation { requested: len })?;
        values.resize_with(len, || BigFloat::nan(prec));
        Ok(Self { values, prec })
    }

    /// Copy row `i` of `a` in, rounding to the working precision.
    ///
    /// Runs in parallel on the current rayon pool and returns once every
    /// value is written, with the OR of the copy statuses.
    ///
    /// # Panics
    ///
    /// Panics if `a` has a different number of columns than the row has
    /// values.
    pub fn load_row(&mut self, a: &MatrixView<'_>, i: usize, rnd: RoundingMode) -> i32 {
        assert_eq!(a.cols(), self.values.len(), "scratch row length");
        self.values
            .par_iter_mut()
            .enumerate()
            .map(|(k, v)| v.set(a.get(i, k), rnd).code())
            .reduce(|| 0, |x, y| x | y)
    }

    /// The current contents.
    pub fn as_slice(&self) -> &[BigFloat] {
        &self.values
    }

    /// Working precision.
    pub fn precision(&self) -> Precision {
        self.prec
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
