//! `C ← C + A·B` with selectable execution strategy.
//!
//! Strategies 1 through 6 accumulate each output element in place with
//! one fused multiply-add per inner index, rounding every step into the
//! precision of that element. Strategy 7 accumulates dot products at the
//! working precision and rounds once into `C`. Strategy 8 hands the whole
//! product to a [`GemmBackend`].
//!
//! A backend works on a staged copy of `C`, which replaces `C` only when
//! the backend succeeds.
//!
//! Every parallel plan writes each output element from exactly one task.
//! Plans that walk rows compute their updates from a read-only view of
//! `C`, collect them, and scatter them back after the parallel phase.

use mparena_core::{Precision, RoundingMode};
use mparena_float::BigFloat;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, trace};

use crate::backend::GemmBackend;
use crate::error::KernelError;
use crate::scratch::ScratchRow;
use crate::shape::GemmShape;
use crate::status::{Feedback, StatusReport};
use crate::strategy::Strategy;
use crate::view::{MatrixView, MatrixViewMut};

/// Per-call multiply parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GemmOptions {
    /// Execution plan.
    pub strategy: Strategy,
    /// Working precision for the scratch row, dot products and backend.
    pub precision: Precision,
    /// Rounding mode for every step.
    pub rounding: RoundingMode,
    /// Shape of the returned report.
    pub feedback: Feedback,
}

/// Accumulate `a · b` into `c`.
///
/// Parallel strategies run on `workers`. [`Strategy::Accelerated`]
/// requires `backend`; without one it fails with
/// [`KernelError::StrategyUnavailable`] before touching `c`.
pub fn multiply(
    workers: &ThreadPool,
    backend: Option<&dyn GemmBackend>,
    mut c: MatrixViewMut<'_>,
    a: MatrixView<'_>,
    b: MatrixView<'_>,
    options: &GemmOptions,
) -> Result<StatusReport, KernelError> {
    let shape = conformant(&c, &a, &b)?;
    let GemmOptions {
        strategy,
        precision,
        rounding,
        feedback,
    } = *options;
    debug!(%strategy, m = shape.m, k = shape.k, n = shape.n, %precision, %rounding, "gemm");

    let mut statuses = vec![0; shape.outputs()];
    match strategy {
        Strategy::SequentialIjk => sequential_ijk(&mut c, &a, &b, rounding, &mut statuses),
        Strategy::SequentialJik => sequential_jik(&mut c, &a, &b, rounding, &mut statuses),
        Strategy::ParallelRows => {
            workers.install(|| parallel_rows(&mut c, &a, &b, rounding, &mut statuses))
        }
        Strategy::ParallelColumns => {
            workers.install(|| parallel_columns(&mut c, &a, &b, rounding, &mut statuses))
        }
        Strategy::NestedRowsColumns => {
            workers.install(|| nested_rows_columns(&mut c, &a, &b, rounding, &mut statuses))
        }
        Strategy::NestedColumnsRows => {
            workers.install(|| nested_columns_rows(&mut c, &a, &b, rounding, &mut statuses))
        }
        Strategy::RowCopy => workers.install(|| {
            row_copy(&mut c, &a, &b, precision, rounding, &mut statuses)
        })?,
        Strategy::Accelerated => {
            let backend = backend.ok_or(KernelError::StrategyUnavailable { strategy })?;
            debug!(backend = backend.name(), "gemm: delegating");
            let mut staged = staged_copy(c.as_view().as_slice())?;
            {
                let mut target = MatrixViewMut::new("C", &mut staged, shape.m, shape.n)?;
                workers.install(|| backend.gemm(&mut target, &a, &b, precision, rounding))?;
            }
            for (dst, src) in c.as_mut_slice().iter_mut().zip(staged) {
                *dst = src;
            }
        }
    }
    Ok(StatusReport::from_elements(feedback, statuses))
}

/// A copy of `values` in a fallibly reserved buffer.
fn staged_copy(values: &[BigFloat]) -> Result<Vec<BigFloat>, KernelError> {
    let mut staged = Vec::new();
    staged
        .try_reserve_exact(values.len())
        .map_err(|_| KernelError::ScratchReservation {
            requested: values.len(),
        })?;
    staged.extend_from_slice(values);
    Ok(staged)
}

fn conformant(
    c: &MatrixViewMut<'_>,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
) -> Result<GemmShape, KernelError> {
    let (m, n) = (c.rows(), c.cols());
    let k = a.cols();
    if a.rows() != m {
        return Err(KernelError::ShapeMismatch {
            operand: "A",
            rows: m,
            cols: k,
            len: a.rows() * k,
        });
    }
    if b.rows() != k || b.cols() != n {
        return Err(KernelError::ShapeMismatch {
            operand: "B",
            rows: k,
            cols: n,
            len: b.rows() * b.cols(),
        });
    }
    Ok(GemmShape { m, k, n })
}

/// `c ← c + Σₖ a(i,k)·b(k,j)`, one rounding per term.
fn accumulate(
    c: &mut BigFloat,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    i: usize,
    j: usize,
    rnd: RoundingMode,
) -> i32 {
    (0..a.cols()).fold(0, |status, k| {
        status | c.add_mul(a.get(i, k), b.get(k, j), rnd).code()
    })
}

/// A fresh copy of `c0` with the row-`i`, column-`j` terms accumulated.
fn accumulated(
    c0: &BigFloat,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    i: usize,
    j: usize,
    rnd: RoundingMode,
) -> (BigFloat, i32) {
    let mut v = c0.clone();
    let status = accumulate(&mut v, a, b, i, j, rnd);
    (v, status)
}

fn sequential_ijk(
    c: &mut MatrixViewMut<'_>,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    rnd: RoundingMode,
    statuses: &mut [i32],
) {
    let (m, n) = (c.rows(), c.cols());
    for i in 0..m {
        for j in 0..n {
            statuses[j * m + i] = accumulate(c.get_mut(i, j), a, b, i, j, rnd);
        }
    }
}

fn sequential_jik(
    c: &mut MatrixViewMut<'_>,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    rnd: RoundingMode,
    statuses: &mut [i32],
) {
    let (m, n) = (c.rows(), c.cols());
    for j in 0..n {
        for i in 0..m {
            statuses[j * m + i] = accumulate(c.get_mut(i, j), a, b, i, j, rnd);
        }
    }
}

/// Write row-major `(value, status)` results back into `c`.
fn scatter_rows(
    c: &mut MatrixViewMut<'_>,
    statuses: &mut [i32],
    rows: Vec<Vec<(BigFloat, i32)>>,
) {
    let m = c.rows();
    for (i, row) in rows.into_iter().enumerate() {
        for (j, (value, status)) in row.into_iter().enumerate() {
            *c.get_mut(i, j) = value;
            statuses[j * m + i] = status;
        }
    }
}

fn parallel_rows(
    c: &mut MatrixViewMut<'_>,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    rnd: RoundingMode,
    statuses: &mut [i32],
) {
    let current = c.as_view();
    let rows: Vec<Vec<(BigFloat, i32)>> = (0..current.rows())
        .into_par_iter()
        .map(|i| {
            (0..current.cols())
                .map(|j| accumulated(current.get(i, j), a, b, i, j, rnd))
                .collect()
        })
        .collect();
    scatter_rows(c, statuses, rows);
}

fn parallel_columns(
    c: &mut MatrixViewMut<'_>,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    rnd: RoundingMode,
    statuses: &mut [i32],
) {
    let m = c.rows();
    c.data
        .par_chunks_mut(m)
        .zip(statuses.par_chunks_mut(m))
        .enumerate()
        .for_each(|(j, (column, st))| {
            for (i, (v, s)) in column.iter_mut().zip(st.iter_mut()).enumerate() {
                *s = accumulate(v, a, b, i, j, rnd);
            }
        });
}

fn nested_rows_columns(
    c: &mut MatrixViewMut<'_>,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    rnd: RoundingMode,
    statuses: &mut [i32],
) {
    let current = c.as_view();
    let rows: Vec<Vec<(BigFloat, i32)>> = (0..current.rows())
        .into_par_iter()
        .map(|i| {
            (0..current.cols())
                .into_par_iter()
                .map(|j| accumulated(current.get(i, j), a, b, i, j, rnd))
                .collect()
        })
        .collect();
    scatter_rows(c, statuses, rows);
}

fn nested_columns_rows(
    c: &mut MatrixViewMut<'_>,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    rnd: RoundingMode,
    statuses: &mut [i32],
) {
    let m = c.rows();
    c.data
        .par_chunks_mut(m)
        .zip(statuses.par_chunks_mut(m))
        .enumerate()
        .for_each(|(j, (column, st))| {
            column
                .par_iter_mut()
                .zip(st.par_iter_mut())
                .enumerate()
                .for_each(|(i, (v, s))| *s = accumulate(v, a, b, i, j, rnd));
        });
}

fn row_copy(
    c: &mut MatrixViewMut<'_>,
    a: &MatrixView<'_>,
    b: &MatrixView<'_>,
    prec: Precision,
    rnd: RoundingMode,
    statuses: &mut [i32],
) -> Result<(), KernelError> {
    let m = c.rows();
    if m == 1 {
        c.data
            .par_iter_mut()
            .zip(statuses.par_iter_mut())
            .enumerate()
            .for_each(|(j, (v, s))| {
                *s = v.dot_accumulate(a.row(0).zip(b.column(j)), prec, rnd);
            });
        return Ok(());
    }

    let mut scratch = ScratchRow::reserve(a.cols(), prec)?;
    for i in 0..m {
        // load_row returns only after the whole row is written.
        let copy_status = scratch.load_row(a, i, rnd);
        if copy_status != 0 {
            trace!(row = i, copy_status, "row_copy: row of A rounded into scratch");
        }
        // Only the dot product's rounding is reported.
        let row = scratch.as_slice();
        c.data
            .par_chunks_mut(m)
            .zip(statuses.par_chunks_mut(m))
            .enumerate()
            .for_each(|(j, (column, st))| {
                st[i] = column[i].dot_accumulate(row.iter().zip(b.column(j)), prec, rnd);
            });
    }
    Ok(())
}
