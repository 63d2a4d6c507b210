//! Test utilities and mock types for mparena development.
//!
//! Provides a [`MockBackend`] implementing
//! [`GemmBackend`](mparena_matrix::GemmBackend) and small
//! [`fixtures`] for building column-major matrix data.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mparena_core::{Precision, RoundingMode};
use mparena_matrix::{BackendError, GemmBackend, MatrixView, MatrixViewMut};

pub use fixtures::{doubles, identity, ramp, values};

/// Naive triple-loop backend with a shared call counter.
///
/// Each element of `C` accumulates its dot product at the working
/// precision and is rounded once. With
/// [`failing_after`](MockBackend::failing_after) it refuses every call
/// past the given count; with
/// [`failing_mid_write`](MockBackend::failing_mid_write) those calls
/// first update `C(0,0)`.
#[derive(Debug)]
pub struct MockBackend {
    calls: Arc<AtomicUsize>,
    succeed_count: usize,
    partial_writes: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::failing_after(usize::MAX)
    }

    /// A backend that succeeds `succeed_count` times, then fails.
    pub fn failing_after(succeed_count: usize) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            succeed_count,
            partial_writes: false,
        }
    }

    /// Like [`failing_after`](Self::failing_after), but a failing call
    /// writes the first element of `C` before it gives up.
    pub fn failing_mid_write(succeed_count: usize) -> Self {
        Self {
            partial_writes: true,
            ..Self::failing_after(succeed_count)
        }
    }

    /// Counter shared with every clone of the handle; survives boxing
    /// the backend into a session.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GemmBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn gemm(
        &self,
        c: &mut MatrixViewMut<'_>,
        a: &MatrixView<'_>,
        b: &MatrixView<'_>,
        prec: Precision,
        rnd: RoundingMode,
    ) -> Result<(), BackendError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        let failure = || {
            BackendError::new(
                "mock",
                format!("deliberate failure after {} successful calls", self.succeed_count),
            )
        };
        let failing = n >= self.succeed_count;
        if failing && !self.partial_writes {
            return Err(failure());
        }
        for j in 0..c.cols() {
            let column = b.column(j);
            for i in 0..c.rows() {
                c.get_mut(i, j).dot_accumulate(a.row(i).zip(column), prec, rnd);
                if failing {
                    return Err(failure());
                }
            }
        }
        Ok(())
    }
}
