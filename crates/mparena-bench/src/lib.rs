//! Benchmark profiles for the mparena pool and matrix kernels.
//!
//! - [`square_profile`]: a session holding `C`, `A` and `B` for an
//!   `n×n` multiply at a chosen precision.
//! - [`churn_sizes`]: deterministic allocation sizes for free-list
//!   benchmarks.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use mparena_core::{Precision, Range, RoundingMode};
use mparena_session::{Session, SessionConfig, SessionError};
use mparena_test_utils::{identity, ramp};

/// A session with the three operands of an `n×n` multiply loaded.
pub struct SquareProfile {
    pub session: Session,
    pub n: usize,
    pub c: Range,
    pub a: Range,
    pub b: Range,
}

/// Build an `n×n` multiply at `prec`: `A` counts up in storage order,
/// `B` is the identity and `C` starts at zero.
pub fn square_profile(n: usize, prec: Precision) -> Result<SquareProfile, SessionError> {
    let mut config = SessionConfig::default();
    config.pool.default_precision = prec;
    let mut session = Session::new(config)?;
    let rnd = RoundingMode::NearestEven;

    let a = session.allocate(n * n)?;
    session.set_f64(a, &ramp(n, n), rnd)?;
    let b = session.allocate(n * n)?;
    session.set_f64(b, &identity(n), rnd)?;
    let c = session.allocate(n * n)?;
    session.set_f64(c, &vec![0.0; n * n], rnd)?;
    Ok(SquareProfile { session, n, c, a, b })
}

/// `count` allocation sizes in `1..=max`, from a fixed linear
/// congruential sequence so every run sees the same churn.
pub fn churn_sizes(count: usize, max: usize) -> Vec<usize> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 33) as usize % max) + 1
        })
        .collect()
}
