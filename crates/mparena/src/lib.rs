//! mparena: a handle-based arena of arbitrary-precision floats with
//! parallel matrix kernels.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all mparena sub-crates. Values live in a pool addressed by 1-based
//! inclusive [`Range`](types::Range)s; a [`Session`](session::Session)
//! owns the pool and runs transpose, multiply and element-wise arithmetic
//! on it.
//!
//! # Quick start
//!
//! ```rust
//! use mparena::prelude::*;
//!
//! let mut session = Session::new(SessionConfig::default()).unwrap();
//! let rn = RoundingMode::NearestEven;
//!
//! // 2×2 matrices in column-major order.
//! let a = session.allocate(4).unwrap();
//! session.set_f64(a, &[1.0, 3.0, 2.0, 4.0], rn).unwrap();
//! let b = session.allocate(4).unwrap();
//! session.set_f64(b, &[1.0, 0.0, 0.0, 1.0], rn).unwrap();
//! let c = session.allocate(4).unwrap();
//! session.set_f64(c, &[0.0; 4], rn).unwrap();
//!
//! let report = session
//!     .multiply(c, a, b, Precision::DOUBLE, rn, 2, 3, Feedback::Aggregate)
//!     .unwrap();
//! assert!(report.is_exact());
//! assert_eq!(session.get_f64(c, rn).unwrap(), vec![1.0, 3.0, 2.0, 4.0]);
//!
//! session.mark_free(c);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `mparena-core` | Ranges, precision, rounding modes, verbosity |
//! | [`float`] | `mparena-float` | The `BigFloat` value and its correctly rounded arithmetic |
//! | [`pool`] | `mparena-pool` | Slot storage, free list, compaction |
//! | [`matrix`] | `mparena-matrix` | Transpose, multiply strategies, backends |
//! | [`session`] | `mparena-session` | Session facade, config, status codes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ranges, precision, rounding modes and verbosity (`mparena-core`).
pub use mparena_core as types;

/// Arbitrary-precision values (`mparena-float`).
///
/// [`float::BigFloat`] carries its own precision; every operation takes
/// a target precision and rounding mode and reports a
/// [`float::Ternary`].
pub use mparena_float as float;

/// Value storage (`mparena-pool`).
///
/// Most users go through a session; [`pool::Pool`] is exposed for
/// hosts that manage their own kernels.
pub use mparena_pool as pool;

/// Matrix kernels (`mparena-matrix`).
///
/// Implement [`matrix::GemmBackend`] to supply the accelerated strategy.
pub use mparena_matrix as matrix;

/// Session facade (`mparena-session`).
pub use mparena_session as session;

/// Common imports for typical mparena usage.
///
/// ```rust
/// use mparena::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mparena_core::{Precision, Range, RoundingMode, Verbosity};

    // Values
    pub use mparena_float::{BigFloat, BinaryOp, Ternary};

    // Kernels
    pub use mparena_matrix::{Feedback, GemmBackend, StatusReport, Strategy};

    // Session
    pub use mparena_session::{Operand, Session, SessionConfig, SessionError, SessionStatus};
}
