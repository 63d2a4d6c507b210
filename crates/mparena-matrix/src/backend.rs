//! The seam for an accelerated multiply implementation.

use std::error::Error;
use std::fmt;

use mparena_core::{Precision, RoundingMode};

use crate::view::{MatrixView, MatrixViewMut};

/// An external `C ← C + A·B` implementation.
///
/// Registered with a session to enable
/// [`Strategy::Accelerated`](crate::Strategy::Accelerated). Backends do
/// not report per-element rounding, so the multiply reports them as
/// exact.
///
/// # Object safety
///
/// This trait is object-safe; sessions store the backend as
/// `Box<dyn GemmBackend>`.
///
/// # Examples
///
/// ```
/// use mparena_core::{Precision, RoundingMode};
/// use mparena_matrix::{BackendError, GemmBackend, MatrixView, MatrixViewMut};
///
/// #[derive(Debug)]
/// struct Refuse;
///
/// impl GemmBackend for Refuse {
///     fn name(&self) -> &str { "refuse" }
///
///     fn gemm(
///         &self,
///         _c: &mut MatrixViewMut<'_>,
///         _a: &MatrixView<'_>,
///         _b: &MatrixView<'_>,
///         _prec: Precision,
///         _rnd: RoundingMode,
///     ) -> Result<(), BackendError> {
///         Err(BackendError::new("refuse", "not today"))
///     }
/// }
///
/// assert_eq!(Refuse.name(), "refuse");
/// ```
pub trait GemmBackend: Send + Sync + fmt::Debug {
    /// Human-readable name for logs and errors.
    fn name(&self) -> &str;

    /// Accumulate `A·B` into `C` with intermediates at `prec`.
    ///
    /// Shapes are already consistent: `c` is `M×N`, `a` is `M×K` and
    /// `b` is `K×N`.
    fn gemm(
        &self,
        c: &mut MatrixViewMut<'_>,
        a: &MatrixView<'_>,
        b: &MatrixView<'_>,
        prec: Precision,
        rnd: RoundingMode,
    ) -> Result<(), BackendError>;
}

/// Failure reported by a [`GemmBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendError {
    /// Backend name.
    pub backend: String,
    /// What went wrong.
    pub message: String,
}

impl BackendError {
    /// Create an error for `backend`.
    pub fn new(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.message)
    }
}

impl Error for BackendError {}
