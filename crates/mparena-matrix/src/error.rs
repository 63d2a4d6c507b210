//! Kernel error types.

use std::error::Error;
use std::fmt;

use crate::backend::BackendError;
use crate::strategy::Strategy;

/// Errors raised by the matrix kernels.
///
/// All of them are detected before the output is written, except
/// [`Backend`](Self::Backend), whose partial effects depend on the
/// backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// A row count of zero was given for `operand`.
    ZeroRows {
        /// Name of the operand whose row count was zero.
        operand: &'static str,
    },
    /// The length of `operand` is not a multiple of its row count.
    RowsMismatch {
        /// Operand name.
        operand: &'static str,
        /// Declared rows.
        rows: usize,
        /// Operand length.
        len: usize,
    },
    /// `operand` does not have the shape the other operands imply.
    ShapeMismatch {
        /// Operand name.
        operand: &'static str,
        /// Expected rows.
        rows: usize,
        /// Expected columns.
        cols: usize,
        /// Actual length.
        len: usize,
    },
    /// Two operands that must have equal lengths do not.
    LengthMismatch {
        /// Operand name.
        operand: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        len: usize,
    },
    /// A strategy id outside `1..=8`.
    InvalidStrategy {
        /// The id as supplied.
        id: i64,
    },
    /// A known strategy that is not enabled in this session.
    StrategyUnavailable {
        /// The strategy requested.
        strategy: Strategy,
    },
    /// The scratch row could not be reserved.
    ScratchReservation {
        /// Number of values requested.
        requested: usize,
    },
    /// The accelerated backend reported a failure.
    Backend(BackendError),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRows { operand } => {
                write!(f, "rows of '{operand}' must be a positive number")
            }
            Self::RowsMismatch { operand, rows, len } => write!(
                f,
                "{rows} does not denote the number of rows of '{operand}' ({len} values)"
            ),
            Self::ShapeMismatch {
                operand,
                rows,
                cols,
                len,
            } => write!(
                f,
                "incompatible matrix '{operand}': expected a [{rows} x {cols}] matrix, got {len} values"
            ),
            Self::LengthMismatch {
                operand,
                expected,
                len,
            } => write!(f, "'{operand}' has {len} values, expected {expected}"),
            Self::InvalidStrategy { id } => write!(f, "invalid strategy '{id}'"),
            Self::StrategyUnavailable { strategy } => {
                write!(f, "strategy {strategy} is not available")
            }
            Self::ScratchReservation { requested } => {
                write!(f, "failed to reserve a scratch row of {requested} values")
            }
            Self::Backend(e) => write!(f, "backend failure: {e}"),
        }
    }
}

impl Error for KernelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for KernelError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}
