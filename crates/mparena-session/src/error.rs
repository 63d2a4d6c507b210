//! Session-level error type.

use std::error::Error;
use std::fmt;

use mparena_core::DecodeError;
use mparena_matrix::KernelError;
use mparena_pool::PoolError;

use crate::config::ConfigError;

/// Any failure of a [`Session`](crate::Session) operation.
///
/// A failed operation has not modified the pool or any output range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// A host-supplied code did not decode.
    Decode(DecodeError),
    /// Range validation or pool resource failure.
    Pool(PoolError),
    /// Shape, strategy or backend failure in a matrix kernel.
    Kernel(KernelError),
    /// The session could not be built.
    Config(ConfigError),
    /// Operand lengths admit no broadcasting.
    Broadcast {
        /// Length of the output range.
        rop: usize,
        /// Length of the left operand.
        lhs: usize,
        /// Length of the right operand.
        rhs: usize,
    },
    /// A value list does not match the range it is written to.
    ValueCount {
        /// Length of the range.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Pool(e) => write!(f, "pool: {e}"),
            Self::Kernel(e) => write!(f, "kernel: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Broadcast { rop, lhs, rhs } => write!(
                f,
                "cannot broadcast operands of length {lhs} and {rhs} into {rop} values"
            ),
            Self::ValueCount { expected, got } => {
                write!(f, "expected {expected} values, got {got}")
            }
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Pool(e) => Some(e),
            Self::Kernel(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for SessionError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<PoolError> for SessionError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

impl From<KernelError> for SessionError {
    fn from(e: KernelError) -> Self {
        Self::Kernel(e)
    }
}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
