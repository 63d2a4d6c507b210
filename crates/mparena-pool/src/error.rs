//! Pool-specific error types.

use std::error::Error;
use std::fmt;

use mparena_core::Range;

use crate::config::ConfigError;

/// Errors that can occur during pool operations.
///
/// Every failing operation leaves the pool exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// A caller-supplied range failed `1 <= start <= end <= size`.
    InvalidRange {
        /// Name of the offending parameter.
        param: &'static str,
        /// The range as supplied.
        range: Range,
        /// Pool size at the time of the check.
        size: usize,
    },
    /// `allocate(0)` was requested.
    ZeroCount,
    /// Growth would exceed the configured slot ceiling.
    CapacityExceeded {
        /// Capacity the allocation would need.
        requested: usize,
        /// Configured ceiling.
        max_slots: usize,
    },
    /// The system allocator refused to reserve storage.
    AllocationFailed {
        /// What was being reserved.
        what: &'static str,
        /// Number of elements requested.
        requested: usize,
    },
    /// The range overlaps a range that is already free.
    DoubleFree {
        /// The range passed to `mark_free`.
        range: Range,
        /// The free-list entry it overlaps.
        existing: Range,
    },
    /// The pool configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRange { param, range, size } => {
                write!(f, "invalid range {range} for '{param}' (pool size {size})")
            }
            Self::ZeroCount => write!(f, "cannot allocate zero values"),
            Self::CapacityExceeded {
                requested,
                max_slots,
            } => write!(
                f,
                "pool capacity exceeded: requested {requested} slots, ceiling {max_slots}"
            ),
            Self::AllocationFailed { what, requested } => {
                write!(f, "failed to reserve {requested} {what}")
            }
            Self::DoubleFree { range, existing } => {
                write!(f, "range {range} overlaps free range {existing}")
            }
            Self::Config(e) => write!(f, "invalid pool config: {e}"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for PoolError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
