//! Pool configuration parameters.

use std::error::Error;
use std::fmt;

use mparena_core::Precision;

/// Configuration for the value pool.
///
/// Validated by [`Pool::new`](crate::Pool::new); immutable afterwards
/// except for the default precision, which the session may change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Slots added per growth step, for both the pool and the free list.
    ///
    /// Default: 1000. Must be non-zero.
    pub chunk_size: usize,

    /// Upper bound on pool capacity in slots.
    ///
    /// Default: `usize::MAX` (bounded only by the allocator). Growth past
    /// this ceiling fails with
    /// [`PoolError::CapacityExceeded`](crate::PoolError::CapacityExceeded).
    pub max_slots: usize,

    /// Precision given to fresh and freed slots.
    pub default_precision: Precision,
}

impl PoolConfig {
    /// Default growth chunk.
    pub const DEFAULT_CHUNK_SIZE: usize = 1000;

    /// Check the configuration for values the pool cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.max_slots < self.chunk_size {
            return Err(ConfigError::CeilingBelowChunk {
                max_slots: self.max_slots,
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            max_slots: usize::MAX,
            default_precision: Precision::DEFAULT,
        }
    }
}

/// Invalid [`PoolConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `chunk_size` was zero.
    ZeroChunkSize,
    /// `max_slots` cannot hold even one chunk.
    CeilingBelowChunk {
        /// Configured ceiling.
        max_slots: usize,
        /// Configured chunk.
        chunk_size: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroChunkSize => write!(f, "chunk_size must be non-zero"),
            Self::CeilingBelowChunk {
                max_slots,
                chunk_size,
            } => write!(
                f,
                "max_slots ({max_slots}) is smaller than one chunk ({chunk_size})"
            ),
        }
    }
}

impl Error for ConfigError {}
