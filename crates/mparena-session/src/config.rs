//! Session configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use mparena_core::{RoundingMode, Verbosity};
use mparena_matrix::StrategySet;
use mparena_pool::PoolConfig;

// ── SessionConfig ──────────────────────────────────────────────────

/// Everything needed to build a [`Session`](crate::Session).
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Pool growth, ceiling and default precision.
    pub pool: PoolConfig,
    /// Worker threads for parallel strategies. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 64]`).
    pub worker_threads: Option<usize>,
    /// Rounding mode used when a caller does not pick one.
    pub default_rounding: RoundingMode,
    /// Diagnostic level.
    pub verbosity: Verbosity,
    /// Strategies the session may dispatch. Default: 1 through 7.
    pub strategies: StrategySet,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            worker_threads: None,
            default_rounding: RoundingMode::default(),
            verbosity: Verbosity::default(),
            strategies: StrategySet::builtin(),
        }
    }
}

impl SessionConfig {
    /// Upper bound on worker threads.
    pub const MAX_WORKER_THREADS: usize = 64;

    /// Resolve the worker thread count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_threads(&self) -> usize {
        match self.worker_threads {
            Some(n) => n.clamp(1, Self::MAX_WORKER_THREADS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, Self::MAX_WORKER_THREADS),
        }
    }

    /// Check structural invariants without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pool.validate()?;
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The pool configuration is invalid.
    Pool(mparena_pool::ConfigError),
    /// No multiply strategy is enabled.
    NoStrategies,
    /// The worker pool could not be started.
    ThreadPool {
        /// Description from the thread pool builder.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool(e) => write!(f, "pool: {e}"),
            Self::NoStrategies => write!(f, "no multiply strategy enabled"),
            Self::ThreadPool { reason } => write!(f, "worker pool: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<mparena_pool::ConfigError> for ConfigError {
    fn from(e: mparena_pool::ConfigError) -> Self {
        Self::Pool(e)
    }
}
