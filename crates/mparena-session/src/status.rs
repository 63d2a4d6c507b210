//! Stable integer status codes for the host boundary.
//!
//! [`SessionStatus`] is a `repr(i32)` enum covering every failure a
//! session can report. Conversions from the typed errors are provided.

use mparena_core::DecodeError;
use mparena_matrix::KernelError;
use mparena_pool::PoolError;

use crate::config::ConfigError;
use crate::error::SessionError;

/// Status code returned across the host boundary.
///
/// `Ok` = 0, all errors are negative. Values are stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Success.
    Ok = 0,
    /// A range failed `1 <= start <= end <= size`.
    InvalidRange = -1,
    /// Zero values were requested.
    ZeroCount = -2,
    /// Pool growth would exceed the slot ceiling.
    CapacityExceeded = -3,
    /// The allocator refused a reservation.
    AllocationFailed = -4,
    /// A range was freed twice.
    DoubleFree = -5,
    /// Operand shapes are inconsistent.
    ShapeMismatch = -6,
    /// Strategy id outside `1..=8`.
    InvalidStrategy = -7,
    /// Strategy known but not enabled.
    StrategyUnavailable = -8,
    /// Rounding code outside `-1..=3`.
    InvalidRounding = -9,
    /// Precision outside the supported range.
    InvalidPrecision = -10,
    /// Verbosity level outside `0..=3`.
    InvalidVerbosity = -11,
    /// An argument is otherwise out of range or inconsistent.
    InvalidArgument = -12,
    /// Configuration validation error.
    ConfigError = -13,
    /// The accelerated backend failed.
    BackendFailed = -14,
}

impl SessionStatus {
    /// The integer code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<&DecodeError> for SessionStatus {
    fn from(e: &DecodeError) -> Self {
        match e {
            DecodeError::RoundingMode { .. } => SessionStatus::InvalidRounding,
            DecodeError::Precision { .. } => SessionStatus::InvalidPrecision,
            DecodeError::Verbosity { .. } => SessionStatus::InvalidVerbosity,
            DecodeError::NotPositive { .. } => SessionStatus::InvalidArgument,
        }
    }
}

impl From<&PoolError> for SessionStatus {
    fn from(e: &PoolError) -> Self {
        match e {
            PoolError::InvalidRange { .. } => SessionStatus::InvalidRange,
            PoolError::ZeroCount => SessionStatus::ZeroCount,
            PoolError::CapacityExceeded { .. } => SessionStatus::CapacityExceeded,
            PoolError::AllocationFailed { .. } => SessionStatus::AllocationFailed,
            PoolError::DoubleFree { .. } => SessionStatus::DoubleFree,
            PoolError::Config(_) => SessionStatus::ConfigError,
        }
    }
}

impl From<&KernelError> for SessionStatus {
    fn from(e: &KernelError) -> Self {
        match e {
            KernelError::ZeroRows { .. } => SessionStatus::InvalidArgument,
            KernelError::RowsMismatch { .. }
            | KernelError::ShapeMismatch { .. }
            | KernelError::LengthMismatch { .. } => SessionStatus::ShapeMismatch,
            KernelError::InvalidStrategy { .. } => SessionStatus::InvalidStrategy,
            KernelError::StrategyUnavailable { .. } => SessionStatus::StrategyUnavailable,
            KernelError::ScratchReservation { .. } => SessionStatus::AllocationFailed,
            KernelError::Backend(_) => SessionStatus::BackendFailed,
        }
    }
}

impl From<&ConfigError> for SessionStatus {
    fn from(_e: &ConfigError) -> Self {
        SessionStatus::ConfigError
    }
}

impl From<&SessionError> for SessionStatus {
    fn from(e: &SessionError) -> Self {
        match e {
            SessionError::Decode(e) => e.into(),
            SessionError::Pool(e) => e.into(),
            SessionError::Kernel(e) => e.into(),
            SessionError::Config(e) => e.into(),
            SessionError::Broadcast { .. } | SessionError::ValueCount { .. } => {
                SessionStatus::InvalidArgument
            }
        }
    }
}

impl<T> From<&Result<T, SessionError>> for SessionStatus {
    fn from(r: &Result<T, SessionError>) -> Self {
        match r {
            Ok(_) => SessionStatus::Ok,
            Err(e) => e.into(),
        }
    }
}
