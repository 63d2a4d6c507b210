//! Diagnostic verbosity levels.

use crate::error::DecodeError;

/// How much diagnostic output a session emits.
///
/// Verbosity only gates diagnostics. Failures are returned to the
/// caller as errors at every level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// No output at all (`0`).
    Silent,
    /// Report errors (`1`).
    Errors,
    /// Report errors and precision-loss warnings (`2`).
    #[default]
    Warnings,
    /// Also trace every call (`3`).
    Debug,
}

impl Verbosity {
    /// Decode a host verbosity level.
    pub fn from_level(level: i64) -> Result<Self, DecodeError> {
        match level {
            0 => Ok(Self::Silent),
            1 => Ok(Self::Errors),
            2 => Ok(Self::Warnings),
            3 => Ok(Self::Debug),
            _ => Err(DecodeError::Verbosity { level }),
        }
    }

    /// Host level for this verbosity.
    pub fn level(self) -> i64 {
        self as i64
    }

    /// Whether errors are reported.
    pub fn reports_errors(self) -> bool {
        self >= Self::Errors
    }

    /// Whether precision-loss warnings are reported.
    pub fn reports_warnings(self) -> bool {
        self >= Self::Warnings
    }

    /// Whether per-call debug traces are emitted.
    pub fn traces(self) -> bool {
        self >= Self::Debug
    }
}
