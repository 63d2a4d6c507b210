//! Decode errors for host-supplied numeric codes.
//!
//! The host environment passes rounding modes, precisions, verbosity
//! levels and strategy ids as plain integers. Turning those integers
//! into the closed types of this crate can fail; each failure names the
//! offending value.

use std::error::Error;
use std::fmt;

/// A host-supplied code that does not denote a valid setting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Rounding code outside `-1..=3`.
    RoundingMode {
        /// The rejected code.
        code: i64,
    },
    /// Precision outside the supported significand widths.
    Precision {
        /// The rejected precision in bits.
        bits: u64,
        /// Smallest accepted precision.
        min: u32,
        /// Largest accepted precision.
        max: u32,
    },
    /// Verbosity level outside `0..=3`.
    Verbosity {
        /// The rejected level.
        level: i64,
    },
    /// A count or dimension argument that must be positive was zero.
    NotPositive {
        /// Name of the argument.
        name: &'static str,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundingMode { code } => {
                write!(f, "rounding must be an integer between -1 and 3, got {code}")
            }
            Self::Precision { bits, min, max } => {
                write!(f, "precision must be between {min} and {max} bits, got {bits}")
            }
            Self::Verbosity { level } => {
                write!(f, "verbosity must be between 0 and 3, got {level}")
            }
            Self::NotPositive { name } => write!(f, "{name} must be a positive integer"),
        }
    }
}

impl Error for DecodeError {}
