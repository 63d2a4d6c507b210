//! Rounding modes and their host encoding.

use std::fmt;

use crate::error::DecodeError;

/// Direction in which an inexact result is rounded.
///
/// The host encodes modes as small integers; see
/// [`from_code`](RoundingMode::from_code) and [`code`](RoundingMode::code).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round toward negative infinity (`-1`).
    TowardNegative,
    /// Round to nearest, ties to even (`0`).
    #[default]
    NearestEven,
    /// Round toward positive infinity (`1`).
    TowardPositive,
    /// Round toward zero (`2`).
    TowardZero,
    /// Round away from zero (`3`).
    AwayFromZero,
}

impl RoundingMode {
    /// Every mode, in host-code order.
    pub const ALL: [RoundingMode; 5] = [
        Self::TowardNegative,
        Self::NearestEven,
        Self::TowardPositive,
        Self::TowardZero,
        Self::AwayFromZero,
    ];

    /// Decode a host rounding code.
    pub fn from_code(code: i64) -> Result<Self, DecodeError> {
        match code {
            -1 => Ok(Self::TowardNegative),
            0 => Ok(Self::NearestEven),
            1 => Ok(Self::TowardPositive),
            2 => Ok(Self::TowardZero),
            3 => Ok(Self::AwayFromZero),
            _ => Err(DecodeError::RoundingMode { code }),
        }
    }

    /// Host code for this mode.
    pub fn code(self) -> i64 {
        match self {
            Self::TowardNegative => -1,
            Self::NearestEven => 0,
            Self::TowardPositive => 1,
            Self::TowardZero => 2,
            Self::AwayFromZero => 3,
        }
    }

    /// Whether truncated magnitude must be bumped for a value of the
    /// given sign, given the round bit, the sticky bit and the parity of
    /// the truncated significand.
    pub fn rounds_up_magnitude(self, negative: bool, round: bool, sticky: bool, odd: bool) -> bool {
        let inexact = round || sticky;
        match self {
            Self::NearestEven => round && (sticky || odd),
            Self::TowardZero => false,
            Self::AwayFromZero => inexact,
            Self::TowardPositive => inexact && !negative,
            Self::TowardNegative => inexact && negative,
        }
    }
}

impl TryFrom<i64> for RoundingMode {
    type Error = DecodeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TowardNegative => "toward-negative",
            Self::NearestEven => "nearest-even",
            Self::TowardPositive => "toward-positive",
            Self::TowardZero => "toward-zero",
            Self::AwayFromZero => "away-from-zero",
        };
        f.write_str(name)
    }
}
