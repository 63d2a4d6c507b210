//! Significand precision in bits.

use std::fmt;

use crate::error::DecodeError;

/// Number of bits in a value's significand.
///
/// Always within [`Precision::MIN`]`..=`[`Precision::MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Precision(u32);

impl Precision {
    /// Smallest supported precision.
    pub const MIN: u32 = 2;
    /// Largest supported precision (16M bits).
    pub const MAX: u32 = 1 << 24;
    /// Precision of an IEEE-754 binary64 significand.
    pub const DOUBLE: Precision = Precision(53);
    /// Default precision for newly initialized values.
    pub const DEFAULT: Precision = Self::DOUBLE;

    /// Validate a precision in bits.
    pub fn new(bits: u64) -> Result<Self, DecodeError> {
        if (u64::from(Self::MIN)..=u64::from(Self::MAX)).contains(&bits) {
            Ok(Self(bits as u32))
        } else {
            Err(DecodeError::Precision {
                bits,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// The precision in bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// The precision in bits as a `usize`, for bit-length arithmetic.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for Precision {
    type Error = DecodeError;

    fn try_from(bits: u64) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.0)
    }
}
