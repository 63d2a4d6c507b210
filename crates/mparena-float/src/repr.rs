//! Internal value representation shared by the rounding and arithmetic code.

use dashu::integer::UBig;

/// A value that may or may not fit a given precision yet.
///
/// Stored values are canonical: a `Finite` significand is odd and at
/// most `precision` bits long. Intermediate results produced by the
/// exact arithmetic helpers are arbitrary until passed through
/// [`round`](crate::round::round).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Repr {
    Nan,
    Inf { neg: bool },
    Zero { neg: bool },
    Finite { neg: bool, mant: UBig, exp: i64 },
}

impl Repr {
    /// Sign bit; NaN reports positive.
    pub(crate) fn is_negative(&self) -> bool {
        match self {
            Self::Nan => false,
            Self::Inf { neg } | Self::Zero { neg } | Self::Finite { neg, .. } => *neg,
        }
    }

    pub(crate) fn negated(self) -> Self {
        match self {
            Self::Nan => Self::Nan,
            Self::Inf { neg } => Self::Inf { neg: !neg },
            Self::Zero { neg } => Self::Zero { neg: !neg },
            Self::Finite { neg, mant, exp } => Self::Finite {
                neg: !neg,
                mant,
                exp,
            },
        }
    }
}
