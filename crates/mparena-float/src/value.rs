//! The [`BigFloat`] value type.

use mparena_core::{Precision, RoundingMode};

use crate::convert::{repr_from_f64, repr_to_f64};
use crate::repr::Repr;
use crate::round::round;
use crate::ternary::Ternary;

/// An arbitrary-precision binary floating-point number.
///
/// The precision is part of the value: operations round into the
/// precision of their destination, never of their operands. A freshly
/// created value is NaN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BigFloat {
    prec: Precision,
    pub(crate) repr: Repr,
}

impl BigFloat {
    /// Largest `e` such that a finite value may lie in `[2^(e-1), 2^e)`.
    /// Results beyond it overflow.
    pub const EXP_MAX: i64 = crate::round::EXP_MAX;
    /// Smallest such `e` for a non-zero value. Results below it underflow.
    pub const EXP_MIN: i64 = crate::round::EXP_MIN;

    /// NaN at `prec`.
    pub fn nan(prec: Precision) -> Self {
        Self {
            prec,
            repr: Repr::Nan,
        }
    }

    /// Signed zero at `prec`.
    pub fn zero(prec: Precision, negative: bool) -> Self {
        Self {
            prec,
            repr: Repr::Zero { neg: negative },
        }
    }

    /// Signed infinity at `prec`.
    pub fn infinity(prec: Precision, negative: bool) -> Self {
        Self {
            prec,
            repr: Repr::Inf { neg: negative },
        }
    }

    /// `v` rounded to nearest at `prec`.
    pub fn from_f64(v: f64, prec: Precision) -> Self {
        let mut out = Self::nan(prec);
        out.set_f64(v, RoundingMode::NearestEven);
        out
    }

    pub(crate) fn from_rounded(repr: Repr, prec: Precision, rnd: RoundingMode) -> (Self, Ternary) {
        let (repr, t) = round(repr, prec, rnd);
        (Self { prec, repr }, t)
    }

    /// Significand precision in bits.
    pub fn precision(&self) -> Precision {
        self.prec
    }

    /// Change the precision. The value becomes NaN.
    pub fn set_precision(&mut self, prec: Precision) {
        self.prec = prec;
        self.repr = Repr::Nan;
    }

    /// Release the significand and start over as NaN at `prec`.
    pub fn reset(&mut self, prec: Precision) {
        *self = Self::nan(prec);
    }

    /// Whether the value is NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self.repr, Repr::Nan)
    }

    /// Whether the value is ±infinity.
    pub fn is_infinite(&self) -> bool {
        matches!(self.repr, Repr::Inf { .. })
    }

    /// Whether the value is ±0.
    pub fn is_zero(&self) -> bool {
        matches!(self.repr, Repr::Zero { .. })
    }

    /// Whether the value is neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        matches!(self.repr, Repr::Zero { .. } | Repr::Finite { .. })
    }

    /// Sign bit. NaN reports `false`.
    pub fn is_sign_negative(&self) -> bool {
        self.repr.is_negative()
    }

    /// Whether `self` and `other` denote the same number, ignoring
    /// precision. NaN equals nothing; +0 and -0 are equal.
    pub fn same_value(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Nan, _) | (_, Repr::Nan) => false,
            (Repr::Zero { .. }, Repr::Zero { .. }) => true,
            (a, b) => a == b,
        }
    }

    /// Copy `src` into `self`, rounding to `self`'s precision.
    pub fn set(&mut self, src: &Self, rnd: RoundingMode) -> Ternary {
        let (repr, t) = round(src.repr.clone(), self.prec, rnd);
        self.repr = repr;
        t
    }

    /// `self` rounded to a different precision, as a new value.
    pub fn rounded(&self, prec: Precision, rnd: RoundingMode) -> (Self, Ternary) {
        Self::from_rounded(self.repr.clone(), prec, rnd)
    }

    /// Store `v`, rounding to `self`'s precision.
    pub fn set_f64(&mut self, v: f64, rnd: RoundingMode) -> Ternary {
        let (repr, t) = round(repr_from_f64(v), self.prec, rnd);
        self.repr = repr;
        t
    }

    /// Nearest double in the direction given by `rnd`.
    pub fn to_f64(&self, rnd: RoundingMode) -> f64 {
        repr_to_f64(&self.repr, rnd)
    }

    /// Flip the sign in place. Exact.
    pub fn negate(&mut self) {
        let repr = std::mem::replace(&mut self.repr, Repr::Nan);
        self.repr = repr.negated();
    }
}
