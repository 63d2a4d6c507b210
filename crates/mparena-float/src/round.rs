//! The single rounding step every operation funnels through.

use dashu::base::BitTest;
use dashu::integer::UBig;
use mparena_core::{Precision, RoundingMode};

use crate::repr::Repr;
use crate::ternary::Ternary;

/// Largest `e` such that a finite value may lie in `[2^(e-1), 2^e)`.
pub(crate) const EXP_MAX: i64 = (1 << 30) - 1;
/// Smallest such `e`.
pub(crate) const EXP_MIN: i64 = 1 - (1 << 30);

/// Round `repr` to `prec` significand bits under `rnd`.
///
/// Non-finite values and zeros pass through unchanged and exact. Finite
/// results outside `EXP_MIN..=EXP_MAX` overflow to infinity or the
/// largest finite value, and underflow to zero or the smallest one, as
/// the rounding direction dictates.
pub(crate) fn round(repr: Repr, prec: Precision, rnd: RoundingMode) -> (Repr, Ternary) {
    match repr {
        Repr::Finite { neg, mant, exp } => {
            let above_half_min = exceeds_half_min(&mant, exp);
            let r = round_finite(neg, mant, exp, prec, rnd);
            let e = r.exp + r.mant.bit_len() as i64;
            if e > EXP_MAX {
                overflow(neg, prec, rnd)
            } else if e < EXP_MIN {
                underflow(neg, above_half_min, rnd)
            } else {
                (
                    Repr::Finite {
                        neg: r.neg,
                        mant: r.mant,
                        exp: r.exp,
                    },
                    r.ternary,
                )
            }
        }
        other => (other, Ternary::Exact),
    }
}

/// Whether `|mant · 2^exp|` is strictly above half the smallest
/// representable magnitude, `2^(EXP_MIN - 2)`.
fn exceeds_half_min(mant: &UBig, exp: i64) -> bool {
    let bits = mant.bit_len();
    let e = exp + bits as i64;
    e > EXP_MIN - 1 || (e == EXP_MIN - 1 && mant.trailing_zeros() != Some(bits - 1))
}

fn overflow(neg: bool, prec: Precision, rnd: RoundingMode) -> (Repr, Ternary) {
    if rnd.rounds_up_magnitude(neg, true, true, false) {
        return (Repr::Inf { neg }, direction(true, neg));
    }
    let p = prec.as_usize();
    let largest = Repr::Finite {
        neg,
        mant: (UBig::ONE << p) - UBig::ONE,
        exp: EXP_MAX - p as i64,
    };
    (largest, direction(false, neg))
}

fn underflow(neg: bool, above_half_min: bool, rnd: RoundingMode) -> (Repr, Ternary) {
    let up = match rnd {
        RoundingMode::NearestEven => above_half_min,
        _ => rnd.rounds_up_magnitude(neg, true, true, false),
    };
    if up {
        let smallest = Repr::Finite {
            neg,
            mant: UBig::ONE,
            exp: EXP_MIN - 1,
        };
        (smallest, direction(true, neg))
    } else {
        (Repr::Zero { neg }, direction(false, neg))
    }
}

/// Ternary of a result whose magnitude moved up (or down) from the exact
/// value of sign `neg`.
fn direction(up: bool, neg: bool) -> Ternary {
    if up != neg {
        Ternary::Above
    } else {
        Ternary::Below
    }
}

/// A finite value after rounding, already in canonical form.
pub(crate) struct Rounded {
    pub(crate) neg: bool,
    pub(crate) mant: UBig,
    pub(crate) exp: i64,
    pub(crate) ternary: Ternary,
}

/// Round a non-zero finite `(-1)^neg · mant · 2^exp`.
pub(crate) fn round_finite(
    neg: bool,
    mant: UBig,
    exp: i64,
    prec: Precision,
    rnd: RoundingMode,
) -> Rounded {
    debug_assert!(mant != UBig::ZERO);
    let bits = mant.bit_len();
    let p = prec.as_usize();
    if bits <= p {
        let (mant, exp) = strip(mant, exp);
        return Rounded {
            neg,
            mant,
            exp,
            ternary: Ternary::Exact,
        };
    }

    let shift = bits - p;
    let round_bit = mant.bit(shift - 1);
    let sticky = mant.trailing_zeros().is_some_and(|tz| tz < shift - 1);
    let mut kept = mant >> shift;
    let mut exp = exp + shift as i64;

    if !round_bit && !sticky {
        let (mant, exp) = strip(kept, exp);
        return Rounded {
            neg,
            mant,
            exp,
            ternary: Ternary::Exact,
        };
    }

    let up = rnd.rounds_up_magnitude(neg, round_bit, sticky, kept.bit(0));
    if up {
        kept = kept + UBig::ONE;
        // Carry out of the top bit: 0b111 + 1 = 0b1000.
        if kept.bit_len() > p {
            kept = kept >> 1usize;
            exp += 1;
        }
    }
    let ternary = direction(up, neg);
    let (mant, exp) = strip(kept, exp);
    Rounded {
        neg,
        mant,
        exp,
        ternary,
    }
}

/// Remove trailing zero bits so the significand is odd.
fn strip(mant: UBig, exp: i64) -> (UBig, i64) {
    match mant.trailing_zeros() {
        Some(tz) if tz > 0 => (mant >> tz, exp + tz as i64),
        _ => (mant, exp),
    }
}
