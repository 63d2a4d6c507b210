//! Conversion to and from IEEE-754 doubles.

use dashu::base::BitTest;
use dashu::integer::UBig;
use mparena_core::{Precision, RoundingMode};

use crate::repr::Repr;
use crate::round::round_finite;

const MANTISSA_BITS: u32 = 52;
const EXP_MASK: u64 = 0x7ff;
/// Exponent of the least significant bit of a subnormal double.
const MIN_EXP: i64 = -1074;

/// Decode a double exactly. No rounding is involved.
pub(crate) fn repr_from_f64(v: f64) -> Repr {
    if v.is_nan() {
        return Repr::Nan;
    }
    if v.is_infinite() {
        return Repr::Inf { neg: v < 0.0 };
    }
    if v == 0.0 {
        return Repr::Zero {
            neg: v.is_sign_negative(),
        };
    }
    let bits = v.to_bits();
    let neg = bits >> 63 == 1;
    let biased = ((bits >> MANTISSA_BITS) & EXP_MASK) as i64;
    let frac = bits & ((1u64 << MANTISSA_BITS) - 1);
    let (mant, exp) = if biased == 0 {
        (frac, MIN_EXP)
    } else {
        (frac | (1u64 << MANTISSA_BITS), biased + MIN_EXP - 1)
    };
    Repr::Finite {
        neg,
        mant: UBig::from(mant),
        exp,
    }
}

/// Round to 53 bits under `rnd`, then scale into a double.
///
/// Results beyond the double range saturate to ±infinity or ±0. Values in
/// the subnormal range are rounded a second time by the hardware scaling.
pub(crate) fn repr_to_f64(repr: &Repr, rnd: RoundingMode) -> f64 {
    match repr {
        Repr::Nan => f64::NAN,
        Repr::Inf { neg } => signed(*neg, f64::INFINITY),
        Repr::Zero { neg } => signed(*neg, 0.0),
        Repr::Finite { neg, mant, exp } => {
            let r = round_finite(*neg, mant.clone(), *exp, Precision::DOUBLE, rnd);
            signed(r.neg, scale(small_to_f64(&r.mant), r.exp))
        }
    }
}

fn signed(neg: bool, magnitude: f64) -> f64 {
    if neg {
        -magnitude
    } else {
        magnitude
    }
}

/// A significand of at most 53 bits, converted exactly.
fn small_to_f64(mant: &UBig) -> f64 {
    let mut acc = 0u64;
    for i in 0..mant.bit_len().min(64) {
        if mant.bit(i) {
            acc |= 1 << i;
        }
    }
    acc as f64
}

/// `m · 2^e` in steps that stay inside the normal range.
fn scale(mut m: f64, mut e: i64) -> f64 {
    const STEP: i32 = 960;
    let up = 2f64.powi(STEP);
    let down = 2f64.powi(-STEP);
    while e > i64::from(STEP) {
        m *= up;
        e -= i64::from(STEP);
        if m.is_infinite() {
            return m;
        }
    }
    while e < -i64::from(STEP) {
        m *= down;
        e += i64::from(STEP);
        if m == 0.0 {
            return m;
        }
    }
    m * 2f64.powi(e as i32)
}
