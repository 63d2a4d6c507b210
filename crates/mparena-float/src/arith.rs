//! Correctly rounded arithmetic.
//!
//! Each operation builds the exact result (or, for division, a result
//! carrying a sticky bit that preserves the rounding decision) and rounds
//! once into the destination precision.

use std::cmp::Ordering;

use dashu::base::BitTest;
use dashu::integer::UBig;
use mparena_core::{Precision, RoundingMode};

use crate::repr::Repr;
use crate::ternary::Ternary;
use crate::value::BigFloat;

fn exact_mul(a: &Repr, b: &Repr) -> Repr {
    match (a, b) {
        (Repr::Nan, _) | (_, Repr::Nan) => Repr::Nan,
        (Repr::Inf { .. }, Repr::Zero { .. }) | (Repr::Zero { .. }, Repr::Inf { .. }) => Repr::Nan,
        (Repr::Inf { neg }, other) | (other, Repr::Inf { neg }) => Repr::Inf {
            neg: *neg ^ other.is_negative(),
        },
        (Repr::Zero { neg }, other) | (other, Repr::Zero { neg }) => Repr::Zero {
            neg: *neg ^ other.is_negative(),
        },
        (
            Repr::Finite {
                neg: an,
                mant: am,
                exp: ae,
            },
            Repr::Finite {
                neg: bn,
                mant: bm,
                exp: be,
            },
        ) => Repr::Finite {
            neg: an ^ bn,
            mant: am * bm,
            exp: ae + be,
        },
    }
}

/// Sum that rounds to `prec` exactly like the true sum. Exact cancellation
/// yields +0, or -0 when rounding toward negative infinity.
///
/// An operand lying wholly below the rounding position of the other is
/// replaced by a single bit just under it, so the shifts stay bounded by
/// the operand widths rather than their exponent gap.
fn exact_add(a: Repr, b: Repr, prec: Precision, rnd: RoundingMode) -> Repr {
    let cancel_zero = Repr::Zero {
        neg: rnd == RoundingMode::TowardNegative,
    };
    match (a, b) {
        (Repr::Nan, _) | (_, Repr::Nan) => Repr::Nan,
        (Repr::Inf { neg: x }, Repr::Inf { neg: y }) => {
            if x == y {
                Repr::Inf { neg: x }
            } else {
                Repr::Nan
            }
        }
        (Repr::Inf { neg }, _) | (_, Repr::Inf { neg }) => Repr::Inf { neg },
        (Repr::Zero { neg: x }, Repr::Zero { neg: y }) => {
            if x == y {
                Repr::Zero { neg: x }
            } else {
                cancel_zero
            }
        }
        (Repr::Zero { .. }, other) | (other, Repr::Zero { .. }) => other,
        (
            Repr::Finite {
                neg: an,
                mant: mut am,
                exp: mut ae,
            },
            Repr::Finite {
                neg: bn,
                mant: mut bm,
                exp: mut be,
            },
        ) => {
            let p = prec.as_usize() as i64;
            let (ta, tb) = (top(&am, ae), top(&bm, be));
            if ta > tb {
                let cut = ae.min(ta - p) - 2;
                if tb <= cut {
                    bm = UBig::ONE;
                    be = cut - 1;
                }
            } else if tb > ta {
                let cut = be.min(tb - p) - 2;
                if ta <= cut {
                    am = UBig::ONE;
                    ae = cut - 1;
                }
            }
            let exp = ae.min(be);
            let am = am << (ae - exp) as usize;
            let bm = bm << (be - exp) as usize;
            if an == bn {
                return Repr::Finite {
                    neg: an,
                    mant: am + bm,
                    exp,
                };
            }
            match am.cmp(&bm) {
                Ordering::Greater => Repr::Finite {
                    neg: an,
                    mant: am - bm,
                    exp,
                },
                Ordering::Less => Repr::Finite {
                    neg: bn,
                    mant: bm - am,
                    exp,
                },
                Ordering::Equal => cancel_zero,
            }
        }
    }
}

/// `t` such that the non-zero `mant · 2^exp` lies in `[2^(t-1), 2^t)`.
fn top(mant: &UBig, exp: i64) -> i64 {
    exp + mant.bit_len() as i64
}

/// Quotient with enough bits for `prec` plus a trailing sticky bit.
fn sticky_div(a: &Repr, b: &Repr, prec: Precision) -> Repr {
    match (a, b) {
        (Repr::Nan, _) | (_, Repr::Nan) => Repr::Nan,
        (Repr::Inf { .. }, Repr::Inf { .. }) | (Repr::Zero { .. }, Repr::Zero { .. }) => Repr::Nan,
        (Repr::Inf { neg }, other) => Repr::Inf {
            neg: *neg ^ other.is_negative(),
        },
        (other, Repr::Inf { neg }) => Repr::Zero {
            neg: *neg ^ other.is_negative(),
        },
        (Repr::Zero { neg }, other) => Repr::Zero {
            neg: *neg ^ other.is_negative(),
        },
        (other, Repr::Zero { neg }) => Repr::Inf {
            neg: *neg ^ other.is_negative(),
        },
        (
            Repr::Finite {
                neg: an,
                mant: am,
                exp: ae,
            },
            Repr::Finite {
                neg: bn,
                mant: bm,
                exp: be,
            },
        ) => {
            let want = prec.as_usize() + 2 + bm.bit_len();
            let shift = want.saturating_sub(am.bit_len());
            let num = am.clone() << shift;
            let quot = &num / bm;
            let rem = &num % bm;
            let mut mant = quot << 1usize;
            if rem != UBig::ZERO {
                mant = mant + UBig::ONE;
            }
            Repr::Finite {
                neg: an ^ bn,
                mant,
                exp: ae - be - shift as i64 - 1,
            }
        }
    }
}

/// Binary operator selector for [`BigFloat::binary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a · b`
    Mul,
    /// `a / b`
    Div,
}

impl BigFloat {
    /// `a + b` rounded to `prec`.
    pub fn add(a: &Self, b: &Self, prec: Precision, rnd: RoundingMode) -> (Self, Ternary) {
        let exact = exact_add(a.repr.clone(), b.repr.clone(), prec, rnd);
        Self::from_rounded(exact, prec, rnd)
    }

    /// `a - b` rounded to `prec`.
    pub fn sub(a: &Self, b: &Self, prec: Precision, rnd: RoundingMode) -> (Self, Ternary) {
        let exact = exact_add(a.repr.clone(), b.repr.clone().negated(), prec, rnd);
        Self::from_rounded(exact, prec, rnd)
    }

    /// `a · b` rounded to `prec`.
    pub fn mul(a: &Self, b: &Self, prec: Precision, rnd: RoundingMode) -> (Self, Ternary) {
        Self::from_rounded(exact_mul(&a.repr, &b.repr), prec, rnd)
    }

    /// `a / b` rounded to `prec`.
    pub fn div(a: &Self, b: &Self, prec: Precision, rnd: RoundingMode) -> (Self, Ternary) {
        Self::from_rounded(sticky_div(&a.repr, &b.repr, prec), prec, rnd)
    }

    /// `a · b + c` with a single rounding to `prec`.
    pub fn fma(a: &Self, b: &Self, c: &Self, prec: Precision, rnd: RoundingMode) -> (Self, Ternary) {
        let exact = exact_add(exact_mul(&a.repr, &b.repr), c.repr.clone(), prec, rnd);
        Self::from_rounded(exact, prec, rnd)
    }

    /// Dispatch on `op`.
    pub fn binary(
        op: BinaryOp,
        a: &Self,
        b: &Self,
        prec: Precision,
        rnd: RoundingMode,
    ) -> (Self, Ternary) {
        match op {
            BinaryOp::Add => Self::add(a, b, prec, rnd),
            BinaryOp::Sub => Self::sub(a, b, prec, rnd),
            BinaryOp::Mul => Self::mul(a, b, prec, rnd),
            BinaryOp::Div => Self::div(a, b, prec, rnd),
        }
    }

    /// `self ← a · b + self`, rounded once to `self`'s precision.
    pub fn add_mul(&mut self, a: &Self, b: &Self, rnd: RoundingMode) -> Ternary {
        let (next, t) = Self::fma(a, b, self, self.precision(), rnd);
        *self = next;
        t
    }

    /// `self ← self + Σ xᵢ·yᵢ`, accumulated at `work` precision and
    /// rounded into `self` at the end.
    ///
    /// Returns the bitwise OR of the status codes of every rounding step,
    /// so a non-zero result means some step was inexact.
    pub fn dot_accumulate<'x, 'y, I>(&mut self, terms: I, work: Precision, rnd: RoundingMode) -> i32
    where
        I: IntoIterator<Item = (&'x Self, &'y Self)>,
    {
        let (mut acc, t) = self.rounded(work, rnd);
        let mut status = t.code();
        for (x, y) in terms {
            let (next, t) = Self::fma(x, y, &acc, work, rnd);
            acc = next;
            status |= t.code();
        }
        status | self.set(&acc, rnd).code()
    }
}
