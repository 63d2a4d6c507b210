//! Arbitrary-precision binary floating-point values.
//!
//! A [`BigFloat`] carries its own significand precision and one of the
//! states NaN, ±infinity, signed zero, or a finite value
//! `(-1)^sign · m · 2^e` with an unbounded integer significand. Every
//! operation computes the exact result first and rounds it exactly once
//! into the destination precision under an explicit
//! [`RoundingMode`](mparena_core::RoundingMode), reporting the
//! direction of the rounding error as a [`Ternary`].
//!
//! The exponent is an `i64` and is never clamped, so there is no
//! overflow to infinity or underflow to zero inside this crate. The
//! only saturating path is [`BigFloat::to_f64`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arith;
mod convert;
mod repr;
mod round;
pub mod ternary;
pub mod value;

pub use arith::BinaryOp;
pub use ternary::Ternary;
pub use value::BigFloat;
