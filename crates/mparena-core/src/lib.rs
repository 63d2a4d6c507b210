//! Core types for the mparena workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate: the 1-based inclusive
//! [`Range`] handle, the [`RoundingMode`] and [`Precision`] numeric
//! settings, the diagnostic [`Verbosity`] level, and the
//! [`DecodeError`] raised when a host-supplied code does not map onto
//! one of them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod precision;
pub mod range;
pub mod rounding;
pub mod verbosity;

pub use error::DecodeError;
pub use precision::Precision;
pub use range::Range;
pub use rounding::RoundingMode;
pub use verbosity::Verbosity;
