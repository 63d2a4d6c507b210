//! Dense matrix kernels over slices of [`BigFloat`](mparena_float::BigFloat).
//!
//! Matrices are column-major: element `(i, j)` of an `M × N` matrix lives
//! at offset `j·M + i`. Kernels never see raw offsets; they go through
//! [`MatrixView`] and [`MatrixViewMut`], whose shapes are checked once
//! against the operand lengths before any arithmetic runs.
//!
//! # Kernels
//!
//! - [`transpose`] copies an `N × M` matrix into an `M × N` one with
//!   rounding into each destination value's precision.
//! - [`multiply`] computes `C ← C + A·B` with one of eight
//!   [`Strategy`] execution plans. Parallel plans run on a caller-owned
//!   rayon pool and write disjoint output elements only.
//!
//! Both report rounding through a [`StatusReport`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod error;
pub mod multiply;
pub mod scratch;
pub mod shape;
pub mod status;
pub mod strategy;
pub mod transpose;
pub mod view;

pub use backend::{BackendError, GemmBackend};
pub use error::KernelError;
pub use multiply::{multiply, GemmOptions};
pub use scratch::ScratchRow;
pub use shape::GemmShape;
pub use status::{Feedback, StatusReport};
pub use strategy::{Strategy, StrategySet};
pub use transpose::transpose;
pub use view::{MatrixView, MatrixViewMut};
