//! Arena of arbitrary-precision values addressed by 1-based ranges.
//!
//! # Architecture
//!
//! ```text
//! Pool
//! ├── values: Vec<BigFloat>   (capacity = values.len(), grown in chunks)
//! ├── size                    (slots handed out, size <= capacity)
//! └── FreeList                (non-overlapping ranges inside [1, size])
//! ```
//!
//! Allocation tries the free list first (first fit), then appends at
//! `size + 1`, growing `values` by whole chunks when needed. Freeing
//! re-initializes the values to NaN at the pool's default precision and
//! compacts the free list to a fixed point: entries touching the end of
//! the pool shrink `size`, and adjacent entries merge.
//!
//! Growth never moves a value to a different slot, so a range issued
//! before growth still names the same values afterwards.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod free_list;
pub mod pool;

pub use config::{ConfigError, PoolConfig};
pub use error::PoolError;
pub use free_list::FreeList;
pub use pool::{Operands, Pool};
