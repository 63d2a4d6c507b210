//! The session: one pool, one worker pool, one strategy set.
//!
//! [`Session`] is the call surface a host binding talks to. It owns the
//! value [`Pool`](mparena_pool::Pool), a rayon worker pool for the
//! parallel multiply strategies, the set of enabled strategies and an
//! optional accelerated backend. Every operation validates its ranges
//! and shapes before touching a value and returns a typed
//! [`SessionError`]; [`SessionStatus`] maps those errors onto stable
//! integer codes for the host boundary.
//!
//! Diagnostics go through `tracing` and are additionally gated by the
//! session's [`Verbosity`](mparena_core::Verbosity).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod operand;
pub mod session;
pub mod status;

pub use config::{ConfigError, SessionConfig};
pub use error::SessionError;
pub use operand::Operand;
pub use session::Session;
pub use status::SessionStatus;
