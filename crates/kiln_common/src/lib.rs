//! Shared foundational types used across the kiln build engine.
//!
//! Provides the internal-error type used to report broken invariants between
//! pipeline stages, distinct from the user-facing errors each crate defines.

#![warn(missing_docs)]

pub mod result;

pub use result::{InternalError, KilnResult};
