//! Version-pragma parsing and per-component constraint resolution.
//!
//! Each source declares a `pragma solidity` constraint. For a component, the
//! distinct clauses of all member pragmas are intersected into one
//! [`VersionConstraint`], which the configured compiler version must satisfy.

#![warn(missing_docs)]

pub mod constraint;
pub mod error;
pub mod pragma;

pub use constraint::{resolve_constraint, VersionConstraint};
pub use error::VersionError;
pub use pragma::{normalize_clauses, Pragma};
