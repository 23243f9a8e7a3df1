//! Import graph construction, component partitioning, and rebuild selection.
//!
//! The [`DependencyGraph`] has one vertex per registered source and an edge
//! from every source to each source it imports. Its weakly connected
//! [`Component`]s are the units of incremental rebuild: [`schedule`] keeps the
//! components that contain at least one changed source.

#![warn(missing_docs)]

pub mod graph;
pub mod schedule;

pub use graph::{Component, DependencyGraph};
pub use schedule::{schedule, Schedule};
