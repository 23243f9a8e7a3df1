//! Source and contract registry with modification-time change detection.
//!
//! The [`Registry`] is the single store of known sources and compiled units.
//! [`detect_changes`] compares the contracts directory against it, re-scans
//! every added or modified file into the registry, and reports the delta.
//! The registry can be persisted between runs so successive builds stay
//! incremental across processes.

#![warn(missing_docs)]

pub mod diff;
pub mod error;
pub mod registry;
pub mod snapshot;

pub use diff::{calc_diff, detect_changes, DiffKind, FileDiff};
pub use error::CacheError;
pub use registry::Registry;
pub use snapshot::{RegistrySnapshot, CACHE_FILE, CACHE_SUBDIR};
