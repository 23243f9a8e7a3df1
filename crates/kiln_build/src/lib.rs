//! Incremental compilation of a Solidity project.
//!
//! [`Project::compile`] runs the whole pipeline: change detection, import
//! validation, component partitioning and selection, then for each selected
//! component version resolution, compiler acquisition, compilation and
//! result assembly. Finally deleted sources are pruned, artifacts are
//! written under `out/`, and the registry is saved for the next run.

#![warn(missing_docs)]

pub mod artifact;
pub mod error;
pub mod project;

pub use artifact::{artifact_path, source_artifact_dir, ArtifactRecord, ARTIFACTS_SUBDIR};
pub use error::BuildError;
pub use project::{CompilationResult, CompilationRun, Project, KILN_VERSION};
