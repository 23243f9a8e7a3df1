//! The top-level build error.

use std::path::PathBuf;

use kiln_cache::CacheError;
use kiln_common::InternalError;
use kiln_solc::SolcError;
use kiln_svm::SvmError;
use kiln_version::VersionError;

/// Any failure of a build run.
///
/// A run either completes for every selected component or fails with one of
/// these; there is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Change detection or registry persistence failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A source imports a path that is not a known source.
    #[error("{importer}: import '{import}' does not name a source in the contracts directory")]
    UnresolvedImport {
        /// Path of the importing source.
        importer: String,
        /// The resolved import path.
        import: String,
    },

    /// A component's pragmas reject the configured compiler version, or a
    /// pragma is malformed.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// The compiler executable could not be acquired.
    #[error(transparent)]
    Toolchain(#[from] SvmError),

    /// The compiler failed for a component.
    #[error("failed to compile {}: {error}", .sources.join(", "))]
    Compile {
        /// Member sources of the failed component.
        sources: Vec<String>,
        /// What the compiler reported.
        error: SolcError,
    },

    /// An artifact could not be written or removed.
    #[error("artifact I/O error at {path}: {source}")]
    Artifact {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An invariant between pipeline stages was broken.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
