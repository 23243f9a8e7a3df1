//! Error types for compiler acquisition.

use std::path::PathBuf;

/// Errors raised while resolving or installing a compiler version.
#[derive(Debug, thiserror::Error)]
pub enum SvmError {
    /// The requested version is not a valid semantic version.
    #[error("invalid compiler version '{version}': {reason}")]
    InvalidVersion {
        /// The version string as given.
        version: String,
        /// Parser message.
        reason: String,
    },

    /// The cache directory path exists but is not a directory.
    #[error("compiler cache path {path} exists and is not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// A filesystem operation on the cache failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The release binary could not be downloaded.
    #[error("failed to fetch solc {version} from {url}: {reason}")]
    Fetch {
        /// Requested version.
        version: String,
        /// Download location.
        url: String,
        /// Transport or status failure.
        reason: String,
    },

    /// No release asset is published for the host platform.
    #[error("no solc release is published for platform '{os}'")]
    UnsupportedPlatform {
        /// Host operating system name.
        os: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        let err = SvmError::Fetch {
            version: "0.8.4".to_string(),
            url: "https://example.invalid/solc".to_string(),
            reason: "http 404 Not Found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch solc 0.8.4 from https://example.invalid/solc: http 404 Not Found"
        );
    }

    #[test]
    fn not_a_directory_display() {
        let err = SvmError::NotADirectory {
            path: PathBuf::from("/home/u/.solc-svm"),
        };
        assert!(err.to_string().contains(".solc-svm"));
    }
}
