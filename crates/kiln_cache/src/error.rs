//! Error types for registry and change-detection operations.

use std::path::PathBuf;

use kiln_source::ScanError;

/// Errors that can occur while detecting changes or persisting the registry.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading sources or writing the cache file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A changed source could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A source file is not valid UTF-8.
    #[error("source {path} is not valid UTF-8")]
    InvalidUtf8 {
        /// Path of the source relative to the contracts directory.
        path: String,
    },

    /// The registry could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/p/contracts/A.sol"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("A.sol"));
    }

    #[test]
    fn scan_error_is_transparent() {
        let err: CacheError = ScanError::MissingPragma {
            path: "A.sol".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "A.sol: pragma not found");
    }

    #[test]
    fn invalid_utf8_display() {
        let err = CacheError::InvalidUtf8 {
            path: "bin.sol".to_string(),
        };
        assert!(err.to_string().contains("bin.sol"));
    }
}
