//! Error types for version constraint resolution.

/// Errors raised while resolving a component's version constraint.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// A pragma could not be parsed into version comparators.
    #[error("{path}: invalid version pragma '{pragma}': {reason}")]
    InvalidPragma {
        /// Path of the declaring source.
        path: String,
        /// The pragma text as written.
        pragma: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The configured compiler version fails the combined constraint.
    #[error("compiler version {version} does not satisfy '{constraint}' required by {}", .sources.join(", "))]
    Unsatisfied {
        /// The configured compiler version.
        version: String,
        /// The combined constraint expression.
        constraint: String,
        /// Member sources of the component.
        sources: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pragma_display() {
        let err = VersionError::InvalidPragma {
            path: "A.sol".to_string(),
            pragma: ">=".to_string(),
            reason: "dangling operator".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "A.sol: invalid version pragma '>=': dangling operator"
        );
    }

    #[test]
    fn unsatisfied_lists_sources() {
        let err = VersionError::Unsatisfied {
            version: "0.9.0".to_string(),
            constraint: ">=0.8.0, <0.9.0".to_string(),
            sources: vec!["A.sol".to_string(), "B.sol".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("0.9.0 does not satisfy '>=0.8.0, <0.9.0'"));
        assert!(msg.ends_with("A.sol, B.sol"));
    }
}
