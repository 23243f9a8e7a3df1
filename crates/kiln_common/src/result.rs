//! Broken-invariant errors shared by the pipeline stages.

/// Result of a stage that can only fail when an earlier stage handed it
/// inconsistent data.
pub type KilnResult<T> = Result<T, InternalError>;

/// A consistency violation between pipeline stages.
///
/// Never caused by the user's project: input problems have their own error
/// enums in the crate that detects them.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Which invariant broke, and where.
    pub message: String,
}

impl InternalError {
    /// Creates an internal error with a free-form message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A dependency edge from `from` names `to`, which is not registered.
    pub fn dangling_edge(from: &str, to: &str) -> Self {
        Self::new(format!(
            "dependency graph edge {from} -> {to} points at an unregistered source"
        ))
    }

    /// A contract reported as compiled in this run is absent from the
    /// registry.
    pub fn missing_contract(qualified: &str) -> Self {
        Self::new(format!("compiled contract {qualified} is not registered"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_edge_names_both_ends() {
        let err = InternalError::dangling_edge("Token.sol", "lib/Math.sol");
        assert_eq!(
            err.to_string(),
            "internal error: dependency graph edge Token.sol -> lib/Math.sol points at an unregistered source"
        );
    }

    #[test]
    fn missing_contract_names_unit() {
        let lookup = |found: bool| -> KilnResult<u8> {
            found
                .then_some(1)
                .ok_or_else(|| InternalError::missing_contract("Vault.sol:Vault"))
        };
        assert_eq!(lookup(true).unwrap(), 1);
        assert_eq!(
            lookup(false).unwrap_err().message,
            "compiled contract Vault.sol:Vault is not registered"
        );
    }
}
