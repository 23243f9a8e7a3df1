//! Error types for source scanning and import resolution.

/// Errors raised while deriving a [`Source`](crate::Source) from file text.
///
/// All of these are input errors: the project itself is malformed.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The file declares no `pragma solidity` statement.
    #[error("{path}: pragma not found")]
    MissingPragma {
        /// Path of the offending source.
        path: String,
    },

    /// A relative import climbs above the contracts directory.
    #[error("{importer}: import '{import}' escapes the contracts directory")]
    ImportEscapesRoot {
        /// Path of the importing source.
        importer: String,
        /// The import as written.
        import: String,
    },
}
