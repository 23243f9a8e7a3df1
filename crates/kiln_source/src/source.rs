//! The [`Source`] record and its derivation from file text.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::resolve::resolve_imports;
use crate::scan::{parse_imports, parse_pragmas};

/// One tracked source file.
///
/// Identity is `dir` + `filename`; [`Source::path`] renders it as the
/// forward-slash path relative to the contracts directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Directory of the file relative to the contracts directory (`""` at the root).
    pub dir: String,
    /// File name including extension.
    pub filename: String,
    /// Modification time observed when the file was last scanned.
    pub modified: SystemTime,
    /// Constraint text of each `pragma solidity` statement, in order.
    pub version: Vec<String>,
    /// Imports resolved to canonical paths.
    pub imports: Vec<String>,
    /// Syntax tree reported by the last successful compile of this file.
    #[serde(default)]
    pub ast: Option<serde_json::Value>,
}

impl Source {
    /// Returns the path of this source relative to the contracts directory.
    pub fn path(&self) -> String {
        if self.dir.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", self.dir, self.filename)
        }
    }

    /// Returns the first declared version constraint.
    pub fn primary_pragma(&self) -> Option<&str> {
        self.version.first().map(String::as_str)
    }
}

/// Splits a relative path into its directory and file name.
pub fn split_path(path: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some((dir, filename)) => (dir.to_string(), filename.to_string()),
        None => (String::new(), path.to_string()),
    }
}

/// Derives a [`Source`] from the text of the file at `path`.
///
/// Imports are resolved against the file's directory. A file without a
/// version pragma is rejected. The returned record carries no AST.
pub fn parse_source(content: &str, path: &str, modified: SystemTime) -> Result<Source, ScanError> {
    let (dir, filename) = split_path(path);

    let raw_imports = parse_imports(content);
    let imports = resolve_imports(path, &raw_imports)?;

    let version = parse_pragmas(content);
    if version.is_empty() {
        return Err(ScanError::MissingPragma {
            path: path.to_string(),
        });
    }

    tracing::debug!(path, imports = imports.len(), pragma = %version[0], "scanned source");

    Ok(Source {
        dir,
        filename,
        modified,
        version,
        imports,
        ast: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = r#"
// SPDX-License-Identifier: MIT
pragma solidity ^0.8.0;

import "../Basic.sol";
import {Math} from './lib/Math.sol';

contract Token is Basic {}
"#;

    #[test]
    fn parse_nested_source() {
        let src = parse_source(TOKEN, "tokens/Token.sol", SystemTime::UNIX_EPOCH).unwrap();
        assert_eq!(src.dir, "tokens");
        assert_eq!(src.filename, "Token.sol");
        assert_eq!(src.path(), "tokens/Token.sol");
        assert_eq!(src.version, vec!["^0.8.0"]);
        assert_eq!(src.imports, vec!["Basic.sol", "tokens/lib/Math.sol"]);
        assert!(src.ast.is_none());
    }

    #[test]
    fn parse_root_source() {
        let src = parse_source("pragma solidity 0.8.4;", "A.sol", SystemTime::UNIX_EPOCH).unwrap();
        assert_eq!(src.dir, "");
        assert_eq!(src.path(), "A.sol");
        assert_eq!(src.primary_pragma(), Some("0.8.4"));
        assert!(src.imports.is_empty());
    }

    #[test]
    fn missing_pragma_rejected() {
        let err = parse_source("contract A {}", "A.sol", SystemTime::UNIX_EPOCH).unwrap_err();
        assert!(matches!(err, ScanError::MissingPragma { path } if path == "A.sol"));
    }

    #[test]
    fn escaping_import_rejected() {
        let code = "pragma solidity ^0.8.0;\nimport \"../../x.sol\";";
        let err = parse_source(code, "a/B.sol", SystemTime::UNIX_EPOCH).unwrap_err();
        assert!(matches!(err, ScanError::ImportEscapesRoot { ref importer, .. } if importer == "a/B.sol"));
    }

    #[test]
    fn split_path_cases() {
        assert_eq!(split_path("a/b/C.sol"), ("a/b".to_string(), "C.sol".to_string()));
        assert_eq!(split_path("C.sol"), (String::new(), "C.sol".to_string()));
    }
}
