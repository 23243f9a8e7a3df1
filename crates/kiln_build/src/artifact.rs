//! Build artifacts written for each compiled contract.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kiln_source::{Bytecode, Contract, Source};
use serde::Serialize;

use crate::error::BuildError;

/// Subdirectory of the artifacts directory holding per-contract records.
pub const ARTIFACTS_SUBDIR: &str = "out";

/// The persisted record of one contract, joined with its source's AST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    /// Interface descriptor.
    pub abi: serde_json::Value,
    /// Creation bytecode.
    pub bytecode: Option<Bytecode>,
    /// Runtime bytecode.
    pub deployed_bytecode: Option<Bytecode>,
    /// Function signature to selector table.
    pub method_identifiers: BTreeMap<String, String>,
    /// Metadata exactly as the compiler emitted it.
    pub raw_metadata: String,
    /// Metadata parsed as JSON (`null` if it is not valid JSON).
    pub metadata: serde_json::Value,
    /// Syntax tree of the owning source.
    pub ast: Option<serde_json::Value>,
}

impl ArtifactRecord {
    /// Joins `contract` with the AST of its owning `source`.
    pub fn new(contract: &Contract, source: &Source) -> Self {
        let metadata = serde_json::from_str(&contract.metadata).unwrap_or(serde_json::Value::Null);
        Self {
            abi: contract.abi.clone(),
            bytecode: contract.bytecode.clone(),
            deployed_bytecode: contract.deployed_bytecode.clone(),
            method_identifiers: contract.method_identifiers.clone(),
            raw_metadata: contract.metadata.clone(),
            metadata,
            ast: source.ast.clone(),
        }
    }

    /// Writes the record pretty-printed to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), BuildError> {
        let io_err = |source| BuildError::Artifact {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        std::fs::write(path, json).map_err(io_err)
    }
}

/// Returns `<artifacts>/out/<source>/`.
pub fn source_artifact_dir(artifacts_dir: &Path, source: &str) -> PathBuf {
    artifacts_dir.join(ARTIFACTS_SUBDIR).join(source)
}

/// Returns `<artifacts>/out/<source>/<name>.json`.
pub fn artifact_path(artifacts_dir: &Path, source: &str, name: &str) -> PathBuf {
    source_artifact_dir(artifacts_dir, source).join(format!("{name}.json"))
}

/// Removes a file, treating an already absent file as removed.
pub(crate) fn remove_file(path: &Path) -> Result<(), BuildError> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(BuildError::Artifact {
            path: path.to_path_buf(),
            source: e,
        }),
        _ => Ok(()),
    }
}

/// Removes a directory tree, treating an already absent one as removed.
pub(crate) fn remove_dir(path: &Path) -> Result<(), BuildError> {
    match std::fs::remove_dir_all(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(BuildError::Artifact {
            path: path.to_path_buf(),
            source: e,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn contract(metadata: &str) -> Contract {
        Contract {
            name: "Token".to_string(),
            source: "tokens/Token.sol".to_string(),
            abi: serde_json::json!([{"type": "function", "name": "totalSupply"}]),
            bytecode: Some(Bytecode {
                object: "6080".to_string(),
                ..Default::default()
            }),
            deployed_bytecode: None,
            method_identifiers: [("totalSupply()".to_string(), "18160ddd".to_string())]
                .into_iter()
                .collect(),
            metadata: metadata.to_string(),
        }
    }

    fn source() -> Source {
        let mut src = kiln_source::parse_source(
            "pragma solidity ^0.8.0;",
            "tokens/Token.sol",
            SystemTime::UNIX_EPOCH,
        )
        .unwrap();
        src.ast = Some(serde_json::json!({"nodeType": "SourceUnit", "id": 7}));
        src
    }

    #[test]
    fn path_layout() {
        let p = artifact_path(Path::new("/proj/build"), "tokens/Token.sol", "Token");
        assert_eq!(p, PathBuf::from("/proj/build/out/tokens/Token.sol/Token.json"));
    }

    #[test]
    fn record_fields() {
        let record = ArtifactRecord::new(&contract(r#"{"language":"Solidity"}"#), &source());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["abi"][0]["name"], "totalSupply");
        assert_eq!(json["bytecode"]["object"], "6080");
        assert!(json["deployedBytecode"].is_null());
        assert_eq!(json["methodIdentifiers"]["totalSupply()"], "18160ddd");
        assert_eq!(json["rawMetadata"], r#"{"language":"Solidity"}"#);
        assert_eq!(json["metadata"]["language"], "Solidity");
        assert_eq!(json["ast"]["id"], 7);
    }

    #[test]
    fn unparsable_metadata_is_null() {
        let record = ArtifactRecord::new(&contract(""), &source());
        assert!(record.metadata.is_null());
        assert_eq!(record.raw_metadata, "");
    }

    #[test]
    fn write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact_path(dir.path(), "tokens/Token.sol", "Token");
        ArtifactRecord::new(&contract("{}"), &source())
            .write(&path)
            .unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["bytecode"]["object"], "6080");
    }

    #[test]
    fn removing_absent_paths_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        remove_file(&dir.path().join("nope.json")).unwrap();
        remove_dir(&dir.path().join("nope")).unwrap();
    }
}
