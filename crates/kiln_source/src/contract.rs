//! Compiled units produced from sources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Object code of a compiled unit, as reported by the compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bytecode {
    /// Hex-encoded object code (may contain unlinked library placeholders).
    #[serde(default)]
    pub object: String,
    /// Compressed source map.
    #[serde(default)]
    pub source_map: String,
    /// Unresolved library link references.
    #[serde(default)]
    pub link_references: serde_json::Value,
}

/// One compiled unit (a contract, library, or interface).
///
/// Identity is (`source`, `name`). A contract is always replaced wholesale
/// when its owning source is recompiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Name of the unit as declared in the source.
    pub name: String,
    /// Path of the owning source relative to the contracts directory.
    pub source: String,
    /// Interface descriptor.
    pub abi: serde_json::Value,
    /// Creation bytecode.
    pub bytecode: Option<Bytecode>,
    /// Runtime bytecode.
    pub deployed_bytecode: Option<Bytecode>,
    /// Function signature to selector table.
    #[serde(default)]
    pub method_identifiers: BTreeMap<String, String>,
    /// Raw metadata JSON emitted by the compiler.
    #[serde(default)]
    pub metadata: String,
}

impl Contract {
    /// Returns the `source:name` form used to report compiled units.
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.source, &self.name)
    }
}

/// Joins a source path and unit name as `source:name`.
pub fn qualified_name(source: &str, name: &str) -> String {
    format!("{source}:{name}")
}

/// Splits a `source:name` string at its last `:`.
pub fn split_qualified_name(qualified: &str) -> Option<(&str, &str)> {
    qualified.rsplit_once(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_roundtrip() {
        let q = qualified_name("tokens/Token.sol", "Token");
        assert_eq!(q, "tokens/Token.sol:Token");
        assert_eq!(split_qualified_name(&q), Some(("tokens/Token.sol", "Token")));
        assert_eq!(split_qualified_name("no-colon"), None);
    }

    #[test]
    fn bytecode_uses_compiler_field_names() {
        let json = r#"{"object":"6080","sourceMap":"1:2:0","linkReferences":{}}"#;
        let bc: Bytecode = serde_json::from_str(json).unwrap();
        assert_eq!(bc.object, "6080");
        assert_eq!(bc.source_map, "1:2:0");
        assert!(bc.link_references.is_object());
    }
}
