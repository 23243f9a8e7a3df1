//! The standard-JSON output and its decoding into contracts.

use std::collections::BTreeMap;

use kiln_source::{Bytecode, Contract};
use serde::Deserialize;

use crate::error::SolcError;

/// Compiler output as read from standard output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompilerOutput {
    /// Diagnostics reported by the compiler.
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
    /// Contracts keyed by source path, then contract name.
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, ContractOutput>>,
    /// Per-source outputs keyed by source path.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceOutput>,
    /// Compiler version string.
    #[serde(default)]
    pub version: String,
}

/// One compiler diagnostic.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Severity as reported (`error`, `warning`, `info`).
    #[serde(default)]
    pub severity: String,
    /// Short message.
    #[serde(default)]
    pub message: String,
    /// Message with source location.
    #[serde(default)]
    pub formatted_message: String,
}

impl Diagnostic {
    /// Returns the formatted message, falling back to the short one.
    pub fn text(&self) -> &str {
        if self.formatted_message.is_empty() {
            &self.message
        } else {
            &self.formatted_message
        }
    }
}

/// Output for one contract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractOutput {
    /// Interface descriptor.
    #[serde(default)]
    pub abi: serde_json::Value,
    /// EVM outputs.
    #[serde(default)]
    pub evm: EvmOutput,
    /// Raw metadata JSON.
    #[serde(default)]
    pub metadata: String,
}

/// EVM section of a contract's output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmOutput {
    /// Creation bytecode.
    #[serde(default)]
    pub bytecode: Option<Bytecode>,
    /// Runtime bytecode.
    #[serde(default)]
    pub deployed_bytecode: Option<Bytecode>,
    /// Opcode listing.
    #[serde(default)]
    pub opcodes: String,
    /// Source map.
    #[serde(default)]
    pub source_map: String,
    /// Function signature to selector table.
    #[serde(default)]
    pub method_identifiers: BTreeMap<String, String>,
}

/// Output for one source file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceOutput {
    /// Syntax tree.
    #[serde(default)]
    pub ast: Option<serde_json::Value>,
}

/// Decoded result of a successful compilation.
#[derive(Debug, Clone, Default)]
pub struct CompiledSources {
    /// Every contract produced, ordered by source path then name.
    pub contracts: Vec<Contract>,
    /// Syntax tree per source path.
    pub asts: BTreeMap<String, serde_json::Value>,
    /// Compiler version string.
    pub version: String,
}

impl CompilerOutput {
    /// Parses the compiler's standard output.
    pub fn from_json(json: &str) -> Result<Self, SolcError> {
        serde_json::from_str(json).map_err(|e| SolcError::Json {
            reason: e.to_string(),
        })
    }

    /// Returns `true` if the compiler reported any diagnostic.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Decodes the output into contracts and syntax trees.
    ///
    /// Fails with every reported diagnostic if there is at least one, in
    /// which case nothing is decoded.
    pub fn decode(self) -> Result<CompiledSources, SolcError> {
        if self.has_errors() {
            return Err(SolcError::Diagnostics {
                messages: self.errors.iter().map(|d| d.text().to_string()).collect(),
            });
        }

        let mut contracts = Vec::new();
        for (source, units) in self.contracts {
            for (name, unit) in units {
                contracts.push(Contract {
                    name,
                    source: source.clone(),
                    abi: unit.abi,
                    bytecode: unit.evm.bytecode,
                    deployed_bytecode: unit.evm.deployed_bytecode,
                    method_identifiers: unit.evm.method_identifiers,
                    metadata: unit.metadata,
                });
            }
        }

        let asts = self
            .sources
            .into_iter()
            .filter_map(|(path, out)| out.ast.map(|ast| (path, ast)))
            .collect();

        Ok(CompiledSources {
            contracts,
            asts,
            version: self.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = r#"{
        "contracts": {
            "Basic.sol": {
                "Basic": {
                    "abi": [{"type": "function", "name": "get"}],
                    "evm": {
                        "bytecode": {"object": "6080", "sourceMap": "1:2:0", "linkReferences": {}},
                        "deployedBytecode": {"object": "6081", "sourceMap": "", "linkReferences": {}},
                        "methodIdentifiers": {"get()": "6d4ce63c"}
                    },
                    "metadata": "{\"compiler\":{\"version\":\"0.8.4\"}}"
                },
                "Lib": {"abi": [], "evm": {}, "metadata": ""}
            }
        },
        "sources": {"Basic.sol": {"id": 0, "ast": {"nodeType": "SourceUnit"}}},
        "version": "0.8.4+commit.c7e474f2"
    }"#;

    #[test]
    fn decodes_contracts_and_asts() {
        let out = CompilerOutput::from_json(OUTPUT).unwrap();
        let compiled = out.decode().unwrap();

        assert_eq!(compiled.contracts.len(), 2);
        let basic = &compiled.contracts[0];
        assert_eq!(basic.qualified_name(), "Basic.sol:Basic");
        assert_eq!(basic.bytecode.as_ref().unwrap().object, "6080");
        assert_eq!(basic.deployed_bytecode.as_ref().unwrap().object, "6081");
        assert_eq!(basic.method_identifiers["get()"], "6d4ce63c");
        assert!(basic.metadata.contains("0.8.4"));

        let lib = &compiled.contracts[1];
        assert_eq!(lib.name, "Lib");
        assert!(lib.bytecode.is_none());

        assert_eq!(compiled.asts["Basic.sol"]["nodeType"], "SourceUnit");
        assert_eq!(compiled.version, "0.8.4+commit.c7e474f2");
    }

    #[test]
    fn all_diagnostics_are_reported() {
        let json = r#"{
            "errors": [
                {"severity": "error", "message": "a", "formattedMessage": "A.sol:1:1: ParserError: a"},
                {"severity": "error", "message": "b", "formattedMessage": ""}
            ],
            "contracts": {"A.sol": {"A": {"abi": []}}}
        }"#;
        let err = CompilerOutput::from_json(json).unwrap().decode().unwrap_err();
        match err {
            SolcError::Diagnostics { messages } => {
                assert_eq!(messages, vec!["A.sol:1:1: ParserError: a", "b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_is_json_error() {
        let err = CompilerOutput::from_json("Segmentation fault").unwrap_err();
        assert!(matches!(err, SolcError::Json { .. }));
    }

    #[test]
    fn empty_output_decodes_to_nothing() {
        let compiled = CompilerOutput::from_json("{}").unwrap().decode().unwrap();
        assert!(compiled.contracts.is_empty());
        assert!(compiled.asts.is_empty());
    }
}
