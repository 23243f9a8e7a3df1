//! The standard-JSON input descriptor.

use std::collections::BTreeMap;

use kiln_config::{MetadataConfig, OptimizerConfig};
use serde::Serialize;

/// Compiler input for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompilerInput {
    /// Source language; always `Solidity`.
    pub language: String,
    /// Sources to compile, keyed by path relative to the contracts directory.
    pub sources: BTreeMap<String, SourceEntry>,
    /// Compiler settings.
    pub settings: Settings,
}

/// One input source, read by the compiler from its base path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEntry {
    /// Locations of the source content.
    pub urls: Vec<String>,
}

/// Compiler settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Optimizer settings.
    pub optimizer: OptimizerSettings,
    /// Metadata settings.
    pub metadata: MetadataSettings,
    /// Requested outputs per file and contract.
    pub output_selection: serde_json::Value,
}

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizerSettings {
    /// Whether the optimizer runs.
    pub enabled: bool,
    /// Expected number of runs.
    pub runs: u32,
}

/// Metadata settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataSettings {
    /// Hash method for the metadata reference.
    #[serde(rename = "bytecodeHash")]
    pub bytecode_hash: String,
    /// Whether CBOR metadata is appended.
    #[serde(rename = "appendCBOR")]
    pub append_cbor: bool,
}

impl Settings {
    /// Builds settings from the project's optimizer and metadata configuration,
    /// with the default output selection.
    pub fn new(optimizer: &OptimizerConfig, metadata: &MetadataConfig) -> Self {
        Self {
            optimizer: OptimizerSettings {
                enabled: optimizer.enabled,
                runs: optimizer.runs,
            },
            metadata: MetadataSettings {
                bytecode_hash: metadata.bytecode_hash.as_str().to_string(),
                append_cbor: metadata.append_cbor,
            },
            output_selection: default_output_selection(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(&OptimizerConfig::default(), &MetadataConfig::default())
    }
}

/// The AST for every file, and interface, bytecode, selectors and metadata
/// for every contract.
fn default_output_selection() -> serde_json::Value {
    serde_json::json!({
        "*": {
            "": ["ast"],
            "*": [
                "abi",
                "evm.bytecode",
                "evm.deployedBytecode",
                "evm.methodIdentifiers",
                "metadata"
            ]
        }
    })
}

impl CompilerInput {
    /// Creates an input naming every path in `sources`.
    pub fn new<I, S>(sources: I, settings: Settings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sources = sources
            .into_iter()
            .map(|path| {
                let path = path.into();
                let entry = SourceEntry {
                    urls: vec![path.clone()],
                };
                (path, entry)
            })
            .collect();
        Self {
            language: "Solidity".to_string(),
            sources,
            settings,
        }
    }

    /// Returns the source paths in the input.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Serializes the input for the compiler's standard input.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::BytecodeHash;

    #[test]
    fn descriptor_shape() {
        let input = CompilerInput::new(["B.sol", "A.sol"], Settings::default());
        let json: serde_json::Value = serde_json::from_str(&input.to_json().unwrap()).unwrap();

        assert_eq!(json["language"], "Solidity");
        assert_eq!(json["sources"]["A.sol"]["urls"][0], "A.sol");
        assert_eq!(json["sources"]["B.sol"]["urls"][0], "B.sol");
        assert_eq!(json["settings"]["optimizer"]["runs"], 200);
        assert_eq!(json["settings"]["optimizer"]["enabled"], false);
        assert_eq!(json["settings"]["metadata"]["bytecodeHash"], "ipfs");
        assert_eq!(json["settings"]["metadata"]["appendCBOR"], true);
        assert_eq!(json["settings"]["outputSelection"]["*"][""][0], "ast");
        assert_eq!(
            json["settings"]["outputSelection"]["*"]["*"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn settings_follow_config() {
        let optimizer = OptimizerConfig {
            enabled: true,
            runs: 1000,
        };
        let metadata = MetadataConfig {
            bytecode_hash: BytecodeHash::None,
            append_cbor: false,
        };
        let s = Settings::new(&optimizer, &metadata);
        assert!(s.optimizer.enabled);
        assert_eq!(s.optimizer.runs, 1000);
        assert_eq!(s.metadata.bytecode_hash, "none");
        assert!(!s.metadata.append_cbor);
    }

    #[test]
    fn paths_are_sorted() {
        let input = CompilerInput::new(vec!["z/Z.sol".to_string(), "A.sol".to_string()], Settings::default());
        assert_eq!(input.paths().collect::<Vec<_>>(), vec!["A.sol", "z/Z.sol"]);
    }
}
