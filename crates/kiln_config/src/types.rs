//! Configuration types deserialized from `kiln.toml`.

use serde::Deserialize;

/// Compiler version used when a project does not pin one.
pub const DEFAULT_SOLC_VERSION: &str = "0.8.4";

/// Optimizer runs used when a project does not set them.
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// The top-level project configuration parsed from `kiln.toml`.
///
/// Only `[project]` is required; every other table falls back to defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project layout (contracts and artifacts directories).
    pub project: ProjectMeta,
    /// Compiler toolchain selection.
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Optimizer settings forwarded to the compiler.
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    /// Metadata settings forwarded to the compiler.
    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Directory layout of a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// Directory holding the `.sol` sources, relative to the project root.
    pub contracts: String,
    /// Directory receiving build artifacts. Defaults to the contracts directory.
    #[serde(default)]
    pub artifacts: Option<String>,
}

/// Compiler toolchain selection.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// Exact compiler version to build with.
    #[serde(default = "default_version")]
    pub version: String,
    /// Directory where downloaded compilers are cached. Defaults to `~/.solc-svm`.
    #[serde(default)]
    pub cache_dir: Option<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            cache_dir: None,
        }
    }
}

fn default_version() -> String {
    DEFAULT_SOLC_VERSION.to_string()
}

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptimizerConfig {
    /// Whether the optimizer is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Expected number of contract runs the optimizer tunes for.
    #[serde(default = "default_runs")]
    pub runs: u32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

fn default_runs() -> u32 {
    DEFAULT_OPTIMIZER_RUNS
}

/// Settings for the metadata hash appended to bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetadataConfig {
    /// Hash method used for the metadata reference.
    #[serde(default)]
    pub bytecode_hash: BytecodeHash,
    /// Whether the CBOR-encoded metadata is appended to the bytecode.
    #[serde(default = "default_append_cbor")]
    pub append_cbor: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            bytecode_hash: BytecodeHash::default(),
            append_cbor: true,
        }
    }
}

fn default_append_cbor() -> bool {
    true
}

/// Hash method for the metadata reference embedded in bytecode.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BytecodeHash {
    /// IPFS content hash (compiler default).
    #[default]
    Ipfs,
    /// Swarm hash.
    Bzzr1,
    /// No metadata hash.
    None,
}

impl BytecodeHash {
    /// Returns the value the compiler expects in `settings.metadata.bytecodeHash`.
    pub fn as_str(self) -> &'static str {
        match self {
            BytecodeHash::Ipfs => "ipfs",
            BytecodeHash::Bzzr1 => "bzzr1",
            BytecodeHash::None => "none",
        }
    }
}

impl ProjectConfig {
    /// Creates a configuration for the given contracts directory with every
    /// other setting at its default.
    pub fn new(contracts: impl Into<String>) -> Self {
        Self {
            project: ProjectMeta {
                contracts: contracts.into(),
                artifacts: None,
            },
            compiler: CompilerConfig::default(),
            optimizer: OptimizerConfig::default(),
            metadata: MetadataConfig::default(),
        }
    }

    /// Overrides the contracts directory.
    pub fn with_contracts_dir(mut self, dir: impl Into<String>) -> Self {
        self.project.contracts = dir.into();
        self
    }

    /// Overrides the artifacts directory.
    pub fn with_artifacts_dir(mut self, dir: impl Into<String>) -> Self {
        self.project.artifacts = Some(dir.into());
        self
    }

    /// Overrides the compiler version.
    pub fn with_solc_version(mut self, version: impl Into<String>) -> Self {
        self.compiler.version = version.into();
        self
    }

    /// Overrides the compiler cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<String>) -> Self {
        self.compiler.cache_dir = Some(dir.into());
        self
    }

    /// Overrides the optimizer run count.
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.optimizer.runs = runs;
        self
    }

    /// Enables or disables the optimizer.
    pub fn with_optimizer(mut self, enabled: bool) -> Self {
        self.optimizer.enabled = enabled;
        self
    }
}
