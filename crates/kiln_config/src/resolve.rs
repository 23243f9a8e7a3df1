//! Resolution of a parsed configuration against a project directory.

use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;
use crate::loader::validate_config;
use crate::types::{MetadataConfig, OptimizerConfig, ProjectConfig};

/// Name of the default compiler cache directory under the user's home.
const DEFAULT_CACHE_DIR: &str = ".solc-svm";

/// A project configuration with every path resolved and every default applied.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory scanned for `.sol` sources.
    pub contracts_dir: PathBuf,
    /// Directory receiving `out/` artifacts and the registry cache file.
    pub artifacts_dir: PathBuf,
    /// Directory holding downloaded compiler binaries.
    pub cache_dir: PathBuf,
    /// Exact compiler version the project builds with.
    pub solc_version: semver::Version,
    /// Optimizer settings forwarded to the compiler.
    pub optimizer: OptimizerConfig,
    /// Metadata settings forwarded to the compiler.
    pub metadata: MetadataConfig,
}

/// Resolves `config` relative to `project_dir`.
///
/// Relative directories are joined onto `project_dir` and lexically cleaned.
/// The artifacts directory falls back to the contracts directory and the
/// cache directory falls back to `~/.solc-svm`.
pub fn resolve_config(
    config: &ProjectConfig,
    project_dir: &Path,
) -> Result<ResolvedConfig, ConfigError> {
    validate_config(config)?;

    let contracts_dir = clean_path(&project_dir.join(&config.project.contracts));
    let artifacts_dir = match &config.project.artifacts {
        Some(dir) => clean_path(&project_dir.join(dir)),
        None => contracts_dir.clone(),
    };
    let cache_dir = match &config.compiler.cache_dir {
        Some(dir) => clean_path(&project_dir.join(dir)),
        None => dirs::home_dir()
            .ok_or(ConfigError::NoHomeDir)?
            .join(DEFAULT_CACHE_DIR),
    };
    let solc_version = semver::Version::parse(&config.compiler.version)
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    Ok(ResolvedConfig {
        contracts_dir,
        artifacts_dir,
        cache_dir,
        solc_version,
        optimizer: config.optimizer.clone(),
        metadata: config.metadata.clone(),
    })
}

/// Lexically normalizes a path: drops `.` components and folds `..` into
/// the preceding component where one exists. Does not touch the filesystem.
fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().map(|c| c.as_os_str()).collect()
}
