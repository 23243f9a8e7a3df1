//! Shared project discovery for CLI commands.

use std::path::{Path, PathBuf};

use kiln_config::{load_config, load_config_from_str, ProjectConfig, CONFIG_FILE};

use crate::GlobalArgs;

/// Contracts directory assumed when a project has no `kiln.toml`.
pub const DEFAULT_CONTRACTS_DIR: &str = "contracts";

/// Walks up from `start` looking for the nearest directory containing `kiln.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the project configuration selected by the global flags.
///
/// With `--config`, a file is read directly and its directory becomes the
/// project root; a directory is used as the root. Without it, the nearest
/// `kiln.toml` above the current directory is used. A root without a
/// `kiln.toml` gets the default configuration.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let path = PathBuf::from(config_path);
        if path.is_file() {
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from("."));
            let content = std::fs::read_to_string(&path)?;
            return Ok((root, load_config_from_str(&content)?));
        }
        return Ok((path.clone(), load_or_default(&path)?));
    }

    let cwd = std::env::current_dir()?;
    let root = find_project_root(&cwd).unwrap_or(cwd);
    let config = load_or_default(&root)?;
    Ok((root, config))
}

fn load_or_default(root: &Path) -> Result<ProjectConfig, Box<dyn std::error::Error>> {
    if root.join(CONFIG_FILE).is_file() {
        Ok(load_config(root)?)
    } else {
        Ok(ProjectConfig::new(DEFAULT_CONTRACTS_DIR))
    }
}
