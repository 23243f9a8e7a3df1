//! `kiln svm`: compiler cache management.

use kiln_config::resolve_config;
use kiln_svm::VersionManager;

use crate::pipeline::load_project;
use crate::{GlobalArgs, SvmCommand};

/// Runs a `kiln svm` action against the project's compiler cache.
pub fn run(action: &SvmCommand, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;
    let resolved = resolve_config(&config, &root)?;
    let manager = VersionManager::with_github(&resolved.cache_dir);

    match action {
        SvmCommand::Install { version } => {
            let path = manager.resolve(version)?;
            if !global.quiet {
                eprintln!("   Installed solc {version} at {}", path.display());
            }
        }
        SvmCommand::List => {
            let versions = manager.installed()?;
            if versions.is_empty() && !global.quiet {
                eprintln!("   No compilers in {}", manager.dir().display());
            }
            for version in versions {
                println!("{version}");
            }
        }
    }
    Ok(0)
}
