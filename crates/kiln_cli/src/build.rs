//! `kiln build`: incremental compilation of the current project.

use std::time::{Duration, Instant};

use kiln_build::{CompilationResult, Project};
use kiln_config::{resolve_config, ProjectConfig};

use crate::pipeline::load_project;
use crate::{BuildArgs, GlobalArgs};

/// Runs the `kiln build` command.
///
/// Loads the configuration, applies flag overrides, compiles every changed
/// component and reports what was built. Returns exit code 0 on success.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;
    let config = apply_overrides(config, args);
    let resolved = resolve_config(&config, &root)?;

    if !global.quiet {
        eprintln!(
            "   Building {} (solc {})",
            resolved.contracts_dir.display(),
            resolved.solc_version
        );
    }

    let started = Instant::now();
    let mut project = Project::open(resolved);
    let result = project.compile()?;

    if !global.quiet {
        report(&result, global.verbose, started.elapsed());
    }
    Ok(0)
}

/// Applies command-line overrides on top of the file configuration.
pub fn apply_overrides(mut config: ProjectConfig, args: &BuildArgs) -> ProjectConfig {
    if let Some(ref dir) = args.contracts {
        config = config.with_contracts_dir(dir.as_str());
    }
    if let Some(ref dir) = args.artifacts {
        config = config.with_artifacts_dir(dir.as_str());
    }
    if let Some(ref version) = args.solc_version {
        config = config.with_solc_version(version.as_str());
    }
    if let Some(runs) = args.runs {
        config = config.with_runs(runs);
    }
    if args.optimize {
        config = config.with_optimizer(true);
    }
    config
}

fn report(result: &CompilationResult, verbose: bool, elapsed: Duration) {
    if result.is_unchanged() {
        eprintln!("   Up to date ({} components unchanged)", result.skipped);
        return;
    }

    for run in &result.runs {
        if verbose {
            eprintln!(
                "   Compiled {} in {}",
                run.sources.join(", "),
                format_duration(run.execution_time)
            );
        } else {
            eprintln!(
                "   Compiled {} file(s) in {}",
                run.sources.len(),
                format_duration(run.execution_time)
            );
        }
    }
    for name in &result.contracts {
        eprintln!("    Contract {name}");
    }
    for path in &result.removed {
        eprintln!("     Removed {path}");
    }
    eprintln!(
        "    Finished {} component(s), {} unchanged, in {}",
        result.runs.len(),
        result.skipped,
        format_duration(elapsed)
    );
}

fn format_duration(d: Duration) -> String {
    if d.as_secs() > 0 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}ms", d.as_millis())
    }
}
