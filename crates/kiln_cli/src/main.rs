//! Kiln CLI: the command-line interface for the kiln Solidity build engine.
//!
//! Provides `kiln build` for incremental compilation of a project and
//! `kiln svm` for managing cached compiler versions.

#![warn(missing_docs)]

mod build;
mod pipeline;
mod svm;

use std::process;

use clap::{Parser, Subcommand};

/// Kiln: incremental builds for Solidity projects.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln Solidity build engine")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `kiln.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile every changed component of the project.
    Build(BuildArgs),
    /// Manage cached compiler versions.
    Svm {
        /// The svm action to run.
        #[command(subcommand)]
        action: SvmCommand,
    },
}

/// Arguments for the `kiln build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Directory holding the `.sol` sources.
    #[arg(long)]
    pub contracts: Option<String>,

    /// Directory receiving build artifacts.
    #[arg(long)]
    pub artifacts: Option<String>,

    /// Exact compiler version to build with.
    #[arg(long)]
    pub solc_version: Option<String>,

    /// Optimizer runs.
    #[arg(long)]
    pub runs: Option<u32>,

    /// Enable the optimizer.
    #[arg(long)]
    pub optimize: bool,
}

/// Actions of the `kiln svm` subcommand.
#[derive(Subcommand, Debug)]
pub enum SvmCommand {
    /// Download a compiler version into the cache.
    Install {
        /// Exact version, e.g. `0.8.4`.
        version: String,
    },
    /// List cached compiler versions.
    List,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Svm { ref action } => svm::run(action, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the tracing subscriber. `RUST_LOG` applies unless a flag forces
/// a level.
fn init_logging(quiet: bool, verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
