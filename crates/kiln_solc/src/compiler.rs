//! The compiler capability and its process implementation.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::SolcError;
use crate::input::CompilerInput;
use crate::output::CompilerOutput;

/// Something that compiles a [`CompilerInput`] with a given executable.
pub trait Compiler {
    /// Compiles `input` with the compiler at `solc`.
    ///
    /// Diagnostics are returned inside the output, not as an error.
    fn compile(&self, solc: &Path, input: &CompilerInput) -> Result<CompilerOutput, SolcError>;
}

/// Runs a `solc` executable in standard-JSON mode.
///
/// Sources are read by the compiler relative to `base_path`, which is also
/// the only directory it may read from.
#[derive(Debug, Clone)]
pub struct Solc {
    base_path: PathBuf,
}

impl Solc {
    /// Creates an adapter reading sources from `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Returns the command line arguments passed to the compiler.
    pub fn args(&self) -> Vec<String> {
        let base = self.absolute_base().display().to_string();
        vec![
            "--standard-json".to_string(),
            "--base-path".to_string(),
            base.clone(),
            "--allow-paths".to_string(),
            base,
        ]
    }

    fn absolute_base(&self) -> PathBuf {
        if self.base_path.is_absolute() {
            return self.base_path.clone();
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(&self.base_path))
            .unwrap_or_else(|_| self.base_path.clone())
    }
}

impl Compiler for Solc {
    fn compile(&self, solc: &Path, input: &CompilerInput) -> Result<CompilerOutput, SolcError> {
        let json = input.to_json().map_err(|e| SolcError::Json {
            reason: e.to_string(),
        })?;
        let spawn_err = |source| SolcError::Spawn {
            path: solc.to_path_buf(),
            source,
        };

        tracing::debug!(solc = %solc.display(), sources = input.sources.len(), "invoking compiler");
        let mut child = Command::new(solc)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A process that exits without reading its input is reported by
            // its exit status below.
            match stdin.write_all(json.as_bytes()) {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(spawn_err(e));
                }
                _ => {}
            }
        }

        let output = child.wait_with_output().map_err(spawn_err)?;
        if !output.status.success() {
            return Err(SolcError::Process {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        CompilerOutput::from_json(&String::from_utf8_lossy(&output.stdout))
    }
}
