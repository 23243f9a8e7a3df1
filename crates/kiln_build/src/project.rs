//! The project and its incremental compile pipeline.

use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};

use kiln_cache::{detect_changes, DiffKind, FileDiff, Registry};
use kiln_common::InternalError;
use kiln_config::ResolvedConfig;
use kiln_graph::{schedule, Component, DependencyGraph};
use kiln_solc::{CompiledSources, Compiler, CompilerInput, Settings, Solc};
use kiln_source::{qualified_name, split_qualified_name};
use kiln_svm::VersionManager;
use kiln_version::resolve_constraint;

use crate::artifact::{artifact_path, remove_dir, remove_file, source_artifact_dir, ArtifactRecord};
use crate::error::BuildError;

/// Version written into the registry snapshot.
pub const KILN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One component's build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationRun {
    /// Member source paths.
    pub sources: Vec<String>,
    /// Wall-clock time spent on the component.
    pub execution_time: Duration,
}

/// Outcome of [`Project::compile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationResult {
    /// `source:name` of every contract compiled in this run.
    pub contracts: Vec<String>,
    /// One entry per rebuilt component, in processing order.
    pub runs: Vec<CompilationRun>,
    /// Number of components left untouched.
    pub skipped: usize,
    /// Source paths removed because their file was deleted.
    pub removed: Vec<String>,
}

impl CompilationResult {
    /// Returns `true` if nothing was compiled or removed.
    pub fn is_unchanged(&self) -> bool {
        self.runs.is_empty() && self.removed.is_empty()
    }
}

/// A Solidity project: its configuration, registry, compiler cache and
/// compiler.
pub struct Project {
    config: ResolvedConfig,
    registry: Registry,
    svm: VersionManager,
    compiler: Box<dyn Compiler>,
    persist: bool,
}

impl Project {
    /// Creates a project with an empty registry that is not saved to disk.
    pub fn new(config: ResolvedConfig, svm: VersionManager, compiler: Box<dyn Compiler>) -> Self {
        Self {
            config,
            registry: Registry::new(),
            svm,
            compiler,
            persist: false,
        }
    }

    /// Opens the project described by `config`, restoring the registry saved
    /// by the previous run and saving it again after each successful compile.
    ///
    /// Compilers are downloaded from the public release page and run as
    /// processes.
    pub fn open(config: ResolvedConfig) -> Self {
        let registry = Registry::load_or_create(
            &config.artifacts_dir,
            KILN_VERSION,
            &config.solc_version.to_string(),
        );
        let svm = VersionManager::with_github(&config.cache_dir);
        let compiler = Box::new(Solc::new(&config.contracts_dir));
        Self {
            config,
            registry,
            svm,
            compiler,
            persist: true,
        }
    }

    /// Replaces the registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Enables or disables saving the registry after each compile.
    pub fn with_persistence(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Returns the resolved configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the compiler version manager.
    pub fn svm(&self) -> &VersionManager {
        &self.svm
    }

    /// Compiles every component that contains a changed source.
    ///
    /// Either every selected component is recorded or none is: on failure
    /// the registry is restored to its state before the call, so the next
    /// compile sees the same changes again.
    pub fn compile(&mut self) -> Result<CompilationResult, BuildError> {
        let before = self.registry.clone();
        let result = self.run_pipeline();
        if result.is_err() {
            self.registry = before;
        }
        result
    }

    fn run_pipeline(&mut self) -> Result<CompilationResult, BuildError> {
        let diffs = detect_changes(&mut self.registry, &self.config.contracts_dir)?;
        let dirty: Vec<String> = diffs
            .iter()
            .filter(|d| d.is_dirty())
            .map(|d| d.path.clone())
            .collect();
        let deleted: HashSet<String> = diffs
            .iter()
            .filter(|d| d.kind == DiffKind::Deleted)
            .map(|d| d.path.clone())
            .collect();
        log_diffs(&diffs);

        self.check_imports(&deleted)?;

        let graph = DependencyGraph::from_sources(
            self.registry
                .sources()
                .filter(|s| !deleted.contains(&s.path())),
        )?;
        let plan = schedule(graph.components(), &dirty);

        let mut result = CompilationResult {
            skipped: plan.skipped,
            ..Default::default()
        };

        let mut outputs = Vec::with_capacity(plan.rebuild.len());
        for component in &plan.rebuild {
            let started = Instant::now();
            let compiled = self.compile_component(component)?;
            let run = CompilationRun {
                sources: component.sources.clone(),
                execution_time: started.elapsed(),
            };
            tracing::info!(
                sources = run.sources.len(),
                elapsed_ms = run.execution_time.as_millis() as u64,
                "compiled component"
            );
            result.runs.push(run);
            outputs.push((component, compiled));
        }

        let mut stale: Vec<(String, String)> = Vec::new();
        for (component, compiled) in outputs {
            stale.extend(self.assemble(component, compiled, &mut result.contracts));
        }

        let mut removed: Vec<String> = deleted.into_iter().collect();
        removed.sort();
        for path in &removed {
            self.registry.remove_source(path);
            remove_dir(&source_artifact_dir(&self.config.artifacts_dir, path))?;
            tracing::debug!(path = %path, "pruned deleted source");
        }
        result.removed = removed;

        for (source, name) in &stale {
            remove_file(&artifact_path(&self.config.artifacts_dir, source, name))?;
        }
        self.write_artifacts(&result.contracts)?;

        if self.persist {
            self.registry.save(
                &self.config.artifacts_dir,
                KILN_VERSION,
                &self.config.solc_version.to_string(),
            )?;
        }

        Ok(result)
    }

    /// Every import of a live source must name another live source.
    fn check_imports(&self, deleted: &HashSet<String>) -> Result<(), BuildError> {
        let live = |path: &str| self.registry.contains_source(path) && !deleted.contains(path);
        for source in self.registry.sources() {
            let importer = source.path();
            if deleted.contains(&importer) {
                continue;
            }
            if let Some(import) = source.imports.iter().find(|i| !live(i.as_str())) {
                return Err(BuildError::UnresolvedImport {
                    importer,
                    import: import.clone(),
                });
            }
        }
        Ok(())
    }

    fn compile_component(&self, component: &Component) -> Result<CompiledSources, BuildError> {
        let mut pragmas = Vec::with_capacity(component.len());
        for path in &component.sources {
            let pragma = self
                .registry
                .source(path)
                .and_then(|s| s.primary_pragma())
                .ok_or_else(|| {
                    InternalError::new(format!("component member {path} has no recorded pragma"))
                })?;
            pragmas.push((path.as_str(), pragma));
        }
        let version = &self.config.solc_version;
        resolve_constraint(pragmas, version)?;

        let solc = self.svm.resolve_version(version)?;

        let input = CompilerInput::new(
            component.sources.iter().cloned(),
            Settings::new(&self.config.optimizer, &self.config.metadata),
        );
        let fail = |error| BuildError::Compile {
            sources: component.sources.clone(),
            error,
        };
        self.compiler
            .compile(&solc, &input)
            .and_then(|output| output.decode())
            .map_err(fail)
    }

    /// Records a component's output and returns the contracts of its members
    /// that the compiler no longer produces.
    fn assemble(
        &mut self,
        component: &Component,
        compiled: CompiledSources,
        names: &mut Vec<String>,
    ) -> Vec<(String, String)> {
        let produced: BTreeSet<(String, String)> = compiled
            .contracts
            .iter()
            .map(|c| (c.source.clone(), c.name.clone()))
            .collect();

        let mut stale = Vec::new();
        for path in &component.sources {
            let gone: Vec<String> = self
                .registry
                .contracts_for_source(path)
                .filter(|c| !produced.contains(&(c.source.clone(), c.name.clone())))
                .map(|c| c.name.clone())
                .collect();
            for name in gone {
                self.registry.remove_contract(path, &name);
                stale.push((path.clone(), name));
            }
        }

        for contract in compiled.contracts {
            names.push(qualified_name(&contract.source, &contract.name));
            self.registry.upsert_contract(contract);
        }
        for (path, ast) in compiled.asts {
            if let Some(source) = self.registry.source_mut(&path) {
                source.ast = Some(ast);
            }
        }
        stale
    }

    fn write_artifacts(&self, names: &[String]) -> Result<(), BuildError> {
        for qualified in names {
            let missing = || InternalError::missing_contract(qualified);
            let (source_path, name) = split_qualified_name(qualified).ok_or_else(missing)?;
            let contract = self
                .registry
                .contract(source_path, name)
                .ok_or_else(missing)?;
            let source = self.registry.source(source_path).ok_or_else(|| {
                InternalError::new(format!(
                    "compiled contract {qualified} has no registered source"
                ))
            })?;

            let path = artifact_path(&self.config.artifacts_dir, source_path, name);
            ArtifactRecord::new(contract, source).write(&path)?;
        }
        tracing::debug!(count = names.len(), "wrote artifacts");
        Ok(())
    }
}

fn log_diffs(diffs: &[FileDiff]) {
    for diff in diffs {
        tracing::debug!(path = %diff.path, kind = ?diff.kind, "source changed");
    }
}
