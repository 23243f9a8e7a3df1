//! Persistence of the registry between runs.
//!
//! The snapshot is stored as `cache/kiln-cache.json` under the artifacts
//! directory. Loading is fail-safe: a missing, unreadable, or incompatible
//! snapshot yields an empty registry, which makes the next build a full one.

use std::path::Path;

use kiln_source::{Contract, Source};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::registry::Registry;

/// Subdirectory of the artifacts directory holding the snapshot.
pub const CACHE_SUBDIR: &str = "cache";

/// Name of the snapshot file.
pub const CACHE_FILE: &str = "kiln-cache.json";

/// Serialized form of a [`Registry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// kiln version that wrote the snapshot.
    pub kiln_version: String,
    /// Compiler version the recorded contracts were built with.
    pub solc_version: String,
    /// All known sources.
    pub sources: Vec<Source>,
    /// All known contracts.
    pub contracts: Vec<Contract>,
}

impl RegistrySnapshot {
    /// Captures the current state of `registry`.
    pub fn capture(registry: &Registry, kiln_version: &str, solc_version: &str) -> Self {
        Self {
            kiln_version: kiln_version.to_string(),
            solc_version: solc_version.to_string(),
            sources: registry.sources().cloned().collect(),
            contracts: registry.contracts().cloned().collect(),
        }
    }

    /// Returns `true` if the snapshot was written by the same kiln version
    /// for the same compiler version.
    pub fn is_compatible(&self, kiln_version: &str, solc_version: &str) -> bool {
        self.kiln_version == kiln_version && self.solc_version == solc_version
    }

    /// Rebuilds a registry from the snapshot.
    pub fn into_registry(self) -> Registry {
        let mut registry = Registry::new();
        for source in self.sources {
            registry.upsert_source(source);
        }
        for contract in self.contracts {
            registry.upsert_contract(contract);
        }
        registry
    }
}

impl Registry {
    /// Loads the registry saved under `artifacts_dir`, or returns an empty one
    /// if there is no compatible snapshot.
    pub fn load_or_create(artifacts_dir: &Path, kiln_version: &str, solc_version: &str) -> Self {
        let path = artifacts_dir.join(CACHE_SUBDIR).join(CACHE_FILE);
        let snapshot = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<RegistrySnapshot>(&content).ok());

        match snapshot {
            Some(s) if s.is_compatible(kiln_version, solc_version) => {
                tracing::debug!(path = %path.display(), "loaded registry snapshot");
                s.into_registry()
            }
            Some(_) => {
                tracing::info!("registry snapshot is from another version, rebuilding everything");
                Registry::new()
            }
            None => Registry::new(),
        }
    }

    /// Writes the registry under `artifacts_dir`, creating the cache
    /// directory if needed.
    pub fn save(
        &self,
        artifacts_dir: &Path,
        kiln_version: &str,
        solc_version: &str,
    ) -> Result<(), CacheError> {
        let dir = artifacts_dir.join(CACHE_SUBDIR);
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let snapshot = RegistrySnapshot::capture(self, kiln_version, solc_version);
        let json = serde_json::to_string(&snapshot).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

        let path = dir.join(CACHE_FILE);
        std::fs::write(&path, json).map_err(|e| CacheError::Io { path, source: e })
    }
}
