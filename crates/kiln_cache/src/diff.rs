//! Change detection between the contracts directory and the registry.
//!
//! Files are compared by modification time only: a touched file with
//! unchanged content is reported as modified.

use std::collections::HashSet;
use std::path::Path;
use std::time::SystemTime;

use kiln_source::{parse_source, read_dir, FileRef};

use crate::error::CacheError;
use crate::registry::Registry;

/// Kind of change observed for one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// The file is not in the registry.
    Added,
    /// The file's modification time differs from the registry's.
    Modified,
    /// The file is in the registry but no longer on disk.
    Deleted,
}

/// One detected change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Path relative to the contracts directory.
    pub path: String,
    /// What happened to the file.
    pub kind: DiffKind,
    /// New modification time (`UNIX_EPOCH` for deletions).
    pub modified: SystemTime,
    /// File content (`None` for deletions).
    pub content: Option<Vec<u8>>,
}

impl FileDiff {
    /// Returns `true` for additions and modifications.
    pub fn is_dirty(&self) -> bool {
        matches!(self.kind, DiffKind::Added | DiffKind::Modified)
    }
}

/// Compares the listed `files` against `registry`.
///
/// Added and modified files have their content read from `contracts_dir`.
/// Registry paths absent from `files` are reported as deleted, after every
/// added or modified entry.
pub fn calc_diff(
    registry: &Registry,
    contracts_dir: &Path,
    files: &[FileRef],
) -> Result<Vec<FileDiff>, CacheError> {
    let mut diffs = Vec::new();
    let mut visited = HashSet::with_capacity(files.len());

    for file in files {
        visited.insert(file.path.as_str());

        let kind = match registry.source(&file.path) {
            Some(src) if src.modified == file.modified => continue,
            Some(_) => DiffKind::Modified,
            None => DiffKind::Added,
        };

        let full_path = contracts_dir.join(&file.path);
        let content = std::fs::read(&full_path).map_err(|e| CacheError::Io {
            path: full_path,
            source: e,
        })?;

        diffs.push(FileDiff {
            path: file.path.clone(),
            kind,
            modified: file.modified,
            content: Some(content),
        });
    }

    for src in registry.sources() {
        let path = src.path();
        if !visited.contains(path.as_str()) {
            diffs.push(FileDiff {
                path,
                kind: DiffKind::Deleted,
                modified: SystemTime::UNIX_EPOCH,
                content: None,
            });
        }
    }

    Ok(diffs)
}

/// Scans `contracts_dir`, updates `registry` with every added or modified
/// source, and returns the full delta.
///
/// The registry reflects the latest file content once this returns,
/// whether or not a build follows. If any changed file fails to scan, the
/// registry is left untouched. Deleted sources are reported but left in the
/// registry.
pub fn detect_changes(
    registry: &mut Registry,
    contracts_dir: &Path,
) -> Result<Vec<FileDiff>, CacheError> {
    let files = read_dir(contracts_dir).map_err(|e| CacheError::Io {
        path: contracts_dir.to_path_buf(),
        source: e,
    })?;

    let diffs = calc_diff(registry, contracts_dir, &files)?;

    let mut parsed = Vec::new();
    for diff in diffs.iter().filter(|d| d.is_dirty()) {
        let bytes = diff.content.as_deref().unwrap_or_default();
        let text = std::str::from_utf8(bytes).map_err(|_| CacheError::InvalidUtf8 {
            path: diff.path.clone(),
        })?;
        parsed.push(parse_source(text, &diff.path, diff.modified)?);
    }
    for source in parsed {
        registry.upsert_source(source);
    }

    tracing::debug!(
        files = files.len(),
        changed = diffs.len(),
        "change detection finished"
    );

    Ok(diffs)
}
