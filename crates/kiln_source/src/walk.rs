//! Discovery of source files under the contracts directory.

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Extension of tracked source files.
pub const SOURCE_EXT: &str = "sol";

/// A source file observed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Path relative to the contracts directory, `/`-separated.
    pub path: String,
    /// Last modification time reported by the filesystem.
    pub modified: SystemTime,
}

/// Recursively lists `.sol` files under `root`, sorted by path.
///
/// Paths are returned relative to `root`.
pub fn read_dir(root: &Path) -> io::Result<Vec<FileRef>> {
    let mut files = Vec::new();
    walk_dir(root, root, &mut files)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn walk_dir(root: &Path, dir: &Path, files: &mut Vec<FileRef>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            walk_dir(root, &path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXT) {
            files.push(FileRef {
                path: relative_path(root, &path),
                modified: metadata.modified()?,
            });
        }
    }
    Ok(())
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
