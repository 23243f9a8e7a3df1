//! The local compiler cache.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::error::SvmError;
use crate::fetch::{GithubReleases, ReleaseFetcher};

/// File name prefix of cached binaries: `solidity-<version>`.
pub const BINARY_PREFIX: &str = "solidity-";

const STAGING_PREFIX: &str = "solc-download-";

/// Resolves compiler versions to cached executables.
pub struct VersionManager {
    dir: PathBuf,
    fetcher: Box<dyn ReleaseFetcher>,
}

impl VersionManager {
    /// Creates a manager caching under `dir` and downloading with `fetcher`.
    pub fn new(dir: impl Into<PathBuf>, fetcher: Box<dyn ReleaseFetcher>) -> Self {
        Self {
            dir: dir.into(),
            fetcher,
        }
    }

    /// Creates a manager that downloads from the public release page.
    pub fn with_github(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, Box::new(GithubReleases::new()))
    }

    /// Returns the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns where `version` is (or would be) cached.
    pub fn binary_path(&self, version: &Version) -> PathBuf {
        self.dir.join(format!("{BINARY_PREFIX}{version}"))
    }

    /// Validates `version` and resolves it with [`resolve_version`].
    ///
    /// [`resolve_version`]: Self::resolve_version
    pub fn resolve(&self, version: &str) -> Result<PathBuf, SvmError> {
        let parsed = Version::parse(version.trim()).map_err(|e| SvmError::InvalidVersion {
            version: version.to_string(),
            reason: e.to_string(),
        })?;
        self.resolve_version(&parsed)
    }

    /// Returns the executable for `version`, downloading it if not cached.
    ///
    /// A cached version is returned without touching the network.
    pub fn resolve_version(&self, version: &Version) -> Result<PathBuf, SvmError> {
        let path = self.binary_path(version);
        if path.is_file() {
            tracing::debug!(%version, path = %path.display(), "solc found in cache");
            return Ok(path);
        }

        self.ensure_dir()?;
        self.install(version, &path)?;
        tracing::info!(%version, path = %path.display(), "installed solc");
        Ok(path)
    }

    /// Lists the cached versions in ascending order.
    pub fn installed(&self) -> Result<Vec<Version>, SvmError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(&self.dir, e)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.io_err(&self.dir, e))?;
            let name = entry.file_name();
            let Some(rest) = name.to_str().and_then(|n| n.strip_prefix(BINARY_PREFIX)) else {
                continue;
            };
            if let Ok(version) = Version::parse(rest) {
                if entry.path().is_file() {
                    versions.push(version);
                }
            }
        }
        versions.sort();
        Ok(versions)
    }

    fn ensure_dir(&self) -> Result<(), SvmError> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(SvmError::NotADirectory {
                path: self.dir.clone(),
            });
        }
        fs::create_dir_all(&self.dir).map_err(|e| self.io_err(&self.dir, e))
    }

    fn install(&self, version: &Version, dest: &Path) -> Result<(), SvmError> {
        // Removed on drop, including on every error path below.
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.dir)
            .map_err(|e| self.io_err(&self.dir, e))?;

        let file_name = dest
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{BINARY_PREFIX}{version}")));
        let staged = staging.path().join(file_name);

        let mut file = fs::File::create(&staged).map_err(|e| self.io_err(&staged, e))?;
        self.fetcher.fetch(version, &mut file)?;
        file.flush().map_err(|e| self.io_err(&staged, e))?;
        file.sync_all().map_err(|e| self.io_err(&staged, e))?;
        drop(file);

        make_executable(&staged).map_err(|e| self.io_err(&staged, e))?;
        fs::rename(&staged, dest).map_err(|e| self.io_err(dest, e))?;
        Ok(())
    }

    fn io_err(&self, path: &Path, source: std::io::Error) -> SvmError {
        SvmError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingFetcher {
        calls: Arc<AtomicUsize>,
    }

    impl ReleaseFetcher for CountingFetcher {
        fn fetch(&self, version: &Version, out: &mut dyn Write) -> Result<(), SvmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            write!(out, "#!/bin/sh\necho {version}\n").map_err(|e| SvmError::Io {
                path: PathBuf::new(),
                source: e,
            })
        }
    }

    struct BrokenFetcher;

    impl ReleaseFetcher for BrokenFetcher {
        fn fetch(&self, version: &Version, out: &mut dyn Write) -> Result<(), SvmError> {
            let _ = out.write_all(b"partial");
            Err(SvmError::Fetch {
                version: version.to_string(),
                url: "http://unreachable".to_string(),
                reason: "connection reset".to_string(),
            })
        }
    }

    fn counting(dir: &Path) -> (VersionManager, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = CountingFetcher {
            calls: Arc::clone(&calls),
        };
        (VersionManager::new(dir, Box::new(fetcher)), calls)
    }

    fn staging_dirs(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with(STAGING_PREFIX)
            })
            .count()
    }

    #[test]
    fn second_resolve_does_not_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let (svm, calls) = counting(dir.path());

        let first = svm.resolve("0.8.4").unwrap();
        let second = svm.resolve("0.8.4").unwrap();

        assert_eq!(first, second);
        assert_eq!(first, dir.path().join("solidity-0.8.4"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(staging_dirs(dir.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn installed_binary_is_executable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let (svm, _) = counting(dir.path());
        let path = svm.resolve("0.8.4").unwrap();
        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn failed_fetch_leaves_nothing_visible() {
        let dir = tempfile::tempdir().unwrap();
        let svm = VersionManager::new(dir.path(), Box::new(BrokenFetcher));

        let err = svm.resolve("0.8.4").unwrap_err();
        assert!(matches!(err, SvmError::Fetch { .. }));
        assert!(!svm.binary_path(&Version::new(0, 8, 4)).exists());
        assert_eq!(staging_dirs(dir.path()), 0);
        assert!(svm.installed().unwrap().is_empty());
    }

    #[test]
    fn invalid_version_is_rejected_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let (svm, calls) = counting(dir.path());
        let err = svm.resolve("../../etc/passwd").unwrap_err();
        assert!(matches!(err, SvmError::InvalidVersion { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cache_path_that_is_a_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("svm");
        fs::write(&file, "not a dir").unwrap();
        let (svm, _) = counting(&file);
        let err = svm.resolve("0.8.4").unwrap_err();
        assert!(matches!(err, SvmError::NotADirectory { .. }));
    }

    #[test]
    fn cache_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let (svm, _) = counting(&nested);
        svm.resolve("0.7.6").unwrap();
        assert!(nested.join("solidity-0.7.6").is_file());
    }

    #[test]
    fn installed_lists_sorted_versions() {
        let dir = tempfile::tempdir().unwrap();
        let (svm, _) = counting(dir.path());
        svm.resolve("0.8.4").unwrap();
        svm.resolve("0.7.6").unwrap();
        svm.resolve("0.8.19").unwrap();
        fs::write(dir.path().join("README"), "").unwrap();

        let versions: Vec<String> = svm
            .installed()
            .unwrap()
            .iter()
            .map(Version::to_string)
            .collect();
        assert_eq!(versions, vec!["0.7.6", "0.8.4", "0.8.19"]);
    }

    #[test]
    fn installed_on_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (svm, _) = counting(&dir.path().join("absent"));
        assert!(svm.installed().unwrap().is_empty());
    }
}
