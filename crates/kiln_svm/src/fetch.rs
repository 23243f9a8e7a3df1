//! Retrieval of release binaries.

use std::io::Write;

use semver::Version;

use crate::error::SvmError;

/// Base URL of the published compiler releases.
pub const RELEASES_URL: &str = "https://github.com/ethereum/solidity/releases/download";

/// Source of compiler release binaries.
pub trait ReleaseFetcher {
    /// Writes the executable bytes of `version` for the host platform to `out`.
    fn fetch(&self, version: &Version, out: &mut dyn Write) -> Result<(), SvmError>;
}

/// Returns the release asset name for the host operating system.
pub fn release_asset() -> Result<&'static str, SvmError> {
    match std::env::consts::OS {
        "linux" => Ok("solc-static-linux"),
        "macos" => Ok("solc-macos"),
        "windows" => Ok("solc-windows.exe"),
        os => Err(SvmError::UnsupportedPlatform { os: os.to_string() }),
    }
}

/// Builds the download URL of `asset` for `version` under `base`.
pub fn release_url(base: &str, version: &Version, asset: &str) -> String {
    format!("{}/v{version}/{asset}", base.trim_end_matches('/'))
}

/// Fetches binaries from the GitHub release page of the compiler.
pub struct GithubReleases {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl GithubReleases {
    /// Creates a fetcher against the public release page.
    pub fn new() -> Self {
        Self::with_base_url(RELEASES_URL)
    }

    /// Creates a fetcher against a mirror with the same layout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for GithubReleases {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseFetcher for GithubReleases {
    fn fetch(&self, version: &Version, out: &mut dyn Write) -> Result<(), SvmError> {
        let url = release_url(&self.base_url, version, release_asset()?);
        let fail = |reason: String| SvmError::Fetch {
            version: version.to_string(),
            url: url.clone(),
            reason,
        };

        tracing::info!(%version, %url, "downloading solc");
        let mut response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("http {}", response.status())));
        }

        let bytes = response.copy_to(out).map_err(|e| fail(e.to_string()))?;
        tracing::debug!(%version, bytes, "download complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_layout() {
        let v = Version::new(0, 8, 4);
        assert_eq!(
            release_url(RELEASES_URL, &v, "solc-static-linux"),
            "https://github.com/ethereum/solidity/releases/download/v0.8.4/solc-static-linux"
        );
        assert_eq!(
            release_url("http://mirror/", &v, "solc-macos"),
            "http://mirror/v0.8.4/solc-macos"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_uses_static_build() {
        assert_eq!(release_asset().unwrap(), "solc-static-linux");
    }
}
