//! Solidity compiler version manager.
//!
//! Maps an exact compiler version to an executable cached under a local
//! directory, downloading the release binary on first use. A download is
//! staged in a temporary directory inside the cache and only renamed to its
//! final path once complete, so a cached entry is never partial.

#![warn(missing_docs)]

pub mod error;
pub mod fetch;
pub mod manager;

pub use error::SvmError;
pub use fetch::{release_asset, release_url, GithubReleases, ReleaseFetcher, RELEASES_URL};
pub use manager::{VersionManager, BINARY_PREFIX};
