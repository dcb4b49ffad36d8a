//! Latest released package versions, from the CXC download site.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CiaoError, NetworkErrorKind, Result};

use super::fetch::HttpFetcher;
use super::installed::find_ciao_system;
use super::parse::{parse_version_lines, VersionMap};

/// Where the version manifests are published.
pub const DEFAULT_DOWNLOAD_URL: &str = "http://cxc.harvard.edu/ciao/download/";

/// Client for the published version manifests.
///
/// A system-specific manifest (`ciao_versions.<system>.dat`) is tried
/// first; if the server has none, the system-agnostic
/// `ciao_versions.dat` is used.
pub struct LatestVersions {
    base_url: String,
    fetcher: HttpFetcher,
}

impl LatestVersions {
    /// Create a client for manifests under `base_url`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self {
            base_url,
            fetcher: HttpFetcher::new(timeout)?,
        })
    }

    /// Manifest URL for one system.
    pub fn system_url(&self, system: &str) -> String {
        format!("{}ciao_versions.{}.dat", self.base_url, system)
    }

    /// System-agnostic manifest URL.
    pub fn fallback_url(&self) -> String {
        format!("{}ciao_versions.dat", self.base_url)
    }

    /// Fetch and parse the latest versions for `system`.
    pub fn fetch(&self, system: &str) -> Result<VersionMap> {
        tracing::debug!("get_latest_versions for system={}", system);

        let contents = match self.fetcher.fetch(&self.system_url(system)) {
            Err(CiaoError::Network {
                kind: NetworkErrorKind::NotFound,
                ..
            }) => {
                tracing::debug!("no manifest for {}, trying the generic one", system);
                self.fetcher.fetch(&self.fallback_url())?
            }
            other => other?,
        };

        parse_version_lines(&contents)
    }
}

/// Return the latest released version of each package.
///
/// `system` defaults to the type of the installation at `$ASCDS_INSTALL`.
///
/// # Errors
///
/// Returns `Network` when neither manifest can be downloaded, and the
/// parser's errors for a malformed manifest.
pub fn get_latest_versions(timeout: Option<Duration>, system: Option<&str>) -> Result<VersionMap> {
    let system = match system {
        Some(s) => s.to_string(),
        None => find_ciao_system(&install_root_from_env()?)?,
    };

    LatestVersions::new(DEFAULT_DOWNLOAD_URL, timeout)?.fetch(&system)
}

/// Read the latest versions from a saved copy of a manifest.
pub fn read_latest_versions(path: &Path) -> Result<VersionMap> {
    let content = std::fs::read_to_string(path)?;
    parse_version_lines(&content)
}

fn install_root_from_env() -> Result<PathBuf> {
    std::env::var_os("ASCDS_INSTALL")
        .map(PathBuf::from)
        .ok_or_else(|| CiaoError::NotFound {
            message: "ASCDS_INSTALL is not set; pass the system explicitly".to_string(),
        })
}
