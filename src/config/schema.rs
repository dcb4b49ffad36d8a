//! Settings schema.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CiaoError, Result};
use crate::response::DEFAULT_ETHRESH;
use crate::versions::DEFAULT_DOWNLOAD_URL;

/// User settings, read from `config.yml` layers.
///
/// ```yaml
/// install_root: /soft/ciao-4.17
/// download_url: http://cxc.harvard.edu/ciao/download/
/// timeout_secs: 10
/// system: linux64
/// ebounds_dir: /data/ebounds-lut
/// ethresh: 1.0e-10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The CIAO installation (`$ASCDS_INSTALL`).
    pub install_root: Option<PathBuf>,

    /// Directory holding the version manifests.
    pub download_url: String,

    /// Timeout for the manifest download; no timeout when unset.
    pub timeout_secs: Option<u64>,

    /// CIAO system type; read from the installation when unset.
    pub system: Option<String>,

    /// Directory of ebounds lookup tables.
    ///
    /// Defaults to `<install_root>/data/ebounds-lut`.
    pub ebounds_dir: Option<PathBuf>,

    /// Replacement for non-positive lower energy edges. `null` disables it.
    pub ethresh: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            install_root: None,
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            timeout_secs: None,
            system: None,
            ebounds_dir: None,
            ethresh: Some(DEFAULT_ETHRESH),
        }
    }
}

impl Settings {
    /// The installation root, or an error telling the user how to set it.
    pub fn install_root(&self) -> Result<&Path> {
        self.install_root.as_deref().ok_or_else(|| CiaoError::NotFound {
            message: "The CIAO installation is unknown; set $ASCDS_INSTALL or pass --install-root"
                .to_string(),
        })
    }

    /// Lookup-table directory, explicit or under the installation.
    pub fn ebounds_dir(&self) -> Result<PathBuf> {
        match &self.ebounds_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.install_root()?.join("data").join("ebounds-lut")),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.download_url, DEFAULT_DOWNLOAD_URL);
        assert_eq!(settings.ethresh, Some(1e-12));
        assert!(settings.timeout().is_none());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_yaml::from_str("timeout_secs: 5").unwrap();
        assert_eq!(settings.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(settings.ethresh, Some(1e-12));
    }

    #[test]
    fn null_ethresh_disables_threshold() {
        let settings: Settings = serde_yaml::from_str("ethresh: null").unwrap();
        assert_eq!(settings.ethresh, None);
    }

    #[test]
    fn ebounds_dir_defaults_under_install_root() {
        let settings = Settings {
            install_root: Some(PathBuf::from("/soft/ciao")),
            ..Default::default()
        };
        assert_eq!(
            settings.ebounds_dir().unwrap(),
            PathBuf::from("/soft/ciao/data/ebounds-lut")
        );
    }

    #[test]
    fn explicit_ebounds_dir_wins() {
        let settings = Settings {
            ebounds_dir: Some(PathBuf::from("/data/lut")),
            ..Default::default()
        };
        assert_eq!(settings.ebounds_dir().unwrap(), PathBuf::from("/data/lut"));
    }

    #[test]
    fn unknown_install_root_is_not_found() {
        let err = Settings::default().ebounds_dir().unwrap_err();
        assert!(matches!(err, CiaoError::NotFound { .. }));
    }
}
