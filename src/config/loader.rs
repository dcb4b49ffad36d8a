//! Settings discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::merger::merge_configs;
use crate::config::schema::Settings;
use crate::error::{CiaoError, Result};

/// Environment variable naming the CIAO installation.
pub const INSTALL_ENV: &str = "ASCDS_INSTALL";

/// Settings files in merge order (later overrides earlier).
///
/// 1. User global config (`<config_dir>/ciao-contrib/config.yml`)
/// 2. Explicit `--config` file
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config, if it exists.
    pub user_global: Option<PathBuf>,

    /// File named on the command line. Must exist.
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover the user global config and record `explicit`.
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self {
            user_global: Self::find_user_global(),
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    fn find_user_global() -> Option<PathBuf> {
        let path = dirs::config_dir()?.join("ciao-contrib").join("config.yml");
        path.exists().then_some(path)
    }

    /// Paths to load, in merge order.
    pub fn all(&self) -> Vec<&PathBuf> {
        self.user_global.iter().chain(self.explicit.iter()).collect()
    }
}

/// Load a settings file as a raw YAML value (for merging).
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist and
/// `ConfigParseError` if the YAML is invalid.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CiaoError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CiaoError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| CiaoError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Merge the files of `paths` over the defaults.
///
/// `install_env` is the value of `$ASCDS_INSTALL`; it is used only when no
/// file sets `install_root`.
pub fn load_settings_from(paths: &ConfigPaths, install_env: Option<PathBuf>) -> Result<Settings> {
    let mut layers = Vec::new();
    for path in paths.all() {
        tracing::debug!("loading settings from {}", path.display());
        layers.push(load_config_value(path)?);
    }

    let merged = merge_configs(&layers);
    let mut settings: Settings =
        serde_yaml::from_value(merged).map_err(|e| CiaoError::ConfigParseError {
            path: paths.all().last().map(|p| p.to_path_buf()).unwrap_or_default(),
            message: format!("Failed to parse merged settings: {}", e),
        })?;

    if settings.install_root.is_none() {
        settings.install_root = install_env.filter(|p| !p.as_os_str().is_empty());
    }
    Ok(settings)
}

/// Load settings from the user config, `explicit`, and `$ASCDS_INSTALL`.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let paths = ConfigPaths::discover(explicit);
    load_settings_from(&paths, std::env::var_os(INSTALL_ENV).map(PathBuf::from))
}
