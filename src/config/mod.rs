//! Settings loading.
//!
//! - Schema in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//!
//! # Settings Locations
//!
//! Layers are merged in this order:
//! 1. Built-in defaults
//! 2. User global config (`<config_dir>/ciao-contrib/config.yml`)
//! 3. Explicit `--config` file
//! 4. `$ASCDS_INSTALL`, when no file sets `install_root`
//! 5. Command-line flags
//!
//! # Example
//!
//! ```
//! use ciao_contrib::config::{load_settings_from, ConfigPaths};
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("config.yml");
//! fs::write(&path, "timeout_secs: 10").unwrap();
//!
//! let paths = ConfigPaths { user_global: None, explicit: Some(path) };
//! let settings = load_settings_from(&paths, None).unwrap();
//! assert_eq!(settings.timeout_secs, Some(10));
//! ```

pub mod loader;
pub mod merger;
pub mod schema;

pub use loader::{load_config_value, load_settings, load_settings_from, ConfigPaths, INSTALL_ENV};
pub use merger::{deep_merge, merge_configs};
pub use schema::Settings;
