//! The telescope configuration table.
//!
//! Each supported telescope is described by one YAML file under
//! `data/telescopes/`, embedded at compile time. The resolver walks these
//! records generically; adding a telescope means adding a file.

use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{CiaoError, Result};

/// Embedded telescope descriptions.
static TELESCOPES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data/telescopes");

static CATALOG: LazyLock<std::result::Result<Vec<TelescopeSpec>, String>> =
    LazyLock::new(|| load_specs().map_err(|e| e.to_string()));

/// How a telescope's energy grid is produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GridSpec {
    /// Read from the telescope's ebounds lookup table.
    #[default]
    Lookup,
    /// Computed from a fixed bin width per channel type.
    Analytic {
        offset: i64,
        chantypes: Vec<AnalyticBinning>,
    },
}

/// Uniform binning for one channel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticBinning {
    pub name: String,
    pub channels: usize,
    pub bin_ev: f64,
}

/// An instrument that must not be used for spectral fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unsuitable {
    pub instrument: String,
    pub message: String,
}

/// Alternate instrument name; may also fix the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentAlias {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector: Option<String>,
}

/// Allowed detectors for an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorRule {
    pub allowed: Vec<String>,
    /// Detector names starting with one of these collapse to it (MOS1 -> MOS).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefixes: Vec<String>,
}

/// One instrument of a telescope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<InstrumentAlias>,
    /// Absent: the detector does not select a grid and is dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector: Option<DetectorRule>,
    /// Absent: the filter is dropped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
    /// Absent: the channel type is dropped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chantypes: Vec<String>,
    /// Reject channel types not listed in `chantypes`.
    #[serde(default)]
    pub strict_chantype: bool,
    /// Channel count of the full-resolution grid, for instruments with
    /// several binning schemes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_channels: Option<i64>,
}

impl InstrumentSpec {
    /// Whether `name` is this instrument or one of its aliases.
    pub fn matches(&self, name: &str) -> Option<Option<&str>> {
        if self.name.eq_ignore_ascii_case(name) {
            return Some(None);
        }
        self.aliases
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.detector.as_deref())
    }
}

/// One telescope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopeSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub grid: GridSpec,
    /// The telescope's single instrument is always used.
    #[serde(default)]
    pub fixed_instrument: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsuitable: Vec<Unsuitable>,
    pub instruments: Vec<InstrumentSpec>,
}

impl TelescopeSpec {
    /// Whether `name` is this telescope or one of its aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// `Name|Alias` label used in messages.
    pub fn label(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Canonical instrument names joined with `|`.
    pub fn instrument_names(&self) -> String {
        self.instruments
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Name used for the lookup table file.
    pub fn table_name(&self) -> String {
        self.name.to_lowercase()
    }

    fn check(&self) -> Result<()> {
        if self.instruments.is_empty() {
            return Err(CiaoError::config(format!("telescope {} lists no instruments", self.name)));
        }
        if self.fixed_instrument && self.instruments.len() != 1 {
            return Err(CiaoError::config(format!(
                "telescope {} has a fixed instrument but lists {}",
                self.name,
                self.instruments.len()
            )));
        }
        if let GridSpec::Analytic { chantypes, .. } = &self.grid {
            if chantypes.is_empty() {
                return Err(CiaoError::config(format!(
                    "telescope {} has an analytic grid without channel types",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// All supported telescopes, sorted by name.
///
/// # Errors
///
/// Returns `Configuration` if an embedded description is malformed.
pub fn catalog() -> Result<&'static [TelescopeSpec]> {
    CATALOG
        .as_ref()
        .map(Vec::as_slice)
        .map_err(|e| CiaoError::config(e.clone()))
}

/// Find a telescope by name or alias (case-insensitive).
pub fn find_telescope(name: &str) -> Result<Option<&'static TelescopeSpec>> {
    Ok(catalog()?.iter().find(|t| t.matches(name)))
}

fn load_specs() -> Result<Vec<TelescopeSpec>> {
    let mut specs = Vec::new();

    for file in TELESCOPES_DIR.files() {
        let is_yaml = file
            .path()
            .extension()
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if !is_yaml {
            continue;
        }

        let content = file.contents_utf8().ok_or_else(|| CiaoError::ConfigParseError {
            path: file.path().to_path_buf(),
            message: "Invalid UTF-8".to_string(),
        })?;
        let spec: TelescopeSpec =
            serde_yaml::from_str(content).map_err(|e| CiaoError::ConfigParseError {
                path: file.path().to_path_buf(),
                message: e.to_string(),
            })?;
        spec.check()?;
        specs.push(spec);
    }

    specs.sort_by_key(|s| s.name.to_lowercase());
    Ok(specs)
}
