//! Compare installed packages with the latest releases.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::parse::VersionMap;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)+)\b").expect("valid version regex"));

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-z]+ \d{1,2}, \d{4})").expect("valid release date regex")
});

/// Installed vs latest state of one package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageStatus {
    /// Package name, as published in the manifest.
    pub package: String,
    /// Installed version number, if the package is installed.
    pub installed: Option<String>,
    /// Latest released version number.
    pub latest: Option<String>,
    /// Release date of the latest version.
    pub released: Option<NaiveDate>,
    /// Whether the latest release is newer than the installed one.
    pub update_available: bool,
}

/// Pull the dotted version number out of a version string.
///
/// `"CIAO 4.16.0 Wednesday, December 13, 2023"` gives `"4.16.0"`.
pub fn extract_version(text: &str) -> Option<&str> {
    VERSION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Pull the release date out of a version string.
pub fn extract_release_date(text: &str) -> Option<NaiveDate> {
    let date = DATE_RE.captures(text)?.get(1)?.as_str();
    NaiveDate::parse_from_str(date, "%B %d, %Y").ok()
}

/// Compare versions to check if `latest` is newer than `current`.
///
/// Missing trailing components count as zero, so `4.16` equals `4.16.0`.
pub fn is_newer_version(latest: &str, current: &str) -> bool {
    let parse_version = |v: &str| -> Vec<u32> { v.split('.').filter_map(|s| s.parse().ok()).collect() };

    let latest_parts = parse_version(latest);
    let current_parts = parse_version(current);
    let len = latest_parts.len().max(current_parts.len());
    let part = |parts: &[u32], i: usize| parts.get(i).copied().unwrap_or(0);

    for i in 0..len {
        let (l, c) = (part(&latest_parts, i), part(&current_parts, i));
        if l != c {
            return l > c;
        }
    }

    false
}

/// Match installed packages against the latest manifest.
///
/// Package names are matched case-insensitively (the base file is
/// installed as `CIAO`, published as `ciao`). Every manifest entry gets a
/// row; installed packages missing from the manifest are listed after.
pub fn compare_versions(installed: &VersionMap, latest: &VersionMap) -> Vec<PackageStatus> {
    let find_installed = |name: &str| {
        installed
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    };

    let mut rows: Vec<PackageStatus> = latest
        .iter()
        .map(|(name, text)| {
            let latest_version = extract_version(text);
            let installed_version = find_installed(name).and_then(extract_version);
            let update_available = match (latest_version, installed_version) {
                (Some(l), Some(i)) => is_newer_version(l, i),
                _ => false,
            };

            PackageStatus {
                package: name.clone(),
                installed: installed_version.map(String::from),
                latest: latest_version.map(String::from),
                released: extract_release_date(text),
                update_available,
            }
        })
        .collect();

    for (name, text) in installed {
        if !latest.keys().any(|k| k.eq_ignore_ascii_case(name)) {
            rows.push(PackageStatus {
                package: name.clone(),
                installed: extract_version(text).map(String::from),
                latest: None,
                released: None,
                update_available: false,
            });
        }
    }

    rows
}
