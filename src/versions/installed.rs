//! Versions of the packages in a local CIAO installation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CiaoError, Result};

use super::parse::VersionMap;

/// Name of the base version file.
const BASE_FILE: &str = "VERSION";

/// Contrib version file, relative to the install root.
const CONTRIB_FILE: &str = "contrib/VERSION.CIAO_scripts";

/// File holding the installation's system type.
const SYSTEM_FILE: &str = "ciao-type";

/// Map a version file (relative to the install root) to its package name.
///
/// # Errors
///
/// Returns `Name` when the file name carries no `_<package>` suffix.
pub fn package_name(relative: &str) -> Result<String> {
    match relative {
        BASE_FILE => Ok("CIAO".to_string()),
        CONTRIB_FILE => Ok("contrib".to_string()),
        _ => relative
            .rsplit_once('_')
            .map(|(_, suffix)| suffix.to_string())
            .ok_or_else(|| CiaoError::Name {
                name: relative.to_string(),
            }),
    }
}

/// Read the version string from a version file (its first line).
pub fn read_version_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .next()
        .map(|l| l.trim().to_string())
        .ok_or_else(|| CiaoError::Parse {
            message: format!("Empty version file: {}", path.display()),
        })
}

/// Return the installed version of every package under `install_root`.
///
/// `install_root` is the base of the installation (`$ASCDS_INSTALL`).
/// The contrib package is optional.
///
/// # Errors
///
/// Returns `NotFound` if `VERSION` or all `VERSION_*` files are missing.
pub fn get_installed_versions(install_root: &Path) -> Result<VersionMap> {
    let base = install_root.join(BASE_FILE);
    if !base.is_file() {
        return Err(CiaoError::NotFound {
            message: "Unable to find $ASCDS_INSTALL/VERSION".to_string(),
        });
    }

    let packages = list_prefixed(install_root, "VERSION_")?;
    if packages.is_empty() {
        return Err(CiaoError::NotFound {
            message: "Unable to find $ASCDS_INSTALL/VERSION_*".to_string(),
        });
    }

    let contrib = list_prefixed(&install_root.join("contrib"), "VERSION")?;

    let mut files = vec![(BASE_FILE.to_string(), base)];
    files.extend(packages);
    files.extend(contrib.into_iter().map(|(n, p)| (format!("contrib/{}", n), p)));

    let mut out = VersionMap::new();
    for (relative, path) in files {
        let name = package_name(&relative)?;
        let version = read_version_file(&path)?;
        tracing::debug!("installed {} = {} ({})", name, version, path.display());
        out.insert(name, version);
    }

    Ok(out)
}

/// Return the system type recorded by the installer.
pub fn find_ciao_system(install_root: &Path) -> Result<String> {
    let path = install_root.join(SYSTEM_FILE);
    let content = fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CiaoError::NotFound {
                message: format!("Unable to find {}", path.display()),
            }
        } else {
            CiaoError::Io(e)
        }
    })?;
    Ok(content.trim().to_string())
}

/// Files directly inside `dir` whose names start with `prefix`, sorted.
///
/// A missing directory yields an empty list.
fn list_prefixed(dir: &Path, prefix: &str) -> Result<Vec<(String, PathBuf)>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) {
            found.push((name, entry.path()));
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn install_tree(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            let path = temp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp
    }

    #[test]
    fn package_name_special_cases() {
        assert_eq!(package_name("VERSION").unwrap(), "CIAO");
        assert_eq!(package_name("contrib/VERSION.CIAO_scripts").unwrap(), "contrib");
    }

    #[test]
    fn package_name_uses_last_underscore() {
        assert_eq!(package_name("VERSION_tools").unwrap(), "tools");
        assert_eq!(package_name("VERSION_ds9_extra").unwrap(), "extra");
    }

    #[test]
    fn package_name_without_suffix_fails() {
        let err = package_name("contrib/VERSION.other").unwrap_err();
        assert!(matches!(err, CiaoError::Name { .. }));
    }

    #[test]
    fn reads_full_installation() {
        let temp = install_tree(&[
            ("VERSION", "CIAO 4.16.0 Wednesday, December 13, 2023\n"),
            ("VERSION_tools", "4.16.0\n\n"),
            ("VERSION_sherpa", "4.16.1\n"),
            ("contrib/VERSION.CIAO_scripts", "4.16.1 Monday, March 4, 2024\n"),
        ]);

        let versions = get_installed_versions(temp.path()).unwrap();

        assert_eq!(versions.len(), 4);
        assert_eq!(versions["CIAO"], "CIAO 4.16.0 Wednesday, December 13, 2023");
        assert_eq!(versions["tools"], "4.16.0");
        assert_eq!(versions["sherpa"], "4.16.1");
        assert_eq!(versions["contrib"], "4.16.1 Monday, March 4, 2024");
    }

    #[test]
    fn contrib_is_optional() {
        let temp = install_tree(&[("VERSION", "4.16\n"), ("VERSION_tools", "4.16\n")]);
        let versions = get_installed_versions(temp.path()).unwrap();
        assert!(!versions.contains_key("contrib"));
    }

    #[test]
    fn missing_base_file_is_not_found() {
        let temp = install_tree(&[("VERSION_tools", "4.16\n")]);
        let err = get_installed_versions(temp.path()).unwrap_err();
        assert!(matches!(err, CiaoError::NotFound { .. }));
        assert!(err.to_string().contains("$ASCDS_INSTALL/VERSION"));
    }

    #[test]
    fn missing_package_files_is_not_found() {
        let temp = install_tree(&[("VERSION", "4.16\n")]);
        let err = get_installed_versions(temp.path()).unwrap_err();
        assert!(err.to_string().contains("VERSION_*"));
    }

    #[test]
    fn unrecognized_contrib_file_is_name_error() {
        let temp = install_tree(&[
            ("VERSION", "4.16\n"),
            ("VERSION_tools", "4.16\n"),
            ("contrib/VERSION.notes", "x\n"),
        ]);
        let err = get_installed_versions(temp.path()).unwrap_err();
        assert!(matches!(err, CiaoError::Name { .. }));
    }

    #[test]
    fn empty_version_file_is_parse_error() {
        let temp = install_tree(&[("VERSION", ""), ("VERSION_tools", "4.16\n")]);
        let err = get_installed_versions(temp.path()).unwrap_err();
        assert!(matches!(err, CiaoError::Parse { .. }));
    }

    #[test]
    fn system_file_is_trimmed() {
        let temp = install_tree(&[("ciao-type", "Linux64\n")]);
        assert_eq!(find_ciao_system(temp.path()).unwrap(), "Linux64");
    }

    #[test]
    fn missing_system_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = find_ciao_system(temp.path()).unwrap_err();
        assert!(matches!(err, CiaoError::NotFound { .. }));
    }
}
