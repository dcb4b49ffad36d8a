//! Installed and latest-released versions of CIAO packages.
//!
//! This module provides:
//! - The `key value` line format shared by all version files ([`parse`])
//! - Installed versions read from `$ASCDS_INSTALL` ([`installed`])
//! - Latest versions fetched from the CXC site ([`latest`])
//! - Installed-vs-latest comparison ([`compare`])

pub mod compare;
pub mod fetch;
pub mod installed;
pub mod latest;
pub mod parse;

pub use compare::{compare_versions, extract_version, is_newer_version, PackageStatus};
pub use fetch::HttpFetcher;
pub use installed::{find_ciao_system, get_installed_versions, package_name};
pub use latest::{get_latest_versions, read_latest_versions, LatestVersions, DEFAULT_DOWNLOAD_URL};
pub use parse::{format_version_lines, parse_version_lines, VersionMap};
