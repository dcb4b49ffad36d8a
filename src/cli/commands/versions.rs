//! The `ciao-contrib versions` command.

use std::time::Duration;

use crate::cli::args::VersionsArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::versions::{
    find_ciao_system, get_installed_versions, read_latest_versions, LatestVersions, VersionMap,
};

use super::dispatcher::{Command, CommandResult};
use super::display::{print_json, version_table};

/// Shows installed or latest-released package versions.
pub struct VersionsCommand<'a> {
    settings: &'a Settings,
    args: VersionsArgs,
}

impl<'a> VersionsCommand<'a> {
    pub fn new(settings: &'a Settings, args: VersionsArgs) -> Self {
        Self { settings, args }
    }

    fn versions(&self) -> Result<(VersionMap, &'static str)> {
        if let Some(file) = &self.args.file {
            tracing::debug!("reading latest versions from {}", file.display());
            return Ok((read_latest_versions(file)?, "Latest CIAO versions"));
        }

        if self.args.latest {
            let latest = fetch_latest(
                self.settings,
                self.args.system.as_deref(),
                self.args.timeout,
            )?;
            return Ok((latest, "Latest CIAO versions"));
        }

        let root = self.settings.install_root()?;
        tracing::debug!("reading VERSION files under {}", root.display());
        Ok((get_installed_versions(root)?, "Installed CIAO versions"))
    }
}

impl Command for VersionsCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (versions, title) = self.versions()?;

        if self.args.json {
            print_json(ui, &versions)?;
            return Ok(CommandResult::success());
        }

        ui.show_header(title);
        ui.print(&version_table(&versions).render());
        Ok(CommandResult::success())
    }
}

/// Download the latest versions using the settings and any overrides.
///
/// The system type falls back to the settings and then to the installation.
pub(super) fn fetch_latest(
    settings: &Settings,
    system: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<VersionMap> {
    let system = match system.or(settings.system.as_deref()) {
        Some(system) => system.to_string(),
        None => find_ciao_system(settings.install_root()?)?,
    };
    let timeout = timeout_secs.map(Duration::from_secs).or(settings.timeout());

    let client = LatestVersions::new(&settings.download_url, timeout)?;
    tracing::debug!("fetching {}", client.system_url(&system));
    client.fetch(&system)
}
