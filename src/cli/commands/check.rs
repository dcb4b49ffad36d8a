//! The `ciao-contrib check` command.
//!
//! Compares the installed packages with the latest published manifest and
//! reports the ones with a newer release.

use crate::cli::args::CheckArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::ui::{Table, UserInterface};
use crate::versions::{compare_versions, get_installed_versions, PackageStatus};

use super::dispatcher::{Command, CommandResult};
use super::display::{or_dash, print_json};
use super::versions::fetch_latest;

/// Reports packages with a newer release.
pub struct CheckCommand<'a> {
    settings: &'a Settings,
    args: CheckArgs,
}

impl<'a> CheckCommand<'a> {
    pub fn new(settings: &'a Settings, args: CheckArgs) -> Self {
        Self { settings, args }
    }
}

impl Command for CheckCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let installed = get_installed_versions(self.settings.install_root()?)?;
        let latest = fetch_latest(
            self.settings,
            self.args.system.as_deref(),
            self.args.timeout,
        )?;
        let statuses = compare_versions(&installed, &latest);

        if self.args.json {
            print_json(ui, &statuses)?;
            return Ok(CommandResult::success());
        }

        ui.show_header("CIAO update check");
        ui.print(&status_table(&statuses).render());

        let outdated = statuses.iter().filter(|s| s.update_available).count();
        if outdated == 0 {
            ui.success("CIAO is up to date");
        } else {
            ui.warning(&format!("{} package(s) can be updated", outdated));
            ui.message(&format!("See {}", self.settings.download_url));
        }

        Ok(CommandResult::success())
    }
}

fn status_table(statuses: &[PackageStatus]) -> Table {
    let mut table = Table::new(["Package", "Installed", "Latest", "Released", "Status"]);
    for status in statuses {
        let released = status.released.map(|d| d.format("%Y-%m-%d").to_string());
        let state = match (&status.installed, status.update_available) {
            (None, _) => "not installed",
            (Some(_), true) => "update available",
            (Some(_), false) => "up to date",
        };
        table.add_row([
            status.package.clone(),
            or_dash(status.installed.as_deref()),
            or_dash(status.latest.as_deref()),
            or_dash(released.as_deref()),
            state.to_string(),
        ]);
    }
    table
}
