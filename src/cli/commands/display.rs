//! Shared display helpers for command output.

use serde::Serialize;

use crate::error::Result;
use crate::ui::{Table, UserInterface};
use crate::versions::VersionMap;

/// Print `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(ui: &mut dyn UserInterface, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    ui.print(&text);
    Ok(())
}

/// Cell text for an optional value.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Two-column `Package | Version` table.
pub fn version_table(versions: &VersionMap) -> Table {
    let mut table = Table::new(["Package", "Version"]);
    for (package, version) in versions {
        table.add_row([package.as_str(), version.as_str()]);
    }
    table
}
