//! The `ciao-contrib telescopes` command.

use crate::cli::args::TelescopesArgs;
use crate::error::{CiaoError, Result};
use crate::instruments::{catalog, find_telescope, GridSpec, InstrumentSpec, TelescopeSpec};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Lists the supported telescopes, or the instruments of one.
pub struct TelescopesCommand {
    args: TelescopesArgs,
}

impl TelescopesCommand {
    pub fn new(args: TelescopesArgs) -> Self {
        Self { args }
    }
}

impl Command for TelescopesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.name {
            None => {
                ui.print(&telescope_table(catalog()?).render());
            }
            Some(name) => {
                let spec = find_telescope(name)?.ok_or_else(|| {
                    CiaoError::invalid(format!(
                        "Unknown telescope '{}'; run 'ciao-contrib telescopes' for the list",
                        name
                    ))
                })?;
                ui.show_header(&spec.label());
                ui.show_field("Grid", grid_kind(&spec.grid));
                for unsuitable in &spec.unsuitable {
                    ui.show_field("Unsuitable", &unsuitable.instrument);
                }
                ui.print(&instrument_table(spec).render());
            }
        }
        Ok(CommandResult::success())
    }
}

fn grid_kind(grid: &GridSpec) -> &'static str {
    match grid {
        GridSpec::Lookup => "lookup table",
        GridSpec::Analytic { .. } => "analytic",
    }
}

fn join(values: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    let joined: Vec<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(", ")
    }
}

fn telescope_table(specs: &[TelescopeSpec]) -> Table {
    let mut table = Table::new(["Telescope", "Aliases", "Instruments", "Grid"]);
    for spec in specs {
        table.add_row([
            spec.name.clone(),
            join(&spec.aliases),
            join(spec.instruments.iter().map(|i| &i.name)),
            grid_kind(&spec.grid).to_string(),
        ]);
    }
    table
}

fn instrument_table(spec: &TelescopeSpec) -> Table {
    let mut table = Table::new([
        "Instrument",
        "Aliases",
        "Detectors",
        "Filters",
        "Channel types",
        "Channels",
    ]);
    for inst in &spec.instruments {
        table.add_row(instrument_row(inst));
    }
    table
}

fn instrument_row(inst: &InstrumentSpec) -> [String; 6] {
    let detectors = inst
        .detector
        .as_ref()
        .map(|d| join(&d.allowed))
        .unwrap_or_else(|| "-".to_string());
    [
        inst.name.clone(),
        join(inst.aliases.iter().map(|a| &a.name)),
        detectors,
        join(&inst.filters),
        join(&inst.chantypes),
        inst.max_channels
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]
}
