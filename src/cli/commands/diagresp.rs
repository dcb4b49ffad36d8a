//! The `ciao-contrib diagresp` command.
//!
//! Builds a diagonal RMF and flat ARF for an instrument, given either
//! explicit parameters or a reference spectrum, and optionally writes them
//! as `<outroot>.rmf` and `<outroot>.arf`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::DiagrespArgs;
use crate::config::Settings;
use crate::diagresp::{mkdiagresp, DiagRespRequest, DiagResponse, RefSpec};
use crate::error::Result;
use crate::grid::{EboundsBlock, EboundsSource, FitsEbounds};
use crate::response::{verbosity, write_arf, write_rmf};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::{or_dash, print_json};

/// Exit code for instruments that cannot be used for fitting.
const UNSUITABLE_EXIT_CODE: i32 = 2;

/// Builds (and optionally writes) a diagonal response.
pub struct DiagrespCommand<'a> {
    settings: &'a Settings,
    args: DiagrespArgs,
}

/// Lookup tables under the configured directory, located on first use so
/// analytic grids work without an installation.
struct ConfiguredEbounds<'a> {
    settings: &'a Settings,
}

impl EboundsSource for ConfiguredEbounds<'_> {
    fn block(&self, table: &str, block: &str) -> Result<EboundsBlock> {
        FitsEbounds::new(self.settings.ebounds_dir()?).block(table, block)
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    #[serde(flatten)]
    response: &'a DiagResponse,
    channels: usize,
    first_channel: i64,
    energy_range_kev: [f64; 2],
    rmf: Option<PathBuf>,
    arf: Option<PathBuf>,
}

impl<'a> DiagrespCommand<'a> {
    pub fn new(settings: &'a Settings, args: DiagrespArgs) -> Self {
        Self { settings, args }
    }

    /// The library request for these arguments.
    ///
    /// `--no-ethresh` wins over `--ethresh`, which wins over the settings.
    pub fn request(&self) -> DiagRespRequest {
        let defaults = DiagRespRequest::default();
        let ethresh = if self.args.no_ethresh {
            None
        } else {
            self.args.ethresh.or(self.settings.ethresh)
        };

        DiagRespRequest {
            telescope: self.args.telescope.clone().unwrap_or(defaults.telescope),
            instrument: self.args.instrument.clone().or(defaults.instrument),
            detector: self.args.detector.clone(),
            filter: self.args.filter.clone(),
            refspec: self.args.refspec.clone().map(RefSpec::Path),
            chantype: self.args.chantype.clone().or(defaults.chantype),
            nchan: self.args.nchan,
            ethresh,
        }
    }

    fn write(
        &self,
        outroot: &Path,
        response: &DiagResponse,
        ui: &mut dyn UserInterface,
    ) -> Result<(PathBuf, PathBuf)> {
        let rmf_path = with_suffix(outroot, ".rmf");
        let arf_path = with_suffix(outroot, ".arf");

        write_rmf(&rmf_path, &response.rmf, &response.key, self.args.clobber)?;
        write_arf(&arf_path, &response.arf, &response.key, self.args.clobber)?;
        if !self.args.json {
            ui.success(&format!("Created {}", rmf_path.display()));
            ui.success(&format!("Created {}", arf_path.display()));
        }

        Ok((rmf_path, arf_path))
    }
}

impl Command for DiagrespCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let _verbosity = verbosity::scoped(ui.output_mode().response_verbosity());

        let source = ConfiguredEbounds {
            settings: self.settings,
        };
        let response = match mkdiagresp(&self.request(), &source) {
            Ok(response) => response,
            Err(e) if e.is_warning() => {
                ui.warning(&e.to_string());
                return Ok(CommandResult::failure(UNSUITABLE_EXIT_CODE));
            }
            Err(e) => return Err(e),
        };

        let written = match &self.args.outroot {
            Some(outroot) => Some(self.write(outroot, &response, ui)?),
            None => None,
        };

        let energ_lo = response.rmf.energ_lo();
        let energ_hi = response.rmf.energ_hi();
        let summary = Summary {
            response: &response,
            channels: response.rmf.detchans(),
            first_channel: response.rmf.offset(),
            energy_range_kev: [
                energ_lo.first().copied().unwrap_or_default(),
                energ_hi.last().copied().unwrap_or_default(),
            ],
            rmf: written.as_ref().map(|(rmf, _)| rmf.clone()),
            arf: written.as_ref().map(|(_, arf)| arf.clone()),
        };

        if self.args.json {
            print_json(ui, &summary)?;
            return Ok(CommandResult::success());
        }

        show_summary(ui, &summary);
        if ui.output_mode().shows_detail() {
            let ethresh = self.request().ethresh;
            ui.show_field(
                "ethresh",
                &ethresh.map_or_else(|| "none".to_string(), |t| format!("{} keV", t)),
            );
        }
        if written.is_none() {
            ui.message("Pass --outroot to write the RMF and ARF");
        }
        Ok(CommandResult::success())
    }
}

fn show_summary(ui: &mut dyn UserInterface, summary: &Summary<'_>) {
    let key = &summary.response.key;
    ui.show_header("Diagonal response");
    ui.show_field("Telescope", &key.telescope);
    ui.show_field("Instrument", &or_dash(key.instrument.as_deref()));
    ui.show_field("Detector", &or_dash(key.detector.as_deref()));
    ui.show_field("Filter", &or_dash(key.filter.as_deref()));
    ui.show_field("Channel type", &or_dash(key.channel_type.as_deref()));
    ui.show_field("Channels", &summary.channels.to_string());
    ui.show_field("First channel", &summary.first_channel.to_string());
    ui.show_field(
        "Energy range",
        &format!(
            "{} - {} keV",
            summary.energy_range_kev[0], summary.energy_range_kev[1]
        ),
    );
    if let Some(block) = &summary.response.block {
        ui.show_field("Lookup block", block);
    }
}

fn with_suffix(root: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(root.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
