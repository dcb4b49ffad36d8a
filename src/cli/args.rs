//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Helper utilities for CIAO: installed and released versions, and
/// diagonal responses for X-ray instruments.
#[derive(Debug, Parser)]
#[command(name = "ciao-contrib")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a settings file, merged over the user settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// CIAO installation directory (overrides $ASCDS_INSTALL)
    #[arg(long, global = true, value_name = "DIR")]
    pub install_root: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show installed (or latest released) CIAO package versions
    Versions(VersionsArgs),

    /// Compare the installation with the latest release
    Check(CheckArgs),

    /// Build a diagonal RMF and flat ARF for an instrument
    Diagresp(DiagrespArgs),

    /// List supported telescopes and instruments
    Telescopes(TelescopesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `versions` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VersionsArgs {
    /// Show the latest released versions instead of the installed ones
    #[arg(long)]
    pub latest: bool,

    /// CIAO system type of the manifest (e.g. linux64)
    #[arg(long, value_name = "SYSTEM")]
    pub system: Option<String>,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Read the latest versions from a saved manifest instead of the web
    #[arg(long, value_name = "PATH", conflicts_with_all = ["system", "timeout"])]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// CIAO system type of the manifest (e.g. linux64)
    #[arg(long, value_name = "SYSTEM")]
    pub system: Option<String>,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `diagresp` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DiagrespArgs {
    /// Telescope (default: Chandra)
    #[arg(short, long)]
    pub telescope: Option<String>,

    /// Instrument (default: ACIS)
    #[arg(short, long)]
    pub instrument: Option<String>,

    /// Detector
    #[arg(short, long)]
    pub detector: Option<String>,

    /// Instrument filter
    #[arg(long)]
    pub filter: Option<String>,

    /// Spectrum whose header supplies the instrument parameters
    #[arg(long, value_name = "FILE", conflicts_with_all = ["telescope", "instrument", "detector", "filter", "chantype", "nchan"])]
    pub refspec: Option<PathBuf>,

    /// Channel type (default: PI)
    #[arg(long)]
    pub chantype: Option<String>,

    /// Number of channels, for instruments with several binnings
    #[arg(long, value_name = "N")]
    pub nchan: Option<i64>,

    /// Replacement for energy edges at or below zero (keV)
    #[arg(long, value_name = "KEV", conflicts_with = "no_ethresh")]
    pub ethresh: Option<f64>,

    /// Do not replace energy edges at or below zero
    #[arg(long)]
    pub no_ethresh: bool,

    /// Write <PREFIX>.rmf and <PREFIX>.arf
    #[arg(short, long, value_name = "PREFIX")]
    pub outroot: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long)]
    pub clobber: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `telescopes` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TelescopesArgs {
    /// Show the instruments of one telescope
    pub name: Option<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
