//! Command-line interface for ciao-contrib.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    CheckArgs, Cli, Commands, CompletionsArgs, DiagrespArgs, TelescopesArgs, VersionsArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
