//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`], which owns the loaded settings.

pub mod check;
pub mod completions;
pub mod diagresp;
pub mod dispatcher;
pub mod display;
pub mod telescopes;
pub mod versions;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
