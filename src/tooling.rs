//! Tooling and Integration Layer
//!
//! CLI over the progress service.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ConfigCommands};
