//! Command-line interface for edaboot.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompletionsArgs, InstallArgs, ListArgs, MethodFilter, SelectArgs, StatusArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult, Project};
