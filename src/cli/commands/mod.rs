//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! [`Project`] once and routes CLI subcommands to their implementations.

pub mod completions;
pub mod dispatcher;
pub mod install;
pub mod list;
pub mod select;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, Project};
