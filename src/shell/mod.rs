//! Subprocess execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{
    execute, execute_with_timeout, CommandOptions, CommandResult, CommandSpec, OutputLine,
};
pub use platform::{home_dir, is_ci};
