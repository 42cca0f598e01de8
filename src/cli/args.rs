//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::ToolMethod;

/// edaboot - Install and bootstrap an open-source EDA toolchain.
#[derive(Debug, Parser)]
#[command(name = "edaboot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .edaboot/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

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
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install tools (the saved selection if none are named)
    Install(InstallArgs),

    /// List known tools and how they are installed
    List(ListArgs),

    /// Show which tools are installed and their versions
    Status(StatusArgs),

    /// Save the set of tools for `edaboot install`
    Select(SelectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Tools to install, in order
    #[arg(value_name = "TOOL", conflicts_with = "all")]
    pub tools: Vec<String>,

    /// Install every known tool
    #[arg(short, long)]
    pub all: bool,

    /// Reinstall tools that are already present without asking
    #[arg(long, conflicts_with = "skip_installed")]
    pub reinstall: bool,

    /// Keep tools that are already present without asking
    #[arg(long)]
    pub skip_installed: bool,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Only show tools installed this way
    #[arg(long, value_enum)]
    pub method: Option<MethodFilter>,
}

/// Install method accepted by `--method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodFilter {
    Package,
    Script,
}

impl From<MethodFilter> for ToolMethod {
    fn from(filter: MethodFilter) -> Self {
        match filter {
            MethodFilter::Package => ToolMethod::Package,
            MethodFilter::Script => ToolMethod::Script,
        }
    }
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Tools to check (all known tools if omitted)
    #[arg(value_name = "TOOL")]
    pub tools: Vec<String>,
}

/// Arguments for the `select` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SelectArgs {
    /// Tools to save (choose interactively if omitted)
    #[arg(value_name = "TOOL")]
    pub tools: Vec<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
