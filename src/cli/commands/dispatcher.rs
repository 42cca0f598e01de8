//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands
//! - [`Project`] for the config, catalog and settings every command shares

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, InstallArgs};
use crate::config::{load_config, validate, EdabootConfig};
use crate::error::Result;
use crate::shell::home_dir;
use crate::tools::{Catalog, InstallSettings};
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Validated configuration resolved against a project root.
pub struct Project {
    pub config: EdabootConfig,
    pub catalog: Catalog,
    pub settings: InstallSettings,
}

impl Project {
    /// Load and validate the config, then build the catalog and settings.
    pub fn load(project_root: &Path, config_override: Option<&Path>, home: &Path) -> Result<Self> {
        let config = load_config(project_root, config_override)?;
        validate(&config)?;

        let catalog = Catalog::from_config(&config);
        let settings = InstallSettings::from_config(&config, project_root, home);
        tracing::debug!(
            "Loaded {} tools for project {}",
            catalog.len(),
            project_root.display()
        );

        Ok(Self {
            config,
            catalog,
            settings,
        })
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    home: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_path: None,
            home: home_dir(),
        }
    }

    /// Load this config file instead of `.edaboot/config.yml`.
    pub fn with_config(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn project(&self) -> Result<Project> {
        Project::load(&self.project_root, self.config_path.as_deref(), &self.home)
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand installs the saved selection.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Install(args)) => {
                let cmd = super::install::InstallCommand::new(self.project()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::List(args)) => {
                let cmd = super::list::ListCommand::new(self.project()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Status(args)) => {
                let cmd = super::status::StatusCommand::new(self.project()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Select(args)) => {
                let cmd = super::select::SelectCommand::new(self.project()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd =
                    super::install::InstallCommand::new(self.project()?, InstallArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
