//! Install command implementation.
//!
//! The `edaboot install` command installs named tools, every tool, or the
//! saved selection.

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::tools::{default_context, InstallReport, ReinstallPolicy, ToolInstaller};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, Project};

/// The install command implementation.
pub struct InstallCommand {
    project: Project,
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(project: Project, args: InstallArgs) -> Self {
        Self { project, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &InstallArgs {
        &self.args
    }

    fn policy(&self) -> ReinstallPolicy {
        if self.args.reinstall {
            ReinstallPolicy::Always
        } else if self.args.skip_installed {
            ReinstallPolicy::Never
        } else {
            ReinstallPolicy::Prompt
        }
    }

    fn run(&self, installer: &ToolInstaller<'_>, ui: &mut dyn UserInterface) -> Result<InstallReport> {
        let report = match self.args.tools.as_slice() {
            _ if self.args.all => installer.install_all(ui),
            [] => installer.install_selected(ui)?,
            [tool] => installer.install_single(tool, ui),
            tools => {
                ui.show_header(&format!("Installing tools: {}", tools.join(", ")));
                installer.install_batch(tools, ui)
            }
        };
        Ok(report)
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = default_context();
        let installer = ToolInstaller::new(&self.project.catalog, &self.project.settings, &ctx)
            .with_policy(self.policy());

        let report = self.run(&installer, ui)?;

        if report.total() > 1 {
            ui.message("");
            ui.message(&report.summary());
        }

        if report.has_failures() {
            for failure in &report.failed {
                tracing::debug!("{}: {}", failure.tool, failure.reason);
            }
            return Ok(CommandResult::failure(1));
        }
        Ok(CommandResult::success())
    }
}
