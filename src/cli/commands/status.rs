//! Status command implementation.
//!
//! The `edaboot status` command shows which tools are installed and their
//! versions, without installing anything.

use crate::cli::args::StatusArgs;
use crate::error::{EdabootError, Result};
use crate::tools::{default_context, ToolInstaller, ToolStatus};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult, Project};

/// The status command implementation.
pub struct StatusCommand {
    project: Project,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(project: Project, args: StatusArgs) -> Self {
        Self { project, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }

    fn requested(&self) -> Vec<String> {
        if self.args.tools.is_empty() {
            self.project
                .catalog
                .names()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            self.args.tools.clone()
        }
    }
}

fn status_row(status: &ToolStatus) -> Vec<String> {
    vec![
        status.name.clone(),
        status.method.to_string(),
        if status.installed { "installed" } else { "missing" }.to_string(),
        status.version.clone().unwrap_or_default(),
        status.location.clone().unwrap_or_default(),
    ]
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = default_context();
        let installer = ToolInstaller::new(&self.project.catalog, &self.project.settings, &ctx);

        let mut table = Table::new(&["Tool", "Method", "Status", "Version", "Location"]);
        let mut unknown = Vec::new();

        let mut spinner = ui.start_spinner("Checking tools");
        for tool in self.requested() {
            spinner.set_message(&format!("Checking {}", tool));
            match installer.status(&tool) {
                Ok(status) => table.add_row(status_row(&status)),
                Err(EdabootError::UnknownTool { name }) => unknown.push(name),
                Err(e) => return Err(e),
            }
        }
        spinner.finish_clear();

        for name in &unknown {
            ui.warning(&format!("Unknown tool: {}", name));
        }
        if !table.is_empty() {
            for line in table.render().lines() {
                ui.message(line);
            }
        }

        if unknown.is_empty() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
