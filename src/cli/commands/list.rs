//! List command implementation.
//!
//! The `edaboot list` command prints the tool catalog.

use crate::cli::args::ListArgs;
use crate::config::ToolMethod;
use crate::error::Result;
use crate::tools::{InstallMethod, ToolEntry};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult, Project};

/// The list command implementation.
pub struct ListCommand {
    project: Project,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project: Project, args: ListArgs) -> Self {
        Self { project, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }

    fn table(&self) -> Table {
        let filter = self.args.method.map(ToolMethod::from);
        let mut table = Table::new(&["Tool", "Name", "Method", "Installer", "PATH"]);

        for entry in self.project.catalog.entries() {
            if filter.is_some_and(|m| m != entry.method.kind()) {
                continue;
            }
            table.add_row(row(entry));
        }
        table
    }
}

fn row(entry: &ToolEntry) -> Vec<String> {
    let (installer, path) = match &entry.method {
        InstallMethod::PackageManager => ("package manager".to_string(), String::new()),
        InstallMethod::Script(recipe) => {
            let paths: Vec<&str> = recipe.exported_paths().map(|p| p.path.as_str()).collect();
            (recipe.script.display().to_string(), paths.join(", "))
        }
    };

    vec![
        entry.name.clone(),
        entry.display_name.clone(),
        entry.method.kind().to_string(),
        installer,
        path,
    ]
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let table = self.table();
        if table.is_empty() {
            ui.message("No tools match.");
            return Ok(CommandResult::success());
        }

        for line in table.render().lines() {
            ui.message(line);
        }
        Ok(CommandResult::success())
    }
}
