//! Select command implementation.
//!
//! The `edaboot select` command saves the tools that a bare
//! `edaboot install` will install.

use crate::cli::args::SelectArgs;
use crate::error::Result;
use crate::tools::{load_selection, save_selection};
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};

use super::dispatcher::{Command, CommandResult, Project};

/// The select command implementation.
pub struct SelectCommand {
    project: Project,
    args: SelectArgs,
}

impl SelectCommand {
    /// Create a new select command.
    pub fn new(project: Project, args: SelectArgs) -> Self {
        Self { project, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &SelectArgs {
        &self.args
    }

    /// Multi-select over the catalog, pre-checking the current selection.
    fn prompt(&self, current: &[String]) -> Prompt {
        let options = self
            .project
            .catalog
            .entries()
            .map(|entry| PromptOption {
                label: format!("{} ({})", entry.display_name, entry.method.kind()),
                value: entry.name.clone(),
            })
            .collect();

        Prompt {
            key: "tools".to_string(),
            question: "Select tools to install".to_string(),
            prompt_type: PromptType::MultiSelect { options },
            default: Some(current.join(",")),
        }
    }

    /// Keep catalog tools, warning about the rest.
    fn known(&self, tools: Vec<String>, ui: &mut dyn UserInterface) -> Vec<String> {
        tools
            .into_iter()
            .filter(|tool| {
                let known = self.project.catalog.get(tool).is_some();
                if !known {
                    ui.warning(&format!("Skipping unknown tool '{}'", tool));
                }
                known
            })
            .collect()
    }
}

impl Command for SelectCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = self.project.settings.selection_path();

        let chosen = if self.args.tools.is_empty() {
            let current = load_selection(&path)?;
            ui.prompt(&self.prompt(&current))?
                .as_string()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        } else {
            self.args.tools.clone()
        };

        let tools = self.known(chosen, ui);
        save_selection(&path, &tools)?;

        if tools.is_empty() {
            ui.warning("Saved an empty selection; 'edaboot install' will do nothing.");
        } else {
            ui.success(&format!(
                "Saved {} tool(s) to {}: {}",
                tools.len(),
                self.project.settings.selection_file.display(),
                tools.join(", ")
            ));
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn command(temp: &TempDir, tools: &[&str]) -> SelectCommand {
        let project = Project::load(temp.path(), None, temp.path()).unwrap();
        let args = SelectArgs {
            tools: tools.iter().map(|t| t.to_string()).collect(),
        };
        SelectCommand::new(project, args)
    }

    fn saved(temp: &TempDir) -> Vec<String> {
        load_selection(&temp.path().join(".edaboot_tools.json")).unwrap()
    }

    #[test]
    fn saves_named_tools() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        command(&temp, &["yosys", "foobar", "gtkwave"])
            .execute(&mut ui)
            .unwrap();

        assert_eq!(saved(&temp), vec!["yosys", "gtkwave"]);
        assert!(ui.has_warning("Skipping unknown tool 'foobar'"));
        assert!(ui.has_success("Saved 2 tool(s)"));
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn prompts_when_no_tools_named() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("tools", "verilator, iverilog");

        command(&temp, &[]).execute(&mut ui).unwrap();

        assert_eq!(ui.prompts_shown(), &["tools"]);
        assert_eq!(saved(&temp), vec!["verilator", "iverilog"]);
    }

    #[test]
    fn prompt_defaults_to_current_selection() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".edaboot_tools.json"), r#"["magic", "netgen"]"#).unwrap();
        let mut ui = MockUI::new();

        command(&temp, &[]).execute(&mut ui).unwrap();
        assert_eq!(saved(&temp), vec!["magic", "netgen"]);
    }

    #[test]
    fn prompt_lists_whole_catalog() {
        let temp = TempDir::new().unwrap();
        let prompt = command(&temp, &[]).prompt(&[]);
        match prompt.prompt_type {
            PromptType::MultiSelect { options } => {
                assert_eq!(options.len(), 13);
                assert_eq!(options[0].value, "iverilog");
                assert!(options.iter().any(|o| o.label == "OpenROAD (script)"));
            }
            other => panic!("Expected MultiSelect, got {:?}", other),
        }
    }

    #[test]
    fn empty_choice_warns() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        command(&temp, &[]).execute(&mut ui).unwrap();
        assert!(saved(&temp).is_empty());
        assert!(ui.has_warning("empty selection"));
    }
}
