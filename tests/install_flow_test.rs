//! End-to-end install flows through the library API.
//!
//! Subprocesses are replaced with recording closures; files are real.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use edaboot::config::{load_config, EdabootConfig};
use edaboot::shell::{CommandOptions, CommandResult, CommandSpec};
use edaboot::tools::{
    save_selection, ActivationScript, Catalog, InstallOutcome, InstallSettings, InstallerContext,
    PersistOutcome, ToolEntry, ToolInstaller,
};
use edaboot::ui::MockUI;
use edaboot::Result;
use tempfile::TempDir;

fn ok() -> Result<CommandResult> {
    Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
}

fn not_installed() -> Result<CommandResult> {
    Ok(CommandResult::failure(Some(1), String::new(), String::new(), Duration::ZERO))
}

fn nowhere(_: &str) -> Option<PathBuf> {
    None
}

fn no_probe(_: &ToolEntry, _: &Path, _: Duration) -> String {
    panic!("nothing should be probed")
}

struct Project {
    root: TempDir,
    home: TempDir,
}

impl Project {
    fn new() -> Self {
        let project = Self {
            root: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        };
        project.write(".venv/bin/activate", "# venv\n");
        project
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.root.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn settings(&self, config: &EdabootConfig) -> InstallSettings {
        InstallSettings::from_config(config, self.root.path(), self.home.path())
    }

    fn activation(&self) -> String {
        fs::read_to_string(self.root.path().join(".venv/bin/activate")).unwrap()
    }
}

#[test]
fn selected_yosys_exports_yosys_and_slang() {
    let project = Project::new();
    project.write("scripts/recipes/yosys.sh", "#!/bin/bash\n");
    save_selection(
        &project.root.path().join(".edaboot_tools.json"),
        &["yosys".to_string()],
    )
    .unwrap();

    let config = EdabootConfig::default();
    let catalog = Catalog::from_config(&config);
    let settings = project.settings(&config);
    let scripts = RefCell::new(Vec::new());
    let run = |spec: &CommandSpec, _: &CommandOptions| -> Result<CommandResult> {
        scripts.borrow_mut().push(spec.to_string());
        ok()
    };
    let ctx = InstallerContext {
        run_command: &run,
        locate: &nowhere,
        probe_version: &no_probe,
    };
    let mut ui = MockUI::new();

    let report = ToolInstaller::new(&catalog, &settings, &ctx)
        .install_selected(&mut ui)
        .unwrap();

    assert_eq!(report.installed, vec!["yosys"]);
    assert_eq!(scripts.borrow().len(), 1);
    assert!(scripts.borrow()[0].starts_with("bash "));

    let activation = project.activation();
    assert_eq!(activation.matches("export PATH=").count(), 2);
    assert!(activation.contains("# Added by edaboot for Yosys\nexport PATH=$HOME/.local/yosys/bin:$PATH\n"));
    assert!(activation.contains("# Added by edaboot for Slang\nexport PATH=$HOME/.local/slang/bin:$PATH\n"));
}

#[test]
fn unknown_identifier_runs_nothing() {
    let project = Project::new();
    let config = EdabootConfig::default();
    let catalog = Catalog::from_config(&config);
    let settings = project.settings(&config);
    let calls = RefCell::new(0usize);
    let run = |_: &CommandSpec, _: &CommandOptions| -> Result<CommandResult> {
        *calls.borrow_mut() += 1;
        ok()
    };
    let ctx = InstallerContext {
        run_command: &run,
        locate: &nowhere,
        probe_version: &no_probe,
    };
    let mut ui = MockUI::new();

    let outcome = ToolInstaller::new(&catalog, &settings, &ctx)
        .install_tool("foobar", &mut ui)
        .unwrap();

    assert_eq!(outcome, InstallOutcome::Unknown);
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(ui.warnings().len(), 1);
}

#[test]
fn every_missing_package_installs_exactly_once() {
    let project = Project::new();
    let config = EdabootConfig::default();
    let catalog = Catalog::from_config(&config);
    let settings = project.settings(&config);
    let installs = RefCell::new(Vec::new());
    let run = |spec: &CommandSpec, _: &CommandOptions| -> Result<CommandResult> {
        if spec.program == "dpkg" {
            return not_installed();
        }
        installs.borrow_mut().push(spec.args.last().cloned().unwrap_or_default());
        ok()
    };
    let ctx = InstallerContext {
        run_command: &run,
        locate: &nowhere,
        probe_version: &no_probe,
    };
    let mut ui = MockUI::new();
    let packages = ["iverilog", "gtkwave", "klayout", "magic", "netgen", "openfpgaloader", "code"];

    let report = ToolInstaller::new(&catalog, &settings, &ctx).install_batch(&packages, &mut ui);

    assert_eq!(*installs.borrow(), packages);
    assert_eq!(report.installed.len(), packages.len());
    assert!(!report.has_failures());
}

#[test]
fn missing_script_does_not_stop_the_batch() {
    let project = Project::new();
    project.write("scripts/recipes/nextpnr.sh", "#!/bin/bash\n");
    let config = EdabootConfig::default();
    let catalog = Catalog::from_config(&config);
    let settings = project.settings(&config);
    let run = |_: &CommandSpec, _: &CommandOptions| -> Result<CommandResult> { ok() };
    let ctx = InstallerContext {
        run_command: &run,
        locate: &nowhere,
        probe_version: &no_probe,
    };
    let mut ui = MockUI::new();

    let report = ToolInstaller::new(&catalog, &settings, &ctx)
        .install_batch(&["openroad", "nextpnr"], &mut ui);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].tool, "openroad");
    assert_eq!(report.installed, vec!["nextpnr"]);
    assert!(ui.has_error("Missing installer script"));
    assert!(project.activation().contains("$HOME/.local/nextpnr/bin"));
}

#[test]
fn declined_reinstall_of_script_tool_runs_nothing() {
    let project = Project::new();
    project.write("scripts/recipes/verilator.sh", "#!/bin/bash\n");
    fs::create_dir_all(project.home.path().join(".local/verilator/bin")).unwrap();
    let config = EdabootConfig::default();
    let catalog = Catalog::from_config(&config);
    let settings = project.settings(&config);
    let calls = RefCell::new(0usize);
    let run = |_: &CommandSpec, _: &CommandOptions| -> Result<CommandResult> {
        *calls.borrow_mut() += 1;
        ok()
    };
    let ctx = InstallerContext {
        run_command: &run,
        locate: &|_| Some(PathBuf::from("/opt/verilator/bin/verilator")),
        probe_version: &|_, _, _| "Verilator 5.020 2024-01-01".to_string(),
    };
    let mut ui = MockUI::new();
    ui.set_prompt_response("reinstall_verilator", "");

    let outcome = ToolInstaller::new(&catalog, &settings, &ctx)
        .install_tool("verilator", &mut ui)
        .unwrap();

    assert_eq!(
        outcome,
        InstallOutcome::Kept {
            version: "Verilator 5.020 2024-01-01".to_string()
        }
    );
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(project.activation(), "# venv\n");
}

#[test]
fn persisting_twice_writes_one_line() {
    let project = Project::new();
    let script = ActivationScript::in_project(project.root.path(), Path::new(".venv/bin/activate"));

    assert_eq!(
        script.persist_path("Vivado", "$HOME/.local/vivado/bin").unwrap(),
        PersistOutcome::Added
    );
    assert_eq!(
        script.persist_path("Vivado", "$HOME/.local/vivado/bin").unwrap(),
        PersistOutcome::AlreadyPresent
    );
    assert_eq!(project.activation().matches("export PATH=").count(), 1);
}

#[test]
fn configured_install_command_is_used() {
    let project = Project::new();
    project.write(
        ".edaboot/config.yml",
        "package_manager:\n  install: [sudo, dnf, install, -y]\n  query: [rpm, -q]\n",
    );
    let config = load_config(project.root.path(), None).unwrap();
    let catalog = Catalog::from_config(&config);
    let settings = project.settings(&config);
    let seen = RefCell::new(Vec::new());
    let run = |spec: &CommandSpec, _: &CommandOptions| -> Result<CommandResult> {
        seen.borrow_mut().push(spec.to_string());
        if spec.program == "rpm" {
            not_installed()
        } else {
            ok()
        }
    };
    let ctx = InstallerContext {
        run_command: &run,
        locate: &nowhere,
        probe_version: &no_probe,
    };
    let mut ui = MockUI::new();

    ToolInstaller::new(&catalog, &settings, &ctx)
        .install_tool("klayout", &mut ui)
        .unwrap();

    assert_eq!(
        *seen.borrow(),
        vec!["rpm -q klayout", "sudo dnf install -y klayout"]
    );
}
