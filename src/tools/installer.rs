//! Install dispatch: package-manager and script installs, single and batch.
//!
//! Every subprocess goes through [`InstallerContext`], so tests can swap in
//! closures that record calls instead of running `apt` or `bash`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{EdabootConfig, ToolMethod};
use crate::error::{EdabootError, Result};
use crate::shell::{execute, CommandOptions, CommandSpec};
use crate::tools::activation::{ActivationScript, PersistOutcome};
use crate::tools::catalog::{Catalog, PathEntry, ScriptRecipe, ToolEntry};
use crate::tools::detect::{
    is_package_installed, is_script_installed, parse_system_path, resolve_tool_path,
    script_executable, script_install_dir, RunCommand,
};
use crate::tools::selection::load_selection;
use crate::tools::version::{probe_tool, UNKNOWN_VERSION};
use crate::ui::{Prompt, UserInterface};

/// Mockable dependencies for the installer.
pub struct InstallerContext<'a> {
    /// Run a command (package query, package install, installer script).
    pub run_command: RunCommand<'a>,
    /// Find an executable on PATH.
    pub locate: &'a dyn Fn(&str) -> Option<PathBuf>,
    /// Probe a tool's version from its executable.
    pub probe_version: &'a dyn Fn(&ToolEntry, &Path, Duration) -> String,
}

/// Build the default `InstallerContext` for production use.
pub fn default_context() -> InstallerContext<'static> {
    InstallerContext {
        run_command: &|spec, options| execute(spec, options),
        locate: &|tool| resolve_tool_path(tool, &parse_system_path()),
        probe_version: &|tool, exe, timeout| probe_tool(tool, exe, timeout),
    }
}

/// Resolved locations and commands for one run.
#[derive(Debug, Clone)]
pub struct InstallSettings {
    /// Base for relative script, activation and selection paths
    pub project_root: PathBuf,
    /// Home directory holding `.local/<tool>/bin`
    pub home: PathBuf,
    pub activation_script: PathBuf,
    pub selection_file: PathBuf,
    pub install_command: Vec<String>,
    pub query_command: Vec<String>,
    pub probe_timeout: Duration,
}

impl InstallSettings {
    pub fn from_config(config: &EdabootConfig, project_root: &Path, home: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            home: home.to_path_buf(),
            activation_script: config.settings.activation_script.clone(),
            selection_file: config.settings.selection_file.clone(),
            install_command: config.package_manager.install.clone(),
            query_command: config.package_manager.query.clone(),
            probe_timeout: config.settings.probe_timeout(),
        }
    }

    pub fn activation(&self) -> ActivationScript {
        ActivationScript::in_project(&self.project_root, &self.activation_script)
    }

    pub fn selection_path(&self) -> PathBuf {
        self.project_root.join(&self.selection_file)
    }

    pub fn script_path(&self, recipe: &ScriptRecipe) -> PathBuf {
        self.project_root.join(&recipe.script)
    }
}

/// What to do with a tool that is already installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReinstallPolicy {
    /// Ask, defaulting to no.
    #[default]
    Prompt,
    /// Reinstall without asking.
    Always,
    /// Keep the installed tool without asking.
    Never,
}

/// Result of installing one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The install command or script ran successfully.
    Installed,
    /// Already installed and not reinstalled.
    Kept { version: String },
    /// The name is not in the catalog; nothing ran.
    Unknown,
    /// The installer script does not exist; nothing ran.
    ScriptMissing { script: PathBuf },
}

/// A tool that could not be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    pub tool: String,
    pub reason: String,
}

/// Per-tool results of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub kept: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<ToolFailure>,
}

impl InstallReport {
    fn record(&mut self, tool: &str, outcome: InstallOutcome) {
        match outcome {
            InstallOutcome::Installed => self.installed.push(tool.to_string()),
            InstallOutcome::Kept { .. } => self.kept.push(tool.to_string()),
            InstallOutcome::Unknown => self.skipped.push(tool.to_string()),
            InstallOutcome::ScriptMissing { script } => self.failed.push(ToolFailure {
                tool: tool.to_string(),
                reason: format!("missing installer script {}", script.display()),
            }),
        }
    }

    fn fail(&mut self, tool: &str, error: &EdabootError) {
        self.failed.push(ToolFailure {
            tool: tool.to_string(),
            reason: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Number of tools the batch touched.
    pub fn total(&self) -> usize {
        self.installed.len() + self.kept.len() + self.skipped.len() + self.failed.len()
    }

    /// One-line tally, e.g. `2 installed, 1 kept, 0 skipped, 1 failed`.
    pub fn summary(&self) -> String {
        format!(
            "{} installed, {} kept, {} skipped, {} failed",
            self.installed.len(),
            self.kept.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

/// Presence and version of one tool, without installing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: String,
    pub display_name: String,
    pub method: ToolMethod,
    pub installed: bool,
    /// Executable path, or the install directory when no executable was found
    pub location: Option<String>,
    /// Probed version; `None` when not installed
    pub version: Option<String>,
}

/// Installs catalog tools.
pub struct ToolInstaller<'a> {
    catalog: &'a Catalog,
    settings: &'a InstallSettings,
    ctx: &'a InstallerContext<'a>,
    policy: ReinstallPolicy,
}

impl<'a> ToolInstaller<'a> {
    pub fn new(
        catalog: &'a Catalog,
        settings: &'a InstallSettings,
        ctx: &'a InstallerContext<'a>,
    ) -> Self {
        Self {
            catalog,
            settings,
            ctx,
            policy: ReinstallPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReinstallPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Install one tool, routing on its install method.
    ///
    /// Unknown names and missing scripts are reported through `ui` and
    /// return `Ok`. A failing install command is `Err(InstallFailed)`.
    pub fn install_tool(&self, tool: &str, ui: &mut dyn UserInterface) -> Result<InstallOutcome> {
        let Some(entry) = self.catalog.get(tool) else {
            ui.warning(&format!("Skipping: no installer defined for '{}'", tool));
            return Ok(InstallOutcome::Unknown);
        };

        tracing::debug!("Dispatching {} ({})", entry.name, entry.method.kind());
        match entry.recipe() {
            None => self.install_package(entry, ui),
            Some(recipe) => self.install_script(entry, recipe, ui),
        }
    }

    /// Install one tool and report a failure instead of returning it.
    pub fn install_single(&self, tool: &str, ui: &mut dyn UserInterface) -> InstallReport {
        ui.show_header(&format!("Installing tool: {}", tool));
        let mut report = InstallReport::default();
        match self.install_tool(tool, ui) {
            Ok(outcome) => report.record(tool, outcome),
            Err(e) => {
                ui.error(&format!("Failed to install {}: {}", tool, e));
                report.fail(tool, &e);
            }
        }
        report
    }

    /// Install tools one at a time, in order.
    ///
    /// A failure is reported and the remaining tools still run.
    pub fn install_batch<S: AsRef<str>>(
        &self,
        tools: &[S],
        ui: &mut dyn UserInterface,
    ) -> InstallReport {
        let mut report = InstallReport::default();
        for tool in tools {
            let tool = tool.as_ref();
            match self.install_tool(tool, ui) {
                Ok(outcome) => report.record(tool, outcome),
                Err(e) => {
                    tracing::debug!("{} failed: {}", tool, e);
                    ui.warning(&format!("Failed installing {}: {}", tool, e));
                    report.fail(tool, &e);
                }
            }
        }
        report
    }

    /// Install every catalog tool, package-manager tools first.
    pub fn install_all(&self, ui: &mut dyn UserInterface) -> InstallReport {
        ui.show_header("Installing all known tools");
        let names = self.catalog.names();
        self.install_batch(&names, ui)
    }

    /// Install the saved selection.
    ///
    /// An empty or missing selection is a warning, not an error. A selection
    /// file that cannot be parsed is an error.
    pub fn install_selected(&self, ui: &mut dyn UserInterface) -> Result<InstallReport> {
        let selection = load_selection(&self.settings.selection_path())?;
        if selection.is_empty() {
            ui.warning("No saved tool selection found. Run 'edaboot select' first.");
            return Ok(InstallReport::default());
        }

        ui.show_header(&format!(
            "Installing selected tools: {}",
            selection.join(", ")
        ));
        Ok(self.install_batch(&selection, ui))
    }

    /// Detect and probe a tool without installing it.
    pub fn status(&self, tool: &str) -> Result<ToolStatus> {
        let entry = self
            .catalog
            .get(tool)
            .ok_or_else(|| EdabootError::UnknownTool {
                name: tool.to_string(),
            })?;

        let (installed, location, version) = match entry.recipe() {
            None => {
                if self.package_installed(entry) {
                    let (location, version) = self.probe_package(entry);
                    (true, location, Some(version))
                } else {
                    (false, None, None)
                }
            }
            Some(_) => {
                if is_script_installed(&entry.name, &self.settings.home) {
                    let (location, version) = self.probe_script(entry);
                    (true, Some(location), Some(version))
                } else {
                    (false, None, None)
                }
            }
        };

        Ok(ToolStatus {
            name: entry.name.clone(),
            display_name: entry.display_name.clone(),
            method: entry.method.kind(),
            installed,
            location,
            version,
        })
    }

    fn package_installed(&self, entry: &ToolEntry) -> bool {
        is_package_installed(
            &entry.name,
            &self.settings.query_command,
            self.ctx.run_command,
        )
    }

    fn probe(&self, entry: &ToolEntry, exe: &Path) -> String {
        (self.ctx.probe_version)(entry, exe, self.settings.probe_timeout)
    }

    /// Executable path and version of an installed package tool.
    fn probe_package(&self, entry: &ToolEntry) -> (Option<String>, String) {
        match (self.ctx.locate)(&entry.name) {
            Some(exe) => {
                let version = self.probe(entry, &exe);
                (Some(exe.display().to_string()), version)
            }
            None => (None, UNKNOWN_VERSION.to_string()),
        }
    }

    /// Location and version of an installed script tool.
    ///
    /// PATH first, then the tool's own install directory. With no executable
    /// the location is the install directory and the version is unknown.
    fn probe_script(&self, entry: &ToolEntry) -> (String, String) {
        let key = entry.name.to_lowercase();
        let exe = (self.ctx.locate)(&key).or_else(|| script_executable(&key, &self.settings.home));

        match exe {
            Some(exe) => {
                let version = self.probe(entry, &exe);
                (exe.display().to_string(), version)
            }
            None => (
                format!("~/.local/{}/bin", key),
                UNKNOWN_VERSION.to_string(),
            ),
        }
    }

    fn with_spinner<T>(
        &self,
        ui: &mut dyn UserInterface,
        message: &str,
        f: impl FnOnce() -> T,
    ) -> T {
        let mut spinner = ui.start_spinner(message);
        let value = f();
        spinner.finish_clear();
        value
    }

    fn confirm_reinstall(
        &self,
        entry: &ToolEntry,
        version: &str,
        ui: &mut dyn UserInterface,
    ) -> bool {
        match self.policy {
            ReinstallPolicy::Always => true,
            ReinstallPolicy::Never => false,
            ReinstallPolicy::Prompt => {
                let prompt = Prompt::confirm(
                    format!("reinstall_{}", entry.name),
                    format!(
                        "{} is already installed ({}). Reinstall anyway?",
                        entry.name, version
                    ),
                    false,
                );
                ui.prompt(&prompt)
                    .ok()
                    .and_then(|r| r.as_bool())
                    .unwrap_or(false)
            }
        }
    }

    fn install_package(
        &self,
        entry: &ToolEntry,
        ui: &mut dyn UserInterface,
    ) -> Result<InstallOutcome> {
        if self.package_installed(entry) {
            let (location, version) = self.with_spinner(
                ui,
                &format!("Checking {} version", entry.name),
                || self.probe_package(entry),
            );
            ui.success(&format!(
                "{} already installed via package manager: {} ({})",
                entry.name,
                location.as_deref().unwrap_or("not on PATH"),
                version
            ));
            if !self.confirm_reinstall(entry, &version, ui) {
                return Ok(InstallOutcome::Kept { version });
            }
        }

        let spec = CommandSpec::from_argv(&self.settings.install_command, &[&entry.name])
            .ok_or_else(|| EdabootError::ConfigValidationError {
                message: "package_manager.install must not be empty".to_string(),
            })?;

        ui.message(&format!("Installing {} via package manager...", entry.name));
        self.run_installer(entry, &spec, CommandOptions::default())?;

        ui.success(&format!("{} installed", entry.display_name));
        if let Some(hint) = &entry.hint {
            ui.show_hint(hint);
        }
        Ok(InstallOutcome::Installed)
    }

    fn install_script(
        &self,
        entry: &ToolEntry,
        recipe: &ScriptRecipe,
        ui: &mut dyn UserInterface,
    ) -> Result<InstallOutcome> {
        if is_script_installed(&entry.name, &self.settings.home) {
            let (location, version) = self.with_spinner(
                ui,
                &format!("Checking {} version", entry.name),
                || self.probe_script(entry),
            );
            ui.success(&format!(
                "{} already installed: {} ({})",
                entry.name, location, version
            ));
            if !self.confirm_reinstall(entry, &version, ui) {
                return Ok(InstallOutcome::Kept { version });
            }
        }

        let script = self.settings.script_path(recipe);
        if !script.is_file() {
            ui.error(&format!("Missing installer script: {}", script.display()));
            return Ok(InstallOutcome::ScriptMissing { script });
        }

        let spec = CommandSpec::new("bash").arg(script.to_string_lossy());
        let options = CommandOptions {
            cwd: Some(self.settings.project_root.clone()),
            ..Default::default()
        };

        ui.message(&format!(
            "Installing {} via {}...",
            entry.name,
            recipe.script.display()
        ));
        self.run_installer(entry, &spec, options)?;
        ui.success(&format!("{} installed", entry.display_name));

        for path in recipe.exported_paths() {
            self.persist(path, ui);
        }
        if let Some(hint) = &entry.hint {
            ui.show_hint(hint);
        }
        tracing::debug!(
            "{} installs into {}",
            entry.name,
            script_install_dir(&entry.name, &self.settings.home).display()
        );
        Ok(InstallOutcome::Installed)
    }

    /// Run an install command, turning a non-zero exit into `InstallFailed`.
    fn run_installer(
        &self,
        entry: &ToolEntry,
        spec: &CommandSpec,
        options: CommandOptions,
    ) -> Result<()> {
        tracing::debug!("Running installer for {}: {}", entry.name, spec);
        let failed = |code| EdabootError::InstallFailed {
            tool: entry.name.clone(),
            command: spec.to_string(),
            code,
        };

        let result = (self.ctx.run_command)(spec, &options).map_err(|_| failed(None))?;
        if result.success {
            Ok(())
        } else {
            Err(failed(result.exit_code))
        }
    }

    fn persist(&self, path: &PathEntry, ui: &mut dyn UserInterface) {
        let activation = self.settings.activation();
        match activation.persist_path(&path.label, &path.path) {
            Ok(PersistOutcome::Added) => ui.success(&format!(
                "{} path added to {}",
                path.label,
                self.settings.activation_script.display()
            )),
            Ok(PersistOutcome::AlreadyPresent) => {}
            Ok(PersistOutcome::ScriptNotFound) => ui.warning(&format!(
                "Activation script {} not found; could not persist {} path",
                self.settings.activation_script.display(),
                path.label
            )),
            Err(e) => ui.warning(&format!(
                "Could not update {}: {}",
                activation.path().display(),
                e
            )),
        }
    }
}
